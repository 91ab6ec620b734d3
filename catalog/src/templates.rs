use minijinja::Environment;
use serde::Serialize;

/// Page templates, compiled into the binary.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("personagens.html", include_str!("../templates/personagens.html")),
    ("personagem.html", include_str!("../templates/personagem.html")),
    ("episodes.html", include_str!("../templates/episodes.html")),
    ("episode.html", include_str!("../templates/episode.html")),
    ("locations.html", include_str!("../templates/locations.html")),
    ("location.html", include_str!("../templates/location.html")),
    ("erro.html", include_str!("../templates/erro.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Parses every template up front so syntax errors surface at startup.
    pub fn load() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Templates { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(context)
    }
}
