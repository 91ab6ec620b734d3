use crate::errors::CatalogError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::Serialize;
use std::fmt;

/// A page number or record id taken from the last path segment.
///
/// Anything other than plain decimal digits means the route does not match,
/// so it is rejected as not found rather than as a bad request. The value is
/// kept as normalized decimal text with no upper bound, so ids the catalog API
/// does not know are still forwarded to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathNumber(String);

impl PathNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number one above this one.
    pub fn next(&self) -> PathNumber {
        let mut digits: Vec<u8> = self.0.bytes().collect();
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
        PathNumber(digits.into_iter().map(char::from).collect())
    }

    /// The number one below this one, if there is one.
    pub fn prev(&self) -> Option<PathNumber> {
        if self.0 == "0" {
            return None;
        }
        let mut digits: Vec<u8> = self.0.bytes().collect();
        for digit in digits.iter_mut().rev() {
            if *digit == b'0' {
                *digit = b'9';
            } else {
                *digit -= 1;
                break;
            }
        }
        let text: String = digits.into_iter().map(char::from).collect();
        Some(PathNumber(normalize(&text)))
    }
}

impl fmt::Display for PathNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for PathNumber
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| CatalogError::RouteNotFound)?;

        parse_segment(&raw).ok_or(CatalogError::RouteNotFound)
    }
}

fn parse_segment(raw: &str) -> Option<PathNumber> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(PathNumber(normalize(raw)))
}

fn normalize(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        rest => rest.to_string(),
    }
}
