use crate::http::make_error_response;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::future::{Ready, ready};

/// Serves `/health` and `/ready` for orchestration probes.
///
/// `is_ready` is consulted on every readiness probe, so it can flip once the
/// process finishes starting up.
pub struct AdminService<F> {
    is_ready: F,
}

impl<F> AdminService<F>
where
    F: Fn() -> bool,
{
    pub fn new(is_ready: F) -> Self {
        Self { is_ready }
    }
}

impl<F, B> Service<Request<B>> for AdminService<F>
where
    F: Fn() -> bool,
{
    type Response = Response<BoxBody<Bytes, Infallible>>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let ok_body = || Full::new(Bytes::from("ok\n")).boxed();

        let res = match (req.method(), req.uri().path()) {
            (&Method::GET, "/health") => Response::new(ok_body()),
            (&Method::GET, "/ready") => match (self.is_ready)() {
                true => Response::new(ok_body()),
                false => make_error_response(StatusCode::SERVICE_UNAVAILABLE),
            },
            _ => make_error_response(StatusCode::NOT_FOUND),
        };
        ready(Ok(res))
    }
}
