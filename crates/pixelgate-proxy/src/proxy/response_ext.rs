//! Response extension traits for common transformations.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;
use std::convert::Infallible;

/// Extension trait for `Response<Full<Bytes>>` providing common transformations.
pub trait ResponseExt {
    /// Convert the response body into the boxed body type handlers return.
    fn into_boxed(self) -> Response<BoxBody<Bytes, hyper::Error>>;
}

impl ResponseExt for Response<Full<Bytes>> {
    fn into_boxed(self) -> Response<BoxBody<Bytes, hyper::Error>> {
        self.map(|b| BoxBody::new(b.map_err(|never: Infallible| match never {})))
    }
}
