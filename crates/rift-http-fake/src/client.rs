//! HTTP client with the interceptor installed.

use crate::interceptor::Interceptor;
use crate::layer::{InterceptLayer, InterceptService};
use bytes::Bytes;
use http_body_util::Full;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;

/// Plain HTTP client the interceptor forwards unmatched requests to.
pub type HttpClient = Client<HttpConnector, Full<Bytes>>;

/// Client service whose requests are offered to an [`Interceptor`] first.
pub type InterceptedClient = InterceptService<HttpClient>;

/// Build a `hyper_util` client wrapped in an [`InterceptLayer`] for `interceptor`.
///
/// Drive it with [`tower::ServiceExt`], e.g. `client.clone().oneshot(request)`.
pub fn intercepted_client(interceptor: &Interceptor) -> InterceptedClient {
    let client = Client::builder(TokioExecutor::new()).build_http::<Full<Bytes>>();
    ServiceBuilder::new()
        .layer(InterceptLayer::new(interceptor.clone()))
        .service(client)
}
