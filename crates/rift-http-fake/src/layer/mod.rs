//! `tower` middleware placing an [`Interceptor`] in front of an HTTP client service.
//!
//! The request body is buffered once, offered to the interceptor, and, when no rule
//! matches under lax behaviour, forwarded unchanged to the wrapped service.

use crate::interceptor::{InterceptionResult, Interceptor};
use crate::request::InterceptedRequest;
use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{Request, Response};
use std::task::{Context, Poll};
use tower::{BoxError, Layer, Service};
use tracing::debug;

/// Response body produced by [`InterceptService`], whether configured or forwarded.
pub type InterceptBody = UnsyncBoxBody<Bytes, BoxError>;

/// Wraps a client service so every outgoing request goes through an [`Interceptor`].
#[derive(Debug, Clone)]
pub struct InterceptLayer {
    interceptor: Interceptor,
}

impl InterceptLayer {
    /// Wrap services so their requests are offered to `interceptor` first.
    pub fn new(interceptor: Interceptor) -> Self {
        Self { interceptor }
    }
}

impl<S> Layer<S> for InterceptLayer {
    type Service = InterceptService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InterceptService {
            inner,
            interceptor: self.interceptor.clone(),
        }
    }
}

/// Service created by [`InterceptLayer`].
///
/// Matched requests are answered with the configured response and never reach the
/// inner service. Strict rejections surface as the service error, downcastable to
/// [`crate::InterceptError`].
#[derive(Debug, Clone)]
pub struct InterceptService<S> {
    inner: S,
    interceptor: Interceptor,
}

impl<S> InterceptService<S> {
    /// The interceptor requests are offered to.
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// The wrapped service unmatched requests are forwarded to.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S, B, ResBody> Service<Request<B>> for InterceptService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    ResBody: Body<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<InterceptBody>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let interceptor = self.interceptor.clone();

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = body
                .collect()
                .await
                .map_err(Into::<BoxError>::into)?
                .to_bytes();

            let intercepted = InterceptedRequest::from_parts(&parts, body.clone());
            match interceptor.intercept(&intercepted).await? {
                InterceptionResult::Matched(rule) => {
                    debug!(
                        status = %rule.response().status(),
                        "Answering with configured response"
                    );
                    Ok(rule.response().to_boxed_response())
                }
                InterceptionResult::NotMatched => {
                    let response = inner
                        .call(Request::from_parts(parts, Full::new(body)))
                        .await
                        .map_err(Into::into)?;
                    Ok(response.map(|body| body.map_err(Into::<BoxError>::into).boxed_unsync()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterceptError;
    use crate::rule::{ConfiguredResponse, Rule};
    use hyper::{Method, StatusCode};
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::{service_fn, ServiceExt};

    /// Intercepted upstream stand-in that echoes the request body and counts calls.
    fn intercepted_echo(
        interceptor: Interceptor,
        calls: Arc<AtomicUsize>,
    ) -> impl Service<Request<Full<Bytes>>, Response = Response<InterceptBody>, Error = BoxError>
    {
        let upstream = service_fn(move |request: Request<Full<Bytes>>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let body = request.into_body().collect().await?.to_bytes();
                Ok::<_, Infallible>(Response::new(Full::new(body)))
            }
        });
        InterceptLayer::new(interceptor).layer(upstream)
    }

    fn post(uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_matched_request_short_circuits() {
        let interceptor = Interceptor::default();
        let _handle = interceptor
            .register(
                Rule::builder()
                    .with_absolute_path("/orders")
                    .respond_with(ConfiguredResponse::new(StatusCode::CREATED).with_body("fake"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = intercepted_echo(interceptor.clone(), calls.clone());

        let response = service
            .oneshot(post("http://upstream.test/orders", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"fake"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmatched_request_forwarded_with_body() {
        let interceptor = Interceptor::lax();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = intercepted_echo(interceptor.clone(), calls.clone());

        let response = service
            .oneshot(post("http://upstream.test/echo", "original body"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"original body"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let observed = interceptor.observed_requests();
        assert_eq!(observed.len(), 1);
        assert_eq!(observed[0].body_text(), Some("original body"));
    }

    #[tokio::test]
    async fn test_strict_rejection_is_service_error() {
        let interceptor = Interceptor::strict();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = intercepted_echo(interceptor, calls.clone());

        let error = service
            .oneshot(post("http://upstream.test/unknown", ""))
            .await
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<InterceptError>(),
            Some(InterceptError::UnmatchedStrictRequest { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
