//! In-process HTTP interception for tests.
//!
//! Outgoing requests made through an intercepted client are offered to an
//! [`Interceptor`]. When a registered [`Rule`] matches, its configured response is
//! returned without touching the network; otherwise the request is forwarded
//! unchanged (or rejected, under [`InterceptionBehaviour::Strict`]). Every request is
//! recorded so tests can assert on what was actually sent.
//!
//! # Example
//!
//! ```no_run
//! use rift_http_fake::{ConfiguredResponse, Interceptor, Rule};
//! use hyper::StatusCode;
//!
//! # fn demo() -> Result<(), rift_http_fake::Error> {
//! let interceptor = Interceptor::default();
//! let _registration = interceptor.register(
//!     Rule::builder()
//!         .with_absolute_path("/absolute/path")
//!         .respond_with(ConfiguredResponse::new(StatusCode::OK).with_body("hello"))
//!         .build()?,
//! )?;
//!
//! let client = rift_http_fake::client::intercepted_client(&interceptor);
//! // ... issue requests through `client` ...
//! # let _ = client;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `request`: buffered view of an outgoing request
//! - `predicate`: the predicate contract, concrete predicates and combinators
//! - `rule`: rules, the rule builder and configured responses
//! - `interceptor`: the concurrent registry, registration handles and assertions
//! - `layer`: `tower` layer placing the interceptor in a client pipeline
//! - `client`: intercepted `hyper_util` client
//! - `config`: interceptor configuration (YAML / environment)
//! - `logging`: tracing subscriber setup for test binaries

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod layer;
pub mod logging;
pub mod predicate;
pub mod request;
pub mod rule;

pub use config::InterceptorConfig;
pub use error::{AssertionError, ConfigurationError, Error, InterceptError, RegistrationError};
pub use interceptor::{
    InterceptionBehaviour, InterceptionResult, Interceptor, RegistrationHandle, RuleId,
};
pub use layer::{InterceptBody, InterceptLayer, InterceptService};
pub use predicate::{PredicateExt, RequestPredicate, SharedPredicate};
pub use request::InterceptedRequest;
pub use rule::{ConfiguredResponse, Rule, RuleBuilder};
