//! Concurrent rule registry and observed request log.
//!
//! # Module Structure
//!
//! - `core` - [`Interceptor`]: registration, matching, assertions
//! - `handle` - [`RegistrationHandle`] releasing registered rules
//! - `types` - behaviour, rule ids and interception results

mod core;
mod handle;
mod types;


pub use self::core::Interceptor;
pub use handle::RegistrationHandle;
pub use types::{InterceptionBehaviour, InterceptionResult, RuleId, UnknownBehaviour};
