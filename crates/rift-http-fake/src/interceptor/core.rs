//! The interceptor: active rule set, observed request log and the matching decision.

use super::handle::RegistrationHandle;
use super::types::{InterceptionBehaviour, InterceptionResult, RuleId};
use crate::config::InterceptorConfig;
use crate::error::{AssertionError, InterceptError, RegistrationError};
use crate::predicate::RequestPredicate;
use crate::request::InterceptedRequest;
use crate::rule::Rule;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type RuleSet = BTreeMap<RuleId, Arc<Rule>>;

/// State shared by every clone of an [`Interceptor`] and, weakly, by its handles.
pub(crate) struct Shared {
    behaviour: InterceptionBehaviour,
    next_id: AtomicU64,
    rules: ArcSwap<RuleSet>,
    observed: Mutex<Vec<Arc<InterceptedRequest>>>,
}

impl Shared {
    /// Remove the given ids in one publish, returning how many were still present.
    pub(crate) fn remove(&self, ids: &[RuleId]) -> usize {
        let mut removed = 0;
        self.rules.rcu(|current| {
            removed = ids.iter().filter(|id| current.contains_key(id)).count();
            if removed == 0 {
                return Arc::clone(current);
            }
            let mut next = RuleSet::clone(current);
            for id in ids {
                next.remove(id);
            }
            Arc::new(next)
        });
        removed
    }
}

/// Shared handle to a rule registry and the log of requests it has seen.
///
/// Cloning is cheap; all clones see the same rules and the same log. Any number of
/// tasks may register rules, intercept requests and run assertions concurrently.
/// Matching works on a snapshot of the rule set, so a request never observes a
/// partially registered batch.
#[derive(Clone)]
pub struct Interceptor {
    inner: Arc<Shared>,
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new(InterceptionBehaviour::default())
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("behaviour", &self.inner.behaviour)
            .field("rules", &self.rule_count())
            .field("observed", &self.observed_request_count())
            .finish()
    }
}

impl Interceptor {
    /// Empty interceptor with the given behaviour for unmatched requests.
    pub fn new(behaviour: InterceptionBehaviour) -> Self {
        Self {
            inner: Arc::new(Shared {
                behaviour,
                next_id: AtomicU64::new(1),
                rules: ArcSwap::from_pointee(RuleSet::new()),
                observed: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Interceptor that fails every request no rule matches.
    pub fn strict() -> Self {
        Self::new(InterceptionBehaviour::Strict)
    }

    /// Interceptor that lets unmatched requests through to the inner service.
    pub fn lax() -> Self {
        Self::new(InterceptionBehaviour::Lax)
    }

    /// Empty interceptor configured from loaded settings.
    pub fn from_config(config: &InterceptorConfig) -> Self {
        Self::new(config.behaviour)
    }

    /// How unmatched requests are treated.
    pub fn behaviour(&self) -> InterceptionBehaviour {
        self.inner.behaviour
    }

    /// Register one rule. It stays active until the returned handle is released or
    /// dropped.
    pub fn register(&self, rule: Rule) -> Result<RegistrationHandle, RegistrationError> {
        self.register_all([rule])
    }

    /// Register a batch of rules atomically: concurrent interceptions see either all
    /// of them or none. Rules are matched in the order given, after every rule
    /// registered earlier.
    pub fn register_all<I>(&self, rules: I) -> Result<RegistrationHandle, RegistrationError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let entries: Vec<(RuleId, Arc<Rule>)> = rules
            .into_iter()
            .map(|rule| (self.next_id(), Arc::new(rule)))
            .collect();
        if entries.is_empty() {
            return Err(RegistrationError::EmptyBatch);
        }

        let mut collision = None;
        self.inner.rules.rcu(|current| {
            collision = entries
                .iter()
                .map(|(id, _)| *id)
                .find(|id| current.contains_key(id));
            if collision.is_some() {
                return Arc::clone(current);
            }
            let mut next = RuleSet::clone(current);
            next.extend(entries.iter().map(|(id, rule)| (*id, Arc::clone(rule))));
            Arc::new(next)
        });
        if let Some(id) = collision {
            return Err(RegistrationError::IdCollision(id));
        }

        let ids: Vec<RuleId> = entries.into_iter().map(|(id, _)| id).collect();
        debug!(count = ids.len(), first = %ids[0], "Registered rules");
        Ok(RegistrationHandle::new(Arc::downgrade(&self.inner), ids))
    }

    /// Record the request and return the first matching rule.
    ///
    /// Rules are tried in registration order; predicates of each rule in their
    /// configured order. Under [`InterceptionBehaviour::Strict`] an unmatched request
    /// is an error, but it is still recorded.
    pub async fn intercept(
        &self,
        request: &InterceptedRequest,
    ) -> Result<InterceptionResult, InterceptError> {
        self.record(request);

        let rules = self.inner.rules.load_full();
        for (id, rule) in rules.iter() {
            if rule.matches(request).await {
                debug!(
                    rule = %id,
                    name = rule.name().unwrap_or_default(),
                    method = %request.method(),
                    uri = %request.uri(),
                    "Request matched configured rule"
                );
                return Ok(InterceptionResult::Matched(Arc::clone(rule)));
            }
        }

        match self.inner.behaviour {
            InterceptionBehaviour::Lax => {
                debug!(
                    method = %request.method(),
                    uri = %request.uri(),
                    "No rule matched, passing request through"
                );
                Ok(InterceptionResult::NotMatched)
            }
            InterceptionBehaviour::Strict => {
                warn!(
                    method = %request.method(),
                    uri = %request.uri(),
                    rules = rules.len(),
                    "Request didn't match any configured response"
                );
                Err(InterceptError::UnmatchedStrictRequest {
                    method: request.method().clone(),
                    uri: request.uri().clone(),
                })
            }
        }
    }

    /// Like [`Interceptor::intercept`], but abandons matching once `cancellation`
    /// fires. A request whose token is already cancelled is not recorded.
    pub async fn intercept_with_cancellation(
        &self,
        request: &InterceptedRequest,
        cancellation: &CancellationToken,
    ) -> Result<InterceptionResult, InterceptError> {
        if cancellation.is_cancelled() {
            return Err(InterceptError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(InterceptError::Cancelled),
            result = self.intercept(request) => result,
        }
    }

    /// Succeeds when at least one observed request satisfies `predicate`.
    pub fn assert_request_matching<F>(&self, predicate: F) -> Result<(), AssertionError>
    where
        F: Fn(&InterceptedRequest) -> bool,
    {
        let observed = self.observed_requests();
        if observed.iter().any(|request| predicate(request)) {
            Ok(())
        } else {
            Err(AssertionError::NoRequestMatched {
                observed: observed.len(),
            })
        }
    }

    /// Evaluates `predicate` over the observed requests in recording order, one at a
    /// time, and succeeds at the first request it accepts.
    pub async fn assert_request_matching_async<F, Fut>(
        &self,
        mut predicate: F,
    ) -> Result<(), AssertionError>
    where
        F: FnMut(Arc<InterceptedRequest>) -> Fut,
        Fut: Future<Output = bool>,
    {
        let observed = self.observed_requests();
        for request in &observed {
            if predicate(Arc::clone(request)).await {
                return Ok(());
            }
        }
        Err(AssertionError::NoRequestMatched {
            observed: observed.len(),
        })
    }

    /// Like [`Interceptor::assert_request_matching_async`], but fails with
    /// [`AssertionError::Cancelled`] once `cancellation` fires.
    pub async fn assert_request_matching_async_with_cancellation<F, Fut>(
        &self,
        predicate: F,
        cancellation: &CancellationToken,
    ) -> Result<(), AssertionError>
    where
        F: FnMut(Arc<InterceptedRequest>) -> Fut,
        Fut: Future<Output = bool>,
    {
        if cancellation.is_cancelled() {
            return Err(AssertionError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(AssertionError::Cancelled),
            result = self.assert_request_matching_async(predicate) => result,
        }
    }

    /// Succeeds when at least one observed request satisfies a request predicate,
    /// so rule predicates can be reused in assertions.
    pub async fn assert_request_satisfies<P>(&self, predicate: &P) -> Result<(), AssertionError>
    where
        P: RequestPredicate + ?Sized,
    {
        self.assert_request_matching_async(|request| async move {
            predicate.is_satisfied_by(&request).await
        })
        .await
    }

    /// Remove every rule and forget every observed request.
    ///
    /// Outstanding handles stay valid; releasing them afterwards removes nothing.
    pub fn clear(&self) {
        let mut observed = self.inner.observed.lock();
        let previous = self.inner.rules.swap(Arc::new(RuleSet::new()));
        info!(
            rules = previous.len(),
            observed = observed.len(),
            "Cleared interceptor"
        );
        observed.clear();
    }

    /// Number of rules currently registered.
    pub fn rule_count(&self) -> usize {
        self.inner.rules.load().len()
    }

    /// Snapshot of the observed requests in recording order.
    pub fn observed_requests(&self) -> Vec<Arc<InterceptedRequest>> {
        self.inner.observed.lock().clone()
    }

    /// Number of requests recorded since creation or the last [`Interceptor::clear`].
    pub fn observed_request_count(&self) -> usize {
        self.inner.observed.lock().len()
    }

    fn record(&self, request: &InterceptedRequest) {
        self.inner.observed.lock().push(Arc::new(request.clone()));
    }

    fn next_id(&self) -> RuleId {
        RuleId(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }
}
