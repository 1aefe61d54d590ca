//! Registration handles that scope how long rules stay active.

use super::core::Shared;
use super::types::RuleId;
use std::fmt;
use std::sync::Weak;
use tracing::debug;

/// Keeps registered rules active.
///
/// Releasing the handle, explicitly or by dropping it, removes exactly the rules it
/// registered and leaves every other rule in place. Releasing twice is a no-op.
/// The handle does not keep the interceptor alive.
#[must_use = "registered rules are removed as soon as the handle is dropped"]
pub struct RegistrationHandle {
    shared: Weak<Shared>,
    ids: Vec<RuleId>,
}

impl RegistrationHandle {
    pub(crate) fn new(shared: Weak<Shared>, ids: Vec<RuleId>) -> Self {
        Self { shared, ids }
    }

    /// Ids still owned by this handle; empty once released.
    pub fn ids(&self) -> &[RuleId] {
        &self.ids
    }

    /// Remove the rules now, returning how many were still registered.
    pub fn release(&mut self) -> usize {
        let ids = std::mem::take(&mut self.ids);
        if ids.is_empty() {
            return 0;
        }
        let Some(shared) = self.shared.upgrade() else {
            return 0;
        };
        let removed = shared.remove(&ids);
        debug!(requested = ids.len(), removed, "Released registered rules");
        removed
    }

    /// Leave the rules registered until the interceptor is cleared.
    pub fn forget(mut self) {
        self.ids.clear();
    }
}

impl Drop for RegistrationHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("ids", &self.ids)
            .finish()
    }
}
