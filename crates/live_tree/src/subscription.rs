//! Disposable handle for a child-list subscription

use crate::{LiveTree, Result, SubscriptionId};

/// An established subscription on one target.
///
/// Cancelling consumes the handle, so a subscription can be released only once.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    /// Subscribe to child-list changes of `target`
    pub fn establish<T: LiveTree>(tree: &mut T, target: &T::Node) -> Result<Self> {
        let id = tree.subscribe(target)?;
        tracing::debug!(subscription = %id, "subscription established");
        Ok(Self { id })
    }

    /// Get the subscription id
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Release the subscription
    pub fn cancel<T: LiveTree>(self, tree: &mut T) -> Result<()> {
        tracing::debug!(subscription = %self.id, "subscription cancelled");
        tree.unsubscribe(self.id)
    }
}
