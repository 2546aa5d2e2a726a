use log::debug;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Hands out unique subscription handles
#[derive(Debug, Default)]
pub(crate) struct SubscriptionIds {
    next: u64,
}

impl SubscriptionIds {
    pub(crate) fn allocate(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        id
    }
}

type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// Ordered set of listeners notified synchronously with every event
pub(crate) struct Listeners<T> {
    entries: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(crate) fn subscribe<F>(&mut self, id: SubscriptionId, listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.entries.push((id, Box::new(listener)));
        debug!("Listener {:?} subscribed ({} active)", id, self.entries.len());
        id
    }

    /// Remove a listener, `false` if the handle was unknown
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!("Listener {:?} unsubscribed ({} active)", id, self.entries.len());
        }
        removed
    }

    pub(crate) fn notify(&mut self, event: &T) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.entries.len()).finish()
    }
}
