//! Single-flight request coalescing.
//!
//! The cart page has two independent refresh triggers: the periodic poll
//! and the reload performed after every mutation. Both funnel through a
//! [`SingleFlight`] keyed by session, so at most one cart fetch per session
//! is in flight at a time and every concurrent caller observes that latest
//! result.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::{Mutex, broadcast};

/// Coalesces concurrent invocations of the same logical operation.
///
/// The first caller for a key becomes the leader and runs the work; callers
/// arriving while it is in flight wait for the leader's result instead of
/// issuing their own request.
pub struct SingleFlight<K, V> {
    inflight: Mutex<HashMap<K, broadcast::Sender<V>>>,
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Run `work` for `key`, or wait for an already-running invocation.
    pub async fn run<F, Fut>(&self, key: K, work: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let waiter = {
            let mut inflight = self.inflight.lock().await;
            if let Some(sender) = inflight.get(&key) {
                Some(sender.subscribe())
            } else {
                let (sender, _) = broadcast::channel(1);
                inflight.insert(key.clone(), sender);
                None
            }
        };

        match waiter {
            Some(mut receiver) => match receiver.recv().await {
                Ok(value) => value,
                // Leader was cancelled before publishing; fall back to a
                // direct, uncoalesced call.
                Err(_) => work().await,
            },
            None => {
                let value = work().await;
                let sender = self.inflight.lock().await.remove(&key);
                if let Some(sender) = sender {
                    // No waiters is fine; send only fails when nobody listens
                    let _ = sender.send(value.clone());
                }
                value
            }
        }
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
