//! Sequence counter over session changes, for long-polling HTTP clients.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{ChangeOrigin, SessionBridge, Subscription};

pub struct ChangeFeed {
    sequence: Arc<watch::Sender<u64>>,
    _subscription: Subscription,
}

impl ChangeFeed {
    /// Start counting the changes `bridge` reports.
    pub fn attach(bridge: &SessionBridge) -> Self {
        let sequence = Arc::new(watch::Sender::new(0u64));
        let sender = Arc::clone(&sequence);
        let subscription = bridge.subscribe(move |origin| {
            sender.send_modify(|seq| *seq += 1);
            match origin {
                ChangeOrigin::Local => tracing::debug!("Demo session changed"),
                ChangeOrigin::External => {
                    tracing::debug!("Demo session changed through another handle")
                }
            }
        });
        Self {
            sequence,
            _subscription: subscription,
        }
    }

    pub fn current(&self) -> u64 {
        *self.sequence.borrow()
    }

    /// Wait until the sequence moves past `since`, or `timeout` elapses.
    /// Returns the sequence number observed last.
    pub async fn wait_past(&self, since: u64, timeout: Duration) -> u64 {
        let mut receiver = self.sequence.subscribe();
        let _ = tokio::time::timeout(timeout, receiver.wait_for(|seq| *seq > since)).await;
        self.current()
    }
}
