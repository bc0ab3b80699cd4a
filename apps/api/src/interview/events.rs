//! Live interview-list updates.
//!
//! Every write to a user's interviews publishes an `InterviewChanged`. A
//! subscriber re-reads the list from the store whenever its user is named.

use std::sync::Arc;

use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use crate::models::interview::Interview;
use crate::store::InterviewStore;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct InterviewChanged {
    pub user_id: String,
}

#[derive(Clone)]
pub struct InterviewEvents {
    tx: broadcast::Sender<InterviewChanged>,
}

impl Default for InterviewEvents {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl InterviewEvents {
    pub fn notify(&self, user_id: &str) {
        let event = InterviewChanged {
            user_id: user_id.to_string(),
        };
        if self.tx.send(event).is_err() {
            debug!("No interview subscribers for user {user_id}");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InterviewChanged> {
        self.tx.subscribe()
    }
}

/// Yields the user's current list immediately, then again after each change.
/// A lagged receiver re-syncs with a fresh read; the stream ends when the
/// channel closes.
pub fn interview_list_updates(
    store: Arc<dyn InterviewStore>,
    user_id: String,
    rx: broadcast::Receiver<InterviewChanged>,
) -> impl Stream<Item = anyhow::Result<Vec<Interview>>> {
    stream::unfold(
        (store, user_id, rx, true),
        |(store, user_id, mut rx, first)| async move {
            if !first {
                loop {
                    match rx.recv().await {
                        Ok(event) if event.user_id == user_id => break,
                        Ok(_) => continue,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("Interview subscriber lagged by {skipped} events, re-syncing");
                            break;
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
            let list = store.list_interviews(&user_id).await;
            Some((list, (store, user_id, rx, false)))
        },
    )
}
