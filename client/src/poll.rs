//! Fixed-interval polling tasks.
//!
//! The portal has no push channel; live surfaces (chat, credit) poll on a
//! timer. A [`PollHandle`] owns its task and stops it on drop.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use huay_types::api::ChatMessage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::Client;

/// Handle to a background polling task.
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run `tick` every `every`, starting immediately. Slow ticks delay the next
/// one instead of bunching up.
pub fn repeating<F, Fut>(every: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            tick().await;
        }
    });
    PollHandle { handle }
}

/// Incremental chat poller: fetches only messages newer than the last one
/// seen and forwards them in order.
pub struct ChatFeed {
    rx: mpsc::UnboundedReceiver<ChatMessage>,
    handle: PollHandle,
}

impl ChatFeed {
    pub fn start(client: Client, every: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let last_seen = Arc::new(AtomicU64::new(0));
        let handle = repeating(every, move || {
            let client = client.clone();
            let tx = tx.clone();
            let last_seen = last_seen.clone();
            async move {
                let after = match last_seen.load(Ordering::Acquire) {
                    0 => None,
                    id => Some(id),
                };
                match client.chat_messages(after).await {
                    Ok(messages) => {
                        for message in messages {
                            last_seen.fetch_max(message.id, Ordering::AcqRel);
                            if tx.send(message).is_err() {
                                return;
                            }
                        }
                    }
                    Err(err) => tracing::warn!(?err, "chat poll failed"),
                }
            }
        });
        Self { rx, handle }
    }

    /// The next unseen message; `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<ChatMessage> {
        self.rx.recv().await
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthSession;
    use crate::storage::LocalStore;
    use axum::extract::{Query, State as AxumState};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_repeating_ticks_until_cancelled() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let handle = repeating(Duration::from_millis(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 2, "expected at least 2 ticks, got {seen}");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_chat_feed_fetches_incrementally() {
        // First poll returns two messages, later polls only what is newer
        // than the `after` cursor.
        let afters = Arc::new(Mutex::new(Vec::new()));

        async fn messages_handler(
            AxumState(afters): AxumState<Arc<Mutex<Vec<Option<u64>>>>>,
            Query(query): Query<HashMap<String, u64>>,
        ) -> Json<serde_json::Value> {
            let after = query.get("after").copied();
            afters.lock().unwrap().push(after);
            let backlog = serde_json::json!([
                { "id": 1, "sender": "mod", "message": "hi", "createdAt": "t1" },
                { "id": 2, "sender": "mod", "message": "there", "createdAt": "t2" }
            ]);
            let body = match after {
                None => backlog,
                Some(n) if n < 3 => serde_json::json!([
                    { "id": 3, "sender": "mod", "message": "new", "createdAt": "t3" }
                ]),
                Some(_) => serde_json::json!([]),
            };
            Json(body)
        }

        let router = Router::new()
            .route("/api/v1/member/chat/messages", get(messages_handler))
            .with_state(afters.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = Client::new(
            &format!("http://{addr}"),
            AuthSession::new(LocalStore::in_memory()),
        )
        .unwrap();
        let mut feed = ChatFeed::start(client, Duration::from_millis(10));

        assert_eq!(feed.next().await.map(|m| m.id), Some(1));
        assert_eq!(feed.next().await.map(|m| m.id), Some(2));
        assert_eq!(feed.next().await.map(|m| m.id), Some(3));

        feed.cancel();
        server.abort();

        let afters = afters.lock().unwrap();
        assert_eq!(afters[0], None);
        assert!(afters[1..].iter().all(|after| after.is_some()));
    }
}
