use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tour_offer::TourOptionAggregator;
use tracing::info;
use uuid::Uuid;

struct SessionEntry {
    aggregator: Arc<TourOptionAggregator>,
    last_seen: DateTime<Utc>,
}

/// Open availability pages, closed after sitting idle for `idle_ttl`
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub async fn insert(&self, aggregator: Arc<TourOptionAggregator>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                aggregator,
                last_seen: Utc::now(),
            },
        );
        id
    }

    /// Look up a session and mark it as used
    pub async fn get(&self, id: &Uuid) -> Option<Arc<TourOptionAggregator>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Utc::now();
        Some(entry.aggregator.clone())
    }

    /// Close and forget a session
    pub async fn remove(&self, id: &Uuid) -> bool {
        match self.sessions.write().await.remove(id) {
            Some(entry) => {
                entry.aggregator.close();
                true
            }
            None => false,
        }
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Utc::now()).await
    }

    pub async fn cleanup_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();

        sessions.retain(|_, entry| {
            if now - entry.last_seen > self.idle_ttl {
                entry.aggregator.close();
                false
            } else {
                true
            }
        });

        initial_count - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Periodically drop idle sessions
pub fn spawn_session_sweeper(sessions: Arc<SessionStore>, every: StdDuration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired().await;
            if removed > 0 {
                let remaining = sessions.active_count().await;
                info!(removed, remaining, "Closed idle sessions");
            }
        }
    })
}
