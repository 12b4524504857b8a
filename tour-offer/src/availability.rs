use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;
use tour_shared::AvailabilityResult;

/// Per-option availability: `Unchecked -> Checking -> {Available, Unavailable}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityState {
    Unchecked,
    Checking,
    Available,
    Unavailable { message: Option<String> },
}

impl AvailabilityState {
    pub fn from_result(result: &AvailabilityResult) -> Self {
        if result.is_available() {
            Self::Available
        } else {
            Self::Unavailable {
                message: result.message.clone(),
            }
        }
    }

    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Text shown on the option's action button
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchecked => "Check Availability",
            Self::Checking => "Checking...",
            Self::Available => "Book Now",
            Self::Unavailable { .. } => "Sold Out",
        }
    }
}

struct BoardInner {
    generation: u64,
    entries: HashMap<i64, AvailabilityState>,
}

/// Availability keyed by tour option id, valid for one option-list generation.
///
/// Every concurrent check owns a distinct key, so the lock only guards the
/// map itself. Writes tagged with an older generation are dropped.
pub struct AvailabilityBoard {
    inner: RwLock<BoardInner>,
}

impl AvailabilityBoard {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BoardInner {
                generation: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    pub async fn state(&self, tour_option_id: i64) -> AvailabilityState {
        self.inner
            .read()
            .await
            .entries
            .get(&tour_option_id)
            .cloned()
            .unwrap_or(AvailabilityState::Unchecked)
    }

    pub async fn snapshot(&self) -> HashMap<i64, AvailabilityState> {
        self.inner.read().await.entries.clone()
    }

    /// Move an option from `Unchecked` to `Checking`.
    ///
    /// Returns false when a check is already in flight, a result is cached, or
    /// `generation` is no longer current.
    pub async fn try_begin(&self, tour_option_id: i64, generation: u64) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation || inner.entries.contains_key(&tour_option_id) {
            return false;
        }
        inner.entries.insert(tour_option_id, AvailabilityState::Checking);
        true
    }

    /// Record a resolved check. Returns false if the board moved on.
    pub async fn commit(&self, generation: u64, result: &AvailabilityResult) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return false;
        }
        inner
            .entries
            .insert(result.tour_option_id, AvailabilityState::from_result(result));
        true
    }

    /// Forget everything for a refetched option list; returns the new generation
    pub async fn reset(&self) -> u64 {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.entries.clear();
        inner.generation
    }
}

impl Default for AvailabilityBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_board_lifecycle() {
        let board = AvailabilityBoard::new();
        let generation = board.reset().await;

        assert_eq!(board.state(1).await, AvailabilityState::Unchecked);
        assert!(board.try_begin(1, generation).await);
        assert_eq!(board.state(1).await, AvailabilityState::Checking);

        // In flight: no second check
        assert!(!board.try_begin(1, generation).await);

        assert!(board.commit(generation, &AvailabilityResult::from_status(1, Some(1), None)).await);
        assert_eq!(board.state(1).await, AvailabilityState::Available);

        // Resolved: still no second check
        assert!(!board.try_begin(1, generation).await);
    }

    #[tokio::test]
    async fn test_reset_drops_stale_writes() {
        let board = AvailabilityBoard::new();
        let old = board.reset().await;
        assert!(board.try_begin(5, old).await);

        let current = board.reset().await;
        assert_ne!(old, current);
        assert_eq!(board.state(5).await, AvailabilityState::Unchecked);

        assert!(!board.commit(old, &AvailabilityResult::from_status(5, Some(1), None)).await);
        assert!(!board.try_begin(5, old).await);
        assert_eq!(board.state(5).await, AvailabilityState::Unchecked);
        assert!(board.try_begin(5, current).await);
    }

    #[test]
    fn test_state_labels() {
        let sold_out = AvailabilityState::from_result(&AvailabilityResult::check_failed(1));
        assert_eq!(sold_out.label(), "Sold Out");
        assert!(!sold_out.is_bookable());
        assert_eq!(AvailabilityState::Available.label(), "Book Now");
        assert!(AvailabilityState::Available.is_bookable());
        assert!(!AvailabilityState::Checking.is_bookable());
    }

    #[test]
    fn test_state_serialization() {
        let value = serde_json::to_value(AvailabilityState::Unavailable {
            message: Some("No seats".to_string()),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "state": "UNAVAILABLE", "message": "No seats" }));
        assert_eq!(
            serde_json::to_value(AvailabilityState::Checking).unwrap(),
            serde_json::json!({ "state": "CHECKING" })
        );
    }
}
