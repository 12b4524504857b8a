use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tour_core::{group_time_slots, CoreResult, TimeSlot, TourSupplier};
use tour_shared::{BookingIntent, Participants, TourOption};
use tracing::{debug, info, warn};

use crate::availability::{AvailabilityBoard, AvailabilityState};
use crate::checker::{AvailabilityChecker, CheckOutcome};
use crate::context::TourContext;
use crate::fetcher::TourOptionFetcher;

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("No time slot at {0}")]
    UnknownSlot(String),
}

/// Reasons "Book Now" is refused. No request is made in any of these cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Tour option {0} is not offered for this date")]
    UnknownOption(i64),
    #[error("Availability for this option has not been checked yet")]
    NotChecked,
    #[error("Availability is still being checked, please wait")]
    CheckInProgress,
    #[error("This option is sold out")]
    SoldOut { message: Option<String> },
}

#[derive(Default)]
struct Selection {
    options: Vec<TourOption>,
    slots: Vec<TimeSlot>,
    selected: Option<String>,
}

struct Generation {
    id: u64,
    token: CancellationToken,
}

/// Everything the availability page renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatorView {
    pub tour_id: i64,
    pub travel_date: String,
    pub participants: Participants,
    pub selected_time: Option<String>,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub time: String,
    pub formatted_time: String,
    pub selected: bool,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    #[serde(flatten)]
    pub option: TourOption,
    pub availability: AvailabilityState,
    pub label: &'static str,
    pub bookable: bool,
    pub cutoff_passed: bool,
}

/// Options of one tour for one date, grouped into time slots, with live
/// availability per option and the booking gate.
///
/// Dropping or closing the aggregator cancels every outstanding request.
pub struct TourOptionAggregator {
    context: RwLock<TourContext>,
    selection: RwLock<Selection>,
    fetcher: TourOptionFetcher,
    checker: AvailabilityChecker,
    board: Arc<AvailabilityBoard>,
    root: CancellationToken,
    generation: Mutex<Generation>,
    tasks: Mutex<JoinSet<CheckOutcome>>,
}

impl TourOptionAggregator {
    pub fn new(supplier: Arc<dyn TourSupplier>, context: TourContext) -> Self {
        let board = Arc::new(AvailabilityBoard::new());
        let root = CancellationToken::new();
        Self {
            context: RwLock::new(context),
            selection: RwLock::new(Selection::default()),
            fetcher: TourOptionFetcher::new(supplier.clone()),
            checker: AvailabilityChecker::new(supplier, board.clone()),
            board,
            generation: Mutex::new(Generation {
                id: 0,
                token: root.child_token(),
            }),
            root,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub async fn context(&self) -> TourContext {
        self.context.read().await.clone()
    }

    /// Fetch the option list, regroup it, select the first slot and start
    /// checking its options. Returns the number of slots.
    ///
    /// Availability from the previous list is discarded and its requests
    /// cancelled.
    pub async fn refresh(&self) -> CoreResult<usize> {
        let context = self.context().await;
        context.options_query()?;
        if self.is_closed() {
            return Ok(0);
        }

        let (generation, token) = self.next_generation().await;
        let options = self.fetcher.fetch(&context).await?;
        if token.is_cancelled() {
            debug!(tour_id = context.tour_id, "Option list superseded before it landed");
            return Ok(self.selection.read().await.slots.len());
        }

        let slots = group_time_slots(&options);
        let slot_count = slots.len();
        let selected = slots.first().map(|s| s.time.clone());
        *self.selection.write().await = Selection {
            options,
            slots,
            selected: selected.clone(),
        };
        info!(
            tour_id = context.tour_id,
            travel_date = %context.travel_date,
            slots = slot_count,
            "Tour options grouped"
        );

        if let Some(time) = selected {
            self.check_slot(&time, generation, &token).await;
        }
        Ok(slot_count)
    }

    /// Switch to another travel date and refetch
    pub async fn change_date(&self, travel_date: &str) -> CoreResult<usize> {
        let mut next = self.context().await;
        next.travel_date = travel_date.trim().to_string();
        next.options_query()?;

        *self.context.write().await = next;
        self.refresh().await
    }

    /// Select a slot by raw start time. Its options are checked only when the
    /// selection actually changes; in-flight checks of the old slot keep going.
    pub async fn select_slot(&self, time: &str) -> Result<(), SelectionError> {
        let changed = {
            let mut selection = self.selection.write().await;
            if !selection.slots.iter().any(|s| s.time == time) {
                return Err(SelectionError::UnknownSlot(time.to_string()));
            }
            let changed = selection.selected.as_deref() != Some(time);
            selection.selected = Some(time.to_string());
            changed
        };

        if changed {
            info!(time, "Time slot selected");
            self.check_selected().await;
        }
        Ok(())
    }

    /// Start checks for every option in the selected slot that has none yet
    pub async fn check_selected(&self) {
        let selected = self.selection.read().await.selected.clone();
        if let Some(time) = selected {
            let (generation, token) = {
                let current = self.generation.lock().await;
                (current.id, current.token.clone())
            };
            self.check_slot(&time, generation, &token).await;
        }
    }

    pub async fn selected_time(&self) -> Option<String> {
        self.selection.read().await.selected.clone()
    }

    pub async fn slots(&self) -> Vec<TimeSlot> {
        self.selection.read().await.slots.clone()
    }

    pub async fn availability(&self, tour_option_id: i64) -> AvailabilityState {
        self.board.state(tour_option_id).await
    }

    /// Gate for "Book Now": only an `Available` option yields a booking intent
    pub async fn book_now(&self, tour_option_id: i64) -> Result<BookingIntent, BookingError> {
        let option = self
            .selection
            .read()
            .await
            .options
            .iter()
            .find(|o| o.tour_option_id == tour_option_id)
            .cloned()
            .ok_or(BookingError::UnknownOption(tour_option_id))?;

        match self.board.state(tour_option_id).await {
            AvailabilityState::Available => {
                let context = self.context().await;
                let intent = BookingIntent::for_option(&option, &context.travel_date);
                info!(
                    tour_id = intent.tour_id,
                    tour_option_id,
                    start_time = %intent.start_time,
                    "Handing off to booking"
                );
                Ok(intent)
            }
            AvailabilityState::Checking => Err(BookingError::CheckInProgress),
            AvailabilityState::Unchecked => Err(BookingError::NotChecked),
            AvailabilityState::Unavailable { message } => Err(BookingError::SoldOut { message }),
        }
    }

    pub async fn view(&self) -> AggregatorView {
        self.view_at(Local::now().naive_local()).await
    }

    pub async fn view_at(&self, now: NaiveDateTime) -> AggregatorView {
        let context = self.context().await;
        let travel_day = context.travel_day();
        let states = self.board.snapshot().await;
        let selection = self.selection.read().await;

        let slots = selection
            .slots
            .iter()
            .map(|slot| SlotView {
                time: slot.time.clone(),
                formatted_time: slot.formatted_time.clone(),
                selected: selection.selected.as_deref() == Some(slot.time.as_str()),
                options: slot
                    .available_options
                    .iter()
                    .map(|option| {
                        let availability = states
                            .get(&option.tour_option_id)
                            .cloned()
                            .unwrap_or(AvailabilityState::Unchecked);
                        OptionView {
                            option: option.clone(),
                            label: availability.label(),
                            bookable: availability.is_bookable(),
                            availability,
                            cutoff_passed: travel_day
                                .map(|day| option.cutoff_passed(day, now))
                                .unwrap_or(false),
                        }
                    })
                    .collect(),
            })
            .collect();

        AggregatorView {
            tour_id: context.tour_id,
            travel_date: context.travel_date,
            participants: context.participants,
            selected_time: selection.selected.clone(),
            slots,
        }
    }

    /// Wait for every availability check started so far
    pub async fn settle(&self) {
        let mut pending = std::mem::take(&mut *self.tasks.lock().await);
        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Availability task did not complete");
            }
        }
    }

    /// Cancel all outstanding requests; results arriving later are discarded
    pub fn close(&self) {
        self.root.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.root.is_cancelled()
    }

    async fn next_generation(&self) -> (u64, CancellationToken) {
        let mut current = self.generation.lock().await;
        current.token.cancel();
        let id = self.board.reset().await;
        let token = self.root.child_token();
        *current = Generation {
            id,
            token: token.clone(),
        };
        (id, token)
    }

    async fn check_slot(&self, time: &str, generation: u64, token: &CancellationToken) {
        let options = self
            .selection
            .read()
            .await
            .slots
            .iter()
            .find(|s| s.time == time)
            .map(|s| s.available_options.clone())
            .unwrap_or_default();
        let context = self.context().await;

        let mut tasks = self.tasks.lock().await;
        // Reap finished checks so a long-lived session keeps only live tasks
        while tasks.try_join_next().is_some() {}
        for option in options {
            let checker = self.checker.clone();
            let context = context.clone();
            let token = token.clone();
            tasks.spawn(async move { checker.check(&option, &context, generation, &token).await });
        }
    }
}

impl Drop for TourOptionAggregator {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
