//! Line item id generation.

use chrono::Utc;

use crate::types::LineItemId;

/// Source of fresh line item ids.
///
/// Ids only need to be unique within one cart. The store additionally bumps
/// every generated id past the largest id already in the cart, so a source
/// may restart (e.g. on a new page load) without colliding with hydrated
/// items.
pub trait IdSource: Send {
    /// Produce the next id. Successive calls must return increasing values.
    fn next_id(&mut self) -> LineItemId;
}

/// Clock-based ids: milliseconds since the Unix epoch, strictly increasing
/// even when several items are created within the same millisecond.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: i64,
}

impl ClockIds {
    /// Create a new clock-based id source.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }
}

impl IdSource for ClockIds {
    fn next_id(&mut self) -> LineItemId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        LineItemId::new(self.last)
    }
}

/// Deterministic ids counting up from a starting value.
#[derive(Debug)]
pub struct SequentialIds {
    next: i64,
}

impl SequentialIds {
    /// Start counting at `first`.
    #[must_use]
    pub const fn starting_at(first: i64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> LineItemId {
        let id = LineItemId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}
