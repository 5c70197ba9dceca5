//! GitHub API response types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Event type GitHub reports for a push to any repository.
pub const PUSH_EVENT: &str = "PushEvent";

/// One entry of `GET /users/{username}/events/public`.
///
/// Only the fields the activity calculation reads are modelled.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GitHubEvent {
    /// GitHub's event id.
    pub id: String,
    /// e.g. `PushEvent`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// When the event happened.
    pub created_at: DateTime<Utc>,
}

impl GitHubEvent {
    /// True for pushes.
    pub fn is_push(&self) -> bool {
        self.event_type == PUSH_EVENT
    }

    /// Whether the event happened on a day inside `[start, end]`.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let day = self.created_at.date_naive();
        start <= day && day <= end
    }
}

/// Push activity of one user over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushActivity {
    /// `false` when GitHub does not know the user.
    pub user_found: bool,
    /// Pushes inside the range.
    pub push_events: u32,
}

impl PushActivity {
    /// Activity recorded for a user GitHub answered 404 for.
    pub fn unknown_user() -> Self {
        Self {
            user_found: false,
            push_events: 0,
        }
    }

    /// Count push events inside `[start, end]` for a known user.
    pub fn count(events: &[GitHubEvent], start: NaiveDate, end: NaiveDate) -> Self {
        let push_events = events
            .iter()
            .filter(|e| e.is_push() && e.within(start, end))
            .count();
        Self {
            user_found: true,
            push_events: u32::try_from(push_events).unwrap_or(u32::MAX),
        }
    }
}
