use chrono::{DateTime, Duration, Utc};

/// Minutes around a session's scheduled interval during which joining is
/// permitted. The three call sites use different windows on purpose; keep
/// them as distinct constants rather than unifying them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinWindow {
    pub lead_min: i64,
    pub lag_min: i64,
}

/// Used before a booking exists, to classify a selected slot as "now".
pub const PRE_BOOKING_WINDOW: JoinWindow = JoinWindow { lead_min: 5, lag_min: 0 };

/// Developer dashboard join button.
pub const DEVELOPER_VIEW_WINDOW: JoinWindow = JoinWindow { lead_min: 15, lag_min: 0 };

/// Client dashboard join button.
pub const CLIENT_VIEW_WINDOW: JoinWindow = JoinWindow { lead_min: 10, lag_min: 10 };

/// True when `now` falls within `[start - lead, end + lag]`, inclusive on
/// both ends. `now` is always injected so callers and tests control the clock.
pub fn is_joinable(
    session_start: DateTime<Utc>,
    session_end: DateTime<Utc>,
    now: DateTime<Utc>,
    window: JoinWindow,
) -> bool {
    let opens = session_start - Duration::minutes(window.lead_min);
    let closes = session_end + Duration::minutes(window.lag_min);
    now >= opens && now <= closes
}
