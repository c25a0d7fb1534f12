//! Session header.

use crate::openf1::SessionRecord;
use crate::views::timing::non_empty;

/// `"{name} — {location}"`, falling back to the session type, then `Session`.
#[must_use]
pub fn session_label(session: &SessionRecord) -> String {
    let name = non_empty(session.session_name.as_deref())
        .or_else(|| non_empty(session.session_type.as_deref()))
        .unwrap_or("Session");
    let location = non_empty(session.location.as_deref())
        .or_else(|| non_empty(session.circuit_short_name.as_deref()))
        .unwrap_or("—");
    format!("{name} — {location}")
}
