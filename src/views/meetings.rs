//! Season meetings list from the live-session API.

use crate::openf1::MeetingRecord;
use crate::views::format::PLACEHOLDER;
use crate::views::timing::non_empty;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRow {
    /// 1-based position in the provider's list.
    pub index: usize,
    pub meeting_key: Option<u32>,
    pub name: String,
    /// `"{location}, {country}"`, or whichever part is present.
    pub place: String,
    /// `YYYY-MM-DD`, or the placeholder.
    pub date: String,
}

/// One row per meeting, in provider order.
#[must_use]
pub fn meetings(records: &[MeetingRecord]) -> Vec<MeetingRow> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let location = non_empty(record.location.as_deref());
            let country = non_empty(record.country_name.as_deref());
            let place = match (location, country) {
                (Some(location), Some(country)) => format!("{location}, {country}"),
                (Some(only), None) | (None, Some(only)) => only.to_string(),
                (None, None) => PLACEHOLDER.to_string(),
            };
            MeetingRow {
                index: idx + 1,
                meeting_key: record.meeting_key,
                name: non_empty(record.meeting_name.as_deref()).unwrap_or("TBA").to_string(),
                place,
                date: non_empty(record.date_start.as_deref())
                    .and_then(|start| start.split('T').next())
                    .unwrap_or(PLACEHOLDER)
                    .to_string(),
            }
        })
        .collect()
}
