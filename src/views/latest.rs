//! Latest-by-key reduction.
//!
//! Collapses a time series into one current record per entity. Ties on the
//! ordering value go to the record that appears last in the input.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Keep, for every key, the record with the greatest `order` value.
///
/// Records for which `key` returns `None` are skipped. On equal order values
/// the later record in input order replaces the earlier one.
pub fn latest_by_key<'a, T, K, O>(
    records: &'a [T],
    key: impl Fn(&T) -> Option<K>,
    order: impl Fn(&T) -> O,
) -> BTreeMap<K, &'a T>
where
    K: Ord,
    O: Ord,
{
    let mut latest: BTreeMap<K, (O, &'a T)> = BTreeMap::new();
    for record in records {
        let Some(k) = key(record) else {
            continue;
        };
        let rank = order(record);
        match latest.entry(k) {
            Entry::Vacant(slot) => {
                slot.insert((rank, record));
            }
            Entry::Occupied(mut slot) => {
                if rank >= slot.get().0 {
                    slot.insert((rank, record));
                }
            }
        }
    }
    latest
        .into_iter()
        .map(|(k, (_, record))| (k, record))
        .collect()
}

/// Parse a provider timestamp (RFC 3339, e.g. `2024-09-01T13:03:35.292000+00:00`).
///
/// Missing or unparseable timestamps are `None`, which orders below every
/// parsed instant.
#[must_use]
pub fn parse_timestamp(raw: Option<&str>) -> Option<OffsetDateTime> {
    raw.and_then(|s| OffsetDateTime::parse(s.trim(), &Rfc3339).ok())
}

#[cfg(test)]
#[path = "latest_test.rs"]
mod tests;
