//! Lap-time series for the lap chart.

use std::collections::BTreeMap;

use crate::openf1::LapRecord;

/// Laps slower than this are in/out laps or neutralised running.
pub const MAX_CHART_LAP_SECS: f64 = 200.0;
pub const MAX_CHART_DRIVERS: usize = 4;
pub const MAX_CHART_LAPS: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct LapChartRow {
    pub lap: u32,
    /// One entry per chart driver, in [`LapChart::drivers`] order.
    pub times: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LapChart {
    pub drivers: Vec<u32>,
    pub rows: Vec<LapChartRow>,
}

/// Chart the lowest-numbered drivers with valid laps. `None` when no lap is usable.
#[must_use]
pub fn lap_chart(laps: &[LapRecord]) -> Option<LapChart> {
    let mut by_driver: BTreeMap<u32, BTreeMap<u32, f64>> = BTreeMap::new();
    for lap in laps {
        let (Some(driver), Some(number), Some(secs)) = (lap.driver_number, lap.lap_number, lap.lap_duration) else {
            continue;
        };
        if !(secs.is_finite() && secs > 0.0 && secs <= MAX_CHART_LAP_SECS) {
            continue;
        }
        by_driver.entry(driver).or_default().entry(number).or_insert(secs);
    }

    let max_lap = by_driver.values().filter_map(|laps| laps.keys().next_back()).max().copied()?;
    let drivers: Vec<u32> = by_driver.keys().take(MAX_CHART_DRIVERS).copied().collect();

    let rows = (1..=max_lap.min(MAX_CHART_LAPS))
        .map(|lap| LapChartRow {
            lap,
            times: drivers
                .iter()
                .map(|d| by_driver.get(d).and_then(|laps| laps.get(&lap)).copied())
                .collect(),
        })
        .collect();

    Some(LapChart { drivers, rows })
}
