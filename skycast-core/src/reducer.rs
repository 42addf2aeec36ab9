//! Collapses 3-hour samples into one entry per day.

use chrono::{Datelike, TimeZone, Weekday};

use crate::model::{DailyForecast, RawForecastEntry, round_half_up};

/// Number of days shown after today.
pub const FORECAST_DAYS: usize = 5;

/// Reduce provider samples (ascending by time) to at most [`FORECAST_DAYS`] daily entries.
///
/// Days are keyed by the weekday label in `tz`. The first sample of each weekday wins and
/// later samples of the same weekday are ignored. The first weekday seen is today, which
/// the current conditions already cover, so it is dropped.
pub fn reduce_daily<Tz: TimeZone>(entries: &[RawForecastEntry], tz: &Tz) -> Vec<DailyForecast> {
    let mut days: Vec<(Weekday, &RawForecastEntry)> = Vec::with_capacity(FORECAST_DAYS + 1);

    for entry in entries {
        let day = entry.time.with_timezone(tz).weekday();
        if !days.iter().any(|(seen, _)| *seen == day) {
            days.push((day, entry));
        }
    }

    days.into_iter()
        .skip(1)
        .take(FORECAST_DAYS)
        .map(|(day, entry)| DailyForecast {
            day,
            temperature: round_half_up(entry.temperature_c),
            condition: entry.condition.clone(),
        })
        .collect()
}
