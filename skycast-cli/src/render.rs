//! Text rendering of the weather panel.

use skycast_core::{Condition, View, WeatherSnapshot};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Sun,
    Cloud,
    Rain,
    Snow,
    Storm,
    Fog,
}

impl Icon {
    pub fn for_condition(condition: &Condition) -> Self {
        match condition {
            Condition::Clear => Icon::Sun,
            Condition::Clouds => Icon::Cloud,
            Condition::Rain => Icon::Rain,
            Condition::Snow => Icon::Snow,
            Condition::Thunderstorm => Icon::Storm,
            Condition::Other(_) => Icon::Fog,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Sun => "☀",
            Icon::Cloud => "☁",
            Icon::Rain => "🌧",
            Icon::Snow => "❄",
            Icon::Storm => "⛈",
            Icon::Fog => "🌫",
        }
    }
}

/// The whole panel for one state, ready to print.
#[derive(Debug, Clone, Copy)]
pub struct Panel<'a>(pub View<'a>);

impl fmt::Display for Panel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            View::Idle => Ok(()),
            View::Loading => writeln!(f, "Loading..."),
            View::Error(message) => writeln!(f, "{message}"),
            View::Ready(snapshot) => write_snapshot(f, snapshot),
        }
    }
}

fn write_snapshot(f: &mut fmt::Formatter<'_>, snapshot: &WeatherSnapshot) -> fmt::Result {
    let current = &snapshot.current;
    let icon = Icon::for_condition(&current.condition).glyph();

    writeln!(f, "{}", current.city)?;
    writeln!(f, "{icon}  {}°C", current.temperature)?;
    writeln!(f, "{}", current.condition)?;
    writeln!(f, "Humidity: {}%  Wind: {} km/h", current.humidity, current.wind_speed_kmh)?;

    if snapshot.forecast.is_empty() {
        return Ok(());
    }

    writeln!(f)?;
    writeln!(f, "5-Day Forecast")?;
    for day in &snapshot.forecast {
        let icon = Icon::for_condition(&day.condition).glyph();
        writeln!(f, "{}  {icon}  {:>3}°C", day.day, day.temperature)?;
    }

    Ok(())
}
