//! Panel state machine: `Idle -> Loading -> Ready | Error`, with pure transitions.

use crate::model::WeatherSnapshot;

/// Monotonic id handed out for every user-visible trigger.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started { request: RequestId },
    Succeeded { request: RequestId, snapshot: WeatherSnapshot },
    Failed { request: RequestId, message: String },
}

impl Event {
    pub fn request(&self) -> RequestId {
        match self {
            Event::Started { request }
            | Event::Succeeded { request, .. }
            | Event::Failed { request, .. } => *request,
        }
    }
}

/// What the presenter should draw for a given state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Idle,
    Loading,
    Error(&'a str),
    Ready(&'a WeatherSnapshot),
}

/// The single weather panel: current status, the last good snapshot and the newest
/// request issued.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    status: Status,
    snapshot: Option<WeatherSnapshot>,
    latest_request: RequestId,
}

impl PanelState {
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The retained snapshot, even while an error is shown.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Completions for anything but the newest request are dropped, so an older
    /// lookup finishing late never overwrites a newer one.
    pub fn apply(self, event: Event) -> Self {
        match event {
            Event::Started { request } if request > self.latest_request => {
                Self { status: Status::Loading, latest_request: request, ..self }
            }
            Event::Succeeded { request, snapshot } if request == self.latest_request => {
                Self { status: Status::Ready, snapshot: Some(snapshot), ..self }
            }
            Event::Failed { request, message } if request == self.latest_request => {
                Self { status: Status::Error(message), ..self }
            }
            _ => self,
        }
    }

    /// Loading wins over everything; an error hides the retained snapshot.
    pub fn view(&self) -> View<'_> {
        match (&self.status, &self.snapshot) {
            (Status::Loading, _) => View::Loading,
            (Status::Error(message), _) => View::Error(message),
            (Status::Ready, Some(snapshot)) => View::Ready(snapshot),
            _ => View::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, CurrentConditions};

    fn snapshot(city: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            current: CurrentConditions {
                city: city.to_string(),
                temperature: 16,
                condition: Condition::Clear,
                humidity: 40,
                wind_speed_kmh: 18,
            },
            forecast: vec![],
        }
    }

    fn run(events: Vec<Event>) -> PanelState {
        events.into_iter().fold(PanelState::default(), PanelState::apply)
    }

    #[test]
    fn starts_idle_with_nothing_to_show() {
        let state = PanelState::default();
        assert_eq!(state.status(), &Status::Idle);
        assert_eq!(state.view(), View::Idle);
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn successful_lookup_becomes_ready() {
        let state = run(vec![
            Event::Started { request: 1 },
            Event::Succeeded { request: 1, snapshot: snapshot("New York") },
        ]);

        assert_eq!(state.status(), &Status::Ready);
        assert_eq!(state.view(), View::Ready(&snapshot("New York")));
    }

    #[test]
    fn loading_is_shown_while_in_flight() {
        let state = run(vec![
            Event::Started { request: 1 },
            Event::Succeeded { request: 1, snapshot: snapshot("Oslo") },
            Event::Started { request: 2 },
        ]);

        assert!(state.is_loading());
        assert_eq!(state.view(), View::Loading);
    }

    #[test]
    fn failure_hides_but_keeps_previous_snapshot() {
        let state = run(vec![
            Event::Started { request: 1 },
            Event::Succeeded { request: 1, snapshot: snapshot("New York") },
            Event::Started { request: 2 },
            Event::Failed { request: 2, message: "City not found".into() },
        ]);

        assert_eq!(state.view(), View::Error("City not found"));
        assert_eq!(state.error(), Some("City not found"));
        assert_eq!(state.snapshot(), Some(&snapshot("New York")));
    }

    #[test]
    fn new_trigger_clears_error() {
        let state = run(vec![
            Event::Started { request: 1 },
            Event::Failed { request: 1, message: "boom".into() },
            Event::Started { request: 2 },
        ]);

        assert_eq!(state.error(), None);
        assert!(state.is_loading());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let state = run(vec![
            Event::Started { request: 1 },
            Event::Started { request: 2 },
            Event::Succeeded { request: 2, snapshot: snapshot("Berlin") },
            Event::Succeeded { request: 1, snapshot: snapshot("Paris") },
            Event::Failed { request: 1, message: "late".into() },
        ]);

        assert_eq!(state.status(), &Status::Ready);
        assert_eq!(state.snapshot().map(|s| s.current.city.as_str()), Some("Berlin"));
    }

    #[test]
    fn out_of_order_start_is_ignored() {
        let state = run(vec![Event::Started { request: 3 }, Event::Started { request: 2 }]);
        assert_eq!(state.latest_request(), 3);
    }
}
