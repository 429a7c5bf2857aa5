//! Plain-text rendering of a decoded snapshot.

use crate::models::StateSnapshot;

/// Renders a snapshot as a header line plus one line per aircraft, in the
/// order the service returned them.
pub fn render_report(snapshot: &StateSnapshot) -> String {
    let mut out = String::new();
    match snapshot.time {
        Some(time) => out.push_str(&format!(
            "State snapshot at {} ({} aircraft)\n",
            time.format("%Y-%m-%d %H:%M:%S"),
            snapshot.states.len()
        )),
        None => out.push_str("State snapshot: no aircraft in view\n"),
    }
    for state in &snapshot.states {
        out.push_str(&state.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local};

    use crate::models::AircraftState;

    fn state(icao24: &str) -> AircraftState {
        AircraftState {
            icao24: icao24.to_owned(),
            callsign: "TEST123 ".to_owned(),
            origin_country: "United States".to_owned(),
            time_position: None,
            last_contact: None,
            longitude: Some(-122.1),
            latitude: Some(37.6),
            baro_altitude: None,
            on_ground: false,
            velocity: None,
            true_track: None,
            vertical_rate: None,
            sensors: None,
            geo_altitude: None,
            squawk: None,
            spi: false,
            position_source: None,
            category: None,
        }
    }

    fn local(epoch: i64) -> DateTime<Local> {
        DateTime::from_timestamp(epoch, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    #[test]
    fn empty_snapshot_reports_nothing_in_view() {
        let snapshot = StateSnapshot {
            time: None,
            states: Vec::new(),
        };
        let report = render_report(&snapshot);
        assert_eq!(report, "State snapshot: no aircraft in view\n");
    }

    #[test]
    fn report_lists_aircraft_in_order() {
        let snapshot = StateSnapshot {
            time: Some(local(1_700_000_000)),
            states: vec![state("aaa111"), state("bbb222")],
        };
        let report = render_report(&snapshot);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2 aircraft"));
        assert!(lines[0].contains(&local(1_700_000_000).format("%Y-%m-%d %H:%M:%S").to_string()));
        assert!(lines[1].contains("aaa111"));
        assert!(lines[2].contains("bbb222"));
    }

    #[test]
    fn timed_snapshot_with_no_aircraft_reports_zero() {
        let snapshot = StateSnapshot {
            time: Some(local(1_700_000_000)),
            states: Vec::new(),
        };
        let report = render_report(&snapshot);
        assert!(report.contains("0 aircraft"));
    }
}
