//! Typed view of the OpenSky `/states/all` payload.
//!
//! The endpoint returns each aircraft as a positional JSON array, not an
//! object, so deserialization happens in two steps: serde gets the response
//! to `StateVectorResponse`, then the table-driven decoder turns every raw
//! entry into an [`AircraftState`].

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::{Result, SkyringError};

/// Number of leading fields every state entry must carry.
pub const REQUIRED_FIELDS: usize = 16;

/// Value type of a wire field, used for decode diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Epoch,
    Float,
    Bool,
    IntList,
    SmallInt,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Epoch => "an integer epoch timestamp",
            FieldKind::Float => "a number",
            FieldKind::Bool => "a boolean",
            FieldKind::IntList => "an array of integers",
            FieldKind::SmallInt => "a small integer",
        }
    }
}

/// One column of the positional state-vector layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub index: usize,
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

const fn field(index: usize, name: &'static str, kind: FieldKind, nullable: bool) -> FieldSpec {
    FieldSpec {
        index,
        name,
        kind,
        nullable,
    }
}

/// The positional layout of a state entry, in wire order. Indices 0 through
/// 15 are required; 16 and 17 appear only in newer responses.
pub const STATE_FIELDS: [FieldSpec; 18] = [
    field(0, "icao24", FieldKind::Text, false),
    field(1, "callsign", FieldKind::Text, true),
    field(2, "origin_country", FieldKind::Text, false),
    field(3, "time_position", FieldKind::Epoch, true),
    field(4, "last_contact", FieldKind::Epoch, true),
    field(5, "longitude", FieldKind::Float, true),
    field(6, "latitude", FieldKind::Float, true),
    field(7, "baro_altitude", FieldKind::Float, true),
    field(8, "on_ground", FieldKind::Bool, false),
    field(9, "velocity", FieldKind::Float, true),
    field(10, "true_track", FieldKind::Float, true),
    field(11, "vertical_rate", FieldKind::Float, true),
    field(12, "sensors", FieldKind::IntList, true),
    field(13, "geo_altitude", FieldKind::Float, true),
    field(14, "squawk", FieldKind::Text, true),
    field(15, "spi", FieldKind::Bool, false),
    field(16, "position_source", FieldKind::SmallInt, true),
    field(17, "category", FieldKind::SmallInt, true),
];

/// Raw response body of `/states/all` before positional decoding.
#[derive(Debug, Deserialize)]
pub struct StateVectorResponse {
    pub time: Option<i64>,
    pub states: Option<Vec<Vec<Value>>>,
}

/// One aircraft, decoded from its positional entry.
///
/// String fields keep the wire text as-is; in particular `callsign` retains
/// its trailing padding. Timestamps are converted from epoch seconds to the
/// local timezone. A wire null for `callsign` becomes the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftState {
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub time_position: Option<DateTime<Local>>,
    pub last_contact: Option<DateTime<Local>>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub on_ground: bool,
    pub velocity: Option<f64>,
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<u64>>,
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: bool,
    pub position_source: Option<u8>,
    pub category: Option<u8>,
}

/// A decoded response: the snapshot time plus every aircraft in wire order.
///
/// `time: None` means the service had no aircraft in view for the query.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub time: Option<DateTime<Local>>,
    pub states: Vec<AircraftState>,
}

impl StateVectorResponse {
    /// Decodes every raw entry, failing on the first malformed one.
    pub fn decode(self) -> Result<StateSnapshot> {
        let time = match self.time {
            Some(seconds) => Some(local_datetime(seconds)?),
            None => None,
        };
        let mut states = Vec::new();
        if let Some(entries) = self.states {
            states.reserve(entries.len());
            for entry in &entries {
                states.push(AircraftState::try_from(entry.as_slice())?);
            }
        }
        Ok(StateSnapshot { time, states })
    }
}

// Unmarshal one positional JSON entry into an AircraftState, checking every
// field against the layout table.
impl TryFrom<&[Value]> for AircraftState {
    type Error = SkyringError;

    fn try_from(entry: &[Value]) -> Result<Self> {
        if entry.len() < REQUIRED_FIELDS {
            let missing = &STATE_FIELDS[entry.len()];
            return Err(SkyringError::Decode(format!(
                "state entry has {} fields, missing required field {} ({})",
                entry.len(),
                missing.index,
                missing.name
            )));
        }
        if entry.len() != REQUIRED_FIELDS && entry.len() != STATE_FIELDS.len() {
            warn!(
                fields = entry.len(),
                "state entry has an unexpected number of fields, decoding the known columns"
            );
        }

        Ok(AircraftState {
            icao24: take_str(entry, 0)?,
            callsign: take_opt_str(entry, 1)?.unwrap_or_default(),
            origin_country: take_str(entry, 2)?,
            time_position: take_opt_epoch(entry, 3)?,
            last_contact: take_opt_epoch(entry, 4)?,
            longitude: take_opt_f64(entry, 5)?,
            latitude: take_opt_f64(entry, 6)?,
            baro_altitude: take_opt_f64(entry, 7)?,
            on_ground: take_bool(entry, 8)?,
            velocity: take_opt_f64(entry, 9)?,
            true_track: take_opt_f64(entry, 10)?,
            vertical_rate: take_opt_f64(entry, 11)?,
            sensors: take_sensors(entry, 12)?,
            geo_altitude: take_opt_f64(entry, 13)?,
            squawk: take_opt_str(entry, 14)?,
            spi: take_bool(entry, 15)?,
            position_source: take_trailing_u8(entry, 16)?,
            category: take_trailing_u8(entry, 17)?,
        })
    }
}

impl std::fmt::Display for AircraftState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callsign = self.callsign.trim();
        write!(
            f,
            "{:<6} {:<8} [{}]",
            self.icao24,
            if callsign.is_empty() { "-" } else { callsign },
            self.origin_country
        )?;
        write!(f, " {}", if self.on_ground { "on ground" } else { "airborne" })?;
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            write!(f, " pos ({lat:.4}, {lon:.4})")?;
        }
        if let Some(alt) = self.baro_altitude {
            write!(f, " alt {alt:.0} m")?;
        }
        if let Some(velocity) = self.velocity {
            write!(f, " vel {velocity:.1} m/s")?;
        }
        if let Some(track) = self.true_track {
            write!(f, " trk {track:.0}°")?;
        }
        if let Some(squawk) = &self.squawk {
            write!(f, " squawk {squawk}")?;
        }
        if let Some(seen) = self.last_contact {
            write!(f, " seen {}", seen.format("%H:%M:%S"))?;
        }
        Ok(())
    }
}

fn local_datetime(epoch_seconds: i64) -> Result<DateTime<Local>> {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| {
            SkyringError::Decode(format!(
                "epoch timestamp {epoch_seconds} is outside the representable range"
            ))
        })
}

fn type_error(index: usize, value: &Value) -> SkyringError {
    let column = &STATE_FIELDS[index];
    let or_null = if column.nullable { " or null" } else { "" };
    SkyringError::Decode(format!(
        "state entry field {index} ({}) should be {}{or_null}, got {value}",
        column.name,
        column.kind.expected()
    ))
}

fn take_str(entry: &[Value], index: usize) -> Result<String> {
    let value = &entry[index];
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| type_error(index, value))
}

fn take_opt_str(entry: &[Value], index: usize) -> Result<Option<String>> {
    let value = &entry[index];
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_str()
        .map(|s| Some(s.to_owned()))
        .ok_or_else(|| type_error(index, value))
}

fn take_bool(entry: &[Value], index: usize) -> Result<bool> {
    let value = &entry[index];
    value.as_bool().ok_or_else(|| type_error(index, value))
}

fn take_opt_f64(entry: &[Value], index: usize) -> Result<Option<f64>> {
    let value = &entry[index];
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_f64()
        .map(Some)
        .ok_or_else(|| type_error(index, value))
}

fn take_opt_epoch(entry: &[Value], index: usize) -> Result<Option<DateTime<Local>>> {
    let value = &entry[index];
    if value.is_null() {
        return Ok(None);
    }
    let seconds = value.as_i64().ok_or_else(|| type_error(index, value))?;
    local_datetime(seconds).map(Some)
}

fn take_sensors(entry: &[Value], index: usize) -> Result<Option<Vec<u64>>> {
    let value = &entry[index];
    if value.is_null() {
        return Ok(None);
    }
    let items = value.as_array().ok_or_else(|| type_error(index, value))?;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        ids.push(item.as_u64().ok_or_else(|| type_error(index, value))?);
    }
    Ok(Some(ids))
}

// Indices 16/17 are optional trailing columns; a short entry is not an error
// for them.
fn take_trailing_u8(entry: &[Value], index: usize) -> Result<Option<u8>> {
    let value = match entry.get(index) {
        Some(value) => value,
        None => return Ok(None),
    };
    if value.is_null() {
        return Ok(None);
    }
    let raw = value.as_u64().ok_or_else(|| type_error(index, value))?;
    u8::try_from(raw)
        .map(Some)
        .map_err(|_| type_error(index, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_entry() -> Vec<Value> {
        let entry = json!([
            "a0b1c2",
            "UAL123  ",
            "United States",
            1_700_000_000,
            1_700_000_000,
            -122.1,
            37.6,
            1000.0,
            false,
            200.0,
            90.0,
            0.0,
            null,
            1050.0,
            "1200",
            false
        ]);
        entry.as_array().unwrap().clone()
    }

    fn local(epoch: i64) -> DateTime<Local> {
        DateTime::from_timestamp(epoch, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    #[test]
    fn field_table_indexes_are_dense() {
        for (position, column) in STATE_FIELDS.iter().enumerate() {
            assert_eq!(position, column.index);
        }
    }

    #[test]
    fn reference_entry_decodes() {
        let state = AircraftState::try_from(reference_entry().as_slice()).unwrap();
        assert_eq!(state.icao24, "a0b1c2");
        assert_eq!(state.callsign, "UAL123  ");
        assert_eq!(state.origin_country, "United States");
        assert_eq!(state.time_position, Some(local(1_700_000_000)));
        assert_eq!(state.last_contact, Some(local(1_700_000_000)));
        assert_eq!(state.longitude, Some(-122.1));
        assert_eq!(state.latitude, Some(37.6));
        assert_eq!(state.baro_altitude, Some(1000.0));
        assert!(!state.on_ground);
        assert_eq!(state.velocity, Some(200.0));
        assert_eq!(state.true_track, Some(90.0));
        assert_eq!(state.vertical_rate, Some(0.0));
        assert_eq!(state.sensors, None);
        assert_eq!(state.geo_altitude, Some(1050.0));
        assert_eq!(state.squawk.as_deref(), Some("1200"));
        assert!(!state.spi);
        assert_eq!(state.position_source, None);
        assert_eq!(state.category, None);
    }

    #[test]
    fn trailing_fields_decode_when_present() {
        let mut entry = reference_entry();
        entry.push(json!(0));
        entry.push(json!(10));
        let state = AircraftState::try_from(entry.as_slice()).unwrap();
        assert_eq!(state.position_source, Some(0));
        assert_eq!(state.category, Some(10));
    }

    #[test]
    fn lone_trailing_field_decodes_without_category() {
        let mut entry = reference_entry();
        entry.push(json!(2));
        let state = AircraftState::try_from(entry.as_slice()).unwrap();
        assert_eq!(state.position_source, Some(2));
        assert_eq!(state.category, None);
    }

    #[test]
    fn columns_past_category_are_ignored() {
        let mut entry = reference_entry();
        entry.push(json!(1));
        entry.push(json!(4));
        entry.push(json!("surplus"));
        let state = AircraftState::try_from(entry.as_slice()).unwrap();
        assert_eq!(state.position_source, Some(1));
        assert_eq!(state.category, Some(4));
    }

    #[test]
    fn short_entry_names_the_missing_field() {
        let entry = reference_entry()[..3].to_vec();
        let err = AircraftState::try_from(entry.as_slice()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SkyringError::Decode(_)));
        assert!(message.contains("3 fields"), "{message}");
        assert!(message.contains("time_position"), "{message}");
    }

    #[test]
    fn wrong_type_names_field_and_expectation() {
        let mut entry = reference_entry();
        entry[9] = json!("fast");
        let err = AircraftState::try_from(entry.as_slice()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("velocity"), "{message}");
        assert!(message.contains("a number"), "{message}");
    }

    #[test]
    fn null_callsign_becomes_empty_string() {
        let mut entry = reference_entry();
        entry[1] = Value::Null;
        let state = AircraftState::try_from(entry.as_slice()).unwrap();
        assert_eq!(state.callsign, "");
    }

    #[test]
    fn null_required_field_is_rejected() {
        let mut entry = reference_entry();
        entry[8] = Value::Null;
        let err = AircraftState::try_from(entry.as_slice()).unwrap_err();
        assert!(err.to_string().contains("on_ground"));
    }

    #[test]
    fn epoch_out_of_range_is_a_decode_error() {
        let mut entry = reference_entry();
        entry[3] = json!(i64::MAX);
        let err = AircraftState::try_from(entry.as_slice()).unwrap_err();
        assert!(matches!(err, SkyringError::Decode(_)));
    }

    #[test]
    fn sensors_decode_as_id_list() {
        let mut entry = reference_entry();
        entry[12] = json!([101, 202]);
        let state = AircraftState::try_from(entry.as_slice()).unwrap();
        assert_eq!(state.sensors, Some(vec![101, 202]));
    }

    #[test]
    fn null_body_decodes_to_empty_snapshot() {
        let response: StateVectorResponse =
            serde_json::from_str(r#"{"time": null, "states": null}"#).unwrap();
        let snapshot = response.decode().unwrap();
        assert_eq!(snapshot.time, None);
        assert!(snapshot.states.is_empty());
    }

    #[test]
    fn snapshot_preserves_wire_order() {
        let mut first = reference_entry();
        first[0] = json!("aaa111");
        let mut second = reference_entry();
        second[0] = json!("bbb222");
        let response = StateVectorResponse {
            time: Some(1_700_000_000),
            states: Some(vec![first, second]),
        };
        let snapshot = response.decode().unwrap();
        assert_eq!(snapshot.time, Some(local(1_700_000_000)));
        assert_eq!(snapshot.states[0].icao24, "aaa111");
        assert_eq!(snapshot.states[1].icao24, "bbb222");
    }

    #[test]
    fn one_bad_entry_fails_the_whole_decode() {
        let good = reference_entry();
        let bad = reference_entry()[..5].to_vec();
        let response = StateVectorResponse {
            time: Some(1_700_000_000),
            states: Some(vec![good, bad]),
        };
        assert!(response.decode().is_err());
    }

    // Re-encode through the wire layout so decode(encode(x)) == x can be
    // checked without a live response.
    fn encode(state: &AircraftState) -> Vec<Value> {
        let mut entry = vec![
            json!(state.icao24),
            json!(state.callsign),
            json!(state.origin_country),
            json!(state.time_position.map(|t| t.timestamp())),
            json!(state.last_contact.map(|t| t.timestamp())),
            json!(state.longitude),
            json!(state.latitude),
            json!(state.baro_altitude),
            json!(state.on_ground),
            json!(state.velocity),
            json!(state.true_track),
            json!(state.vertical_rate),
            json!(state.sensors),
            json!(state.geo_altitude),
            json!(state.squawk),
            json!(state.spi),
        ];
        if state.position_source.is_some() || state.category.is_some() {
            entry.push(json!(state.position_source));
            entry.push(json!(state.category));
        }
        entry
    }

    #[test]
    fn decode_inverts_encode() {
        let mut full = AircraftState::try_from(reference_entry().as_slice()).unwrap();
        full.sensors = Some(vec![7]);
        full.position_source = Some(1);
        full.category = Some(4);

        let decoded = AircraftState::try_from(encode(&full).as_slice()).unwrap();
        assert_eq!(decoded, full);

        let sparse = AircraftState::try_from(reference_entry().as_slice()).unwrap();
        let decoded = AircraftState::try_from(encode(&sparse).as_slice()).unwrap();
        assert_eq!(decoded, sparse);

        // nulls must survive the trip as nulls, not defaults
        let mut nulled = sparse.clone();
        nulled.time_position = None;
        nulled.last_contact = None;
        nulled.longitude = None;
        nulled.latitude = None;
        nulled.baro_altitude = None;
        nulled.velocity = None;
        nulled.true_track = None;
        nulled.vertical_rate = None;
        nulled.geo_altitude = None;
        nulled.squawk = None;
        let decoded = AircraftState::try_from(encode(&nulled).as_slice()).unwrap();
        assert_eq!(decoded, nulled);
    }

    #[test]
    fn display_appends_only_present_fields() {
        let state = AircraftState::try_from(reference_entry().as_slice()).unwrap();
        let line = state.to_string();
        assert!(line.contains("a0b1c2"));
        assert!(line.contains("UAL123"));
        assert!(line.contains("airborne"));
        assert!(line.contains("pos (37.6000, -122.1000)"));
        assert!(line.contains("squawk 1200"));

        let mut entry = reference_entry();
        for index in [3, 4, 5, 6, 7, 9, 10, 11, 13, 14] {
            entry[index] = Value::Null;
        }
        let sparse = AircraftState::try_from(entry.as_slice()).unwrap();
        let line = sparse.to_string();
        assert!(!line.contains("pos"));
        assert!(!line.contains("squawk"));
        assert!(!line.contains("seen"));
    }
}
