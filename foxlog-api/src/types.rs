//! Decoding of war service payloads into core types.
//!
//! Decoding works on `serde_json::Value` so that a missing required field is
//! reported by name instead of as a generic deserialisation failure.

use serde_json::Value;

use foxlog_core::types::{MapItem, WarId, WarInfo};

use crate::error::ApiError;

/// Decode the `/worldconquest/war` payload.
///
/// `warId`, `warNumber` and `conquestStartTime` are required; the resistance
/// markers are optional and `null` means absent.
///
/// # Errors
/// Returns [`ApiError::MalformedResponse`] if a required field is missing or
/// has the wrong type.
pub fn parse_war_info(url: &str, json: &Value) -> Result<WarInfo, ApiError> {
    let war_id = match &json["warId"] {
        Value::String(id) => WarId(id.clone()),
        Value::Number(id) => WarId(id.to_string()),
        _ => return Err(ApiError::malformed(url, "missing warId")),
    };

    let war_number = json["warNumber"]
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ApiError::malformed(url, "missing warNumber"))?;

    let conquest_start_time = timestamp_ms(&json["conquestStartTime"])
        .ok_or_else(|| ApiError::malformed(url, "missing conquestStartTime"))?;

    Ok(WarInfo {
        war_id,
        war_number,
        conquest_start_time,
        resistance_start_time: timestamp_ms(&json["resistanceStartTime"]),
        conquest_end_time: timestamp_ms(&json["conquestEndTime"]),
    })
}

/// Decode the `/worldconquest/maps` payload.
///
/// # Errors
/// Returns [`ApiError::MalformedResponse`] if the body is not a list of strings.
pub fn parse_map_names(url: &str, json: Value) -> Result<Vec<String>, ApiError> {
    serde_json::from_value(json).map_err(|e| ApiError::malformed(url, e.to_string()))
}

/// Decode a `/dynamic/public` payload into its map items.
///
/// A payload without `mapItems` is an empty snapshot.
///
/// # Errors
/// Returns [`ApiError::MalformedResponse`] if `mapItems` is present but not a
/// list of map items.
pub fn parse_map_items(url: &str, mut json: Value) -> Result<Vec<MapItem>, ApiError> {
    match json.get_mut("mapItems").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => {
            serde_json::from_value(items).map_err(|e| ApiError::malformed(url, e.to_string()))
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp_ms(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|ms| ms as i64))
}
