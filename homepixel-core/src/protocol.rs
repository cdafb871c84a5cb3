//! HTTP-Protokoll des Mikrocontrollers
//!
//! Pfade und JSON-Formen der Geräte-Endpoints.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::types::{LedFrame, Preset};

/// Lebenszeichen (beliebige 2xx Antwort)
pub const STATUS_PATH: &str = "/status";
/// Aktueller Zustand: `{ current_preset?, led_colors? }`
pub const CURRENT_PATH: &str = "/current";
/// Farben setzen: JSON-Array mit 12 Wire-Strings
pub const SET_COLOR_PATH: &str = "/setcolor";
/// Preset aktivieren: `{ preset }`
pub const PRESET_PATH: &str = "/preset";
/// Preset-Liste: `{ presets: [...] }`
pub const AVAILABLE_PRESETS_PATH: &str = "/available_presets";

/// Antwort von `/current`
///
/// `led_colors` bleibt untypisiert, damit eine kaputte Farbliste nicht das
/// Preset-Feld mitreißt.
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    current_preset: Option<String>,
    #[serde(default)]
    led_colors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PresetList {
    #[serde(default)]
    presets: Vec<Preset>,
}

#[derive(Debug, Serialize)]
struct PresetRequest<'a> {
    preset: &'a str,
}

/// Vom Gerät gemeldeter Zustand nach der Validierung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    /// Leer, wenn das Gerät kein Preset meldet
    pub active_preset: String,
    /// `None`, wenn `led_colors` fehlt oder kein gültiger Frame ist
    pub frame: Option<LedFrame>,
}

/// Dekodiert die Antwort von `/current`
pub fn decode_current(body: &[u8]) -> Result<DeviceSnapshot, DeviceError> {
    let response: CurrentResponse =
        serde_json::from_slice(body).map_err(|_| DeviceError::MalformedPayload)?;

    let active_preset = response
        .current_preset
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_default();

    let frame = response.led_colors.and_then(|value| frame_from_json(&value));

    Ok(DeviceSnapshot {
        active_preset,
        frame,
    })
}

fn frame_from_json(value: &serde_json::Value) -> Option<LedFrame> {
    let colors = value
        .as_array()?
        .iter()
        .map(|entry| entry.as_str())
        .collect::<Option<Vec<&str>>>()?;

    match LedFrame::from_wire(&colors) {
        Ok(frame) => Some(frame),
        Err(e) => {
            log::warn!("SYNC: Ignoring led_colors from device: {e:?}");
            None
        }
    }
}

/// Dekodiert die Antwort von `/available_presets`
pub fn decode_presets(body: &[u8]) -> Result<Vec<Preset>, DeviceError> {
    serde_json::from_slice::<PresetList>(body)
        .map(|list| list.presets)
        .map_err(|_| DeviceError::MalformedPayload)
}

/// Body für `/setcolor`
pub fn encode_frame(frame: &LedFrame) -> Result<Vec<u8>, DeviceError> {
    serde_json::to_vec(&frame.to_wire()).map_err(|_| DeviceError::MalformedPayload)
}

/// Body für `/preset`
pub fn encode_preset(name: &str) -> Result<Vec<u8>, DeviceError> {
    serde_json::to_vec(&PresetRequest { preset: name }).map_err(|_| DeviceError::MalformedPayload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LED_COUNT;
    use rgb::RGB8;

    #[test]
    fn test_decode_current_full() {
        let body = br#"{"current_preset":"rainbow","led_colors":["1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3","1,2,3"]}"#;
        let snapshot = decode_current(body).unwrap();
        assert_eq!(snapshot.active_preset, "rainbow");
        assert_eq!(
            snapshot.frame,
            Some(LedFrame::filled(RGB8 { r: 1, g: 2, b: 3 }))
        );
    }

    #[test]
    fn test_decode_current_blank_preset_is_empty() {
        let snapshot = decode_current(br#"{"current_preset":"  "}"#).unwrap();
        assert_eq!(snapshot.active_preset, "");
        assert_eq!(snapshot.frame, None);

        let snapshot = decode_current(br#"{}"#).unwrap();
        assert_eq!(snapshot.active_preset, "");
    }

    #[test]
    fn test_decode_current_bad_colors_keep_preset() {
        let snapshot =
            decode_current(br#"{"current_preset":"fire","led_colors":"255,0,0"}"#).unwrap();
        assert_eq!(snapshot.active_preset, "fire");
        assert_eq!(snapshot.frame, None);

        let snapshot = decode_current(br#"{"led_colors":["255,0,0","255,0,0"]}"#).unwrap();
        assert_eq!(snapshot.frame, None);

        let snapshot = decode_current(br#"{"led_colors":[1,2,3]}"#).unwrap();
        assert_eq!(snapshot.frame, None);
    }

    #[test]
    fn test_decode_current_malformed() {
        assert_eq!(decode_current(b"not json"), Err(DeviceError::MalformedPayload));
        assert_eq!(decode_current(b"[1,2]"), Err(DeviceError::MalformedPayload));
        assert_eq!(
            decode_current(br#"{"current_preset":5}"#),
            Err(DeviceError::MalformedPayload)
        );
    }

    #[test]
    fn test_decode_presets() {
        let body = br#"{"presets":[{"name":"rainbow","description":"Regenbogen","color_temp":"cool","type":"animation"},{"name":"warm"}]}"#;
        let presets = decode_presets(body).unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].kind, "animation");
        assert_eq!(presets[0].description, "Regenbogen");
        assert_eq!(presets[1], Preset::named("warm"));
    }

    #[test]
    fn test_decode_presets_malformed() {
        assert_eq!(
            decode_presets(br#"{"presets":[{"description":"no name"}]}"#),
            Err(DeviceError::MalformedPayload)
        );
        assert_eq!(decode_presets(b""), Err(DeviceError::MalformedPayload));
    }

    #[test]
    fn test_encode_frame_is_json_array() {
        let body = encode_frame(&LedFrame::filled(RGB8 { r: 255, g: 0, b: 0 })).unwrap();
        let decoded: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded.len(), LED_COUNT);
        assert!(decoded.iter().all(|c| c == "255,0,0"));
    }

    #[test]
    fn test_encode_preset() {
        assert_eq!(encode_preset("rainbow").unwrap(), br#"{"preset":"rainbow"}"#);
    }
}
