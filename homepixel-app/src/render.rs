// Terminal-Ausgabe: LED-Ring, Status und Preset-Liste
//
// Farben als ANSI-Truecolor-Blöcke in LED-Reihenfolge (Index 0 zuerst).

use core::fmt::Write;

use homepixel_core::{DeviceStatus, LedFrame, Preset, SyncState, to_hex};
use rgb::RGB8;

/// Marker vor dem aktiven Preset
pub const ACTIVE_MARKER: &str = "*";

const RESET: &str = "\x1b[0m";

/// Ein Farbblock für eine LED
pub fn swatch(color: RGB8) -> String {
    format!("\x1b[48;2;{};{};{}m  {RESET}", color.r, color.g, color.b)
}

/// Alle LEDs des Rings nebeneinander
pub fn render_frame(frame: &LedFrame) -> String {
    let mut out = String::new();
    for color in frame.iter() {
        out.push_str(&swatch(color));
        out.push(' ');
    }

    // Einfarbig: zusätzlich den Hex-Wert, sonst nur die Blöcke
    if let Some(color) = frame.uniform_color() {
        out.push_str(&to_hex(color));
    }
    out.trim_end().to_string()
}

pub fn status_label(status: DeviceStatus) -> &'static str {
    match status {
        DeviceStatus::Checking => "checking...",
        DeviceStatus::Online => "online",
        DeviceStatus::Offline => "offline",
    }
}

/// Kompletter Zustand, eine Zeile pro Feld
pub fn render_state(state: &SyncState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status:  {}", status_label(state.status));

    let preset = if state.active_preset.is_empty() {
        "-"
    } else {
        state.active_preset.as_str()
    };
    let _ = writeln!(out, "Preset:  {preset}");
    let _ = write!(out, "LEDs:    {}", render_frame(&state.current_frame));

    if state.pending {
        out.push_str("\n(command in flight)");
    }
    out
}

/// Preset-Liste, das aktive Preset markiert
pub fn render_presets(presets: &[Preset], state: &SyncState) -> String {
    if presets.is_empty() {
        return "No presets available".to_string();
    }

    let width = presets.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for preset in presets {
        let marker = if state.is_active(preset) {
            ACTIVE_MARKER
        } else {
            " "
        };
        let _ = write!(out, "{marker} {:<width$}", preset.name);
        if !preset.description.is_empty() {
            let _ = write!(out, "  {}", preset.description);
        }
        if !preset.color_temp.is_empty() {
            let _ = write!(out, " ({})", preset.color_temp);
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_truecolor() {
        let s = swatch(RGB8 { r: 255, g: 0, b: 7 });
        assert_eq!(s, "\x1b[48;2;255;0;7m  \x1b[0m");
    }

    #[test]
    fn test_render_uniform_frame_shows_hex() {
        let frame = LedFrame::filled(RGB8 { r: 255, g: 0, b: 0 });
        let out = render_frame(&frame);
        assert_eq!(out.matches("\x1b[48;2;255;0;0m").count(), 12);
        assert!(out.ends_with("#ff0000"));
    }

    #[test]
    fn test_render_mixed_frame_in_led_order() {
        let mut pixels = [RGB8 { r: 0, g: 0, b: 0 }; 12];
        pixels[0] = RGB8 { r: 1, g: 2, b: 3 };
        pixels[11] = RGB8 { r: 4, g: 5, b: 6 };
        let out = render_frame(&LedFrame::from_pixels(pixels));

        let first = out.find("48;2;1;2;3m").unwrap();
        let last = out.find("48;2;4;5;6m").unwrap();
        assert!(first < last);
        assert!(!out.contains('#'));
    }

    #[test]
    fn test_render_state() {
        let state = SyncState {
            active_preset: "Warm".to_string(),
            status: DeviceStatus::Online,
            ..SyncState::default()
        };
        let out = render_state(&state);
        assert!(out.contains("Status:  online"));
        assert!(out.contains("Preset:  Warm"));
        assert!(!out.contains("in flight"));
    }

    #[test]
    fn test_render_state_without_preset() {
        let state = SyncState {
            pending: true,
            ..SyncState::default()
        };
        let out = render_state(&state);
        assert!(out.contains("Status:  checking..."));
        assert!(out.contains("Preset:  -"));
        assert!(out.ends_with("(command in flight)"));
    }

    #[test]
    fn test_render_presets_marks_active() {
        let mut warm = Preset::named("Warm");
        warm.description = "Gemütlich".to_string();
        warm.color_temp = "2700K".to_string();
        let presets = [warm, Preset::named("Kalt")];
        let state = SyncState {
            active_preset: "Warm".to_string(),
            ..SyncState::default()
        };

        let out = render_presets(&presets, &state);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "* Warm  Gemütlich (2700K)");
        assert_eq!(lines[1], "  Kalt");
    }

    #[test]
    fn test_render_no_presets() {
        assert_eq!(
            render_presets(&[], &SyncState::default()),
            "No presets available"
        );
    }
}
