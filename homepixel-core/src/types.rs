//! Core Types für den Geräte-Abgleich
//!
//! Datenstrukturen ohne I/O-Abhängigkeiten

use alloc::string::String;
use alloc::vec::Vec;

use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::color::{decode_wire_color, to_hex, to_wire};
use crate::config::{DEFAULT_PIXEL, LED_COUNT};

// ============================================================================
// LedFrame
// ============================================================================

/// Kompletter Zustand des Rings, Index 0..11 = physische LED-Position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedFrame([RGB8; LED_COUNT]);

/// Warum eine Farbliste vom Gerät kein gültiger Frame ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Liste hat nicht genau [`LED_COUNT`] Einträge
    WrongLength(usize),
    /// Eintrag an diesem Index ist keine gültige Wire-Farbe
    InvalidPixel(usize),
}

impl LedFrame {
    /// Alle LEDs in derselben Farbe
    pub const fn filled(color: RGB8) -> Self {
        Self([color; LED_COUNT])
    }

    pub const fn from_pixels(pixels: [RGB8; LED_COUNT]) -> Self {
        Self(pixels)
    }

    /// Baut einen Frame aus Wire-Strings (`"r,g,b"`)
    ///
    /// Schlägt fehl wenn die Länge nicht stimmt oder ein Eintrag nicht
    /// dekodierbar ist. Teil-Updates gibt es nicht.
    pub fn from_wire<S: AsRef<str>>(colors: &[S]) -> Result<Self, FrameError> {
        if colors.len() != LED_COUNT {
            return Err(FrameError::WrongLength(colors.len()));
        }

        let mut pixels = [RGB8::default(); LED_COUNT];
        for (index, (pixel, wire)) in pixels.iter_mut().zip(colors).enumerate() {
            *pixel = decode_wire_color(wire.as_ref()).map_err(|_| FrameError::InvalidPixel(index))?;
        }
        Ok(Self(pixels))
    }

    pub fn pixels(&self) -> &[RGB8; LED_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<RGB8> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.0.iter().copied()
    }

    /// Wire-Strings in LED-Reihenfolge (Body für `/setcolor`)
    pub fn to_wire(&self) -> Vec<String> {
        self.iter().map(to_wire).collect()
    }

    /// `#rrggbb` pro LED, für Renderer
    pub fn to_hex(&self) -> Vec<String> {
        self.iter().map(to_hex).collect()
    }

    /// Ob alle LEDs dieselbe Farbe haben
    pub fn uniform_color(&self) -> Option<RGB8> {
        let first = self.0[0];
        self.iter().all(|p| p == first).then_some(first)
    }
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::filled(DEFAULT_PIXEL)
    }
}

// ============================================================================
// Preset
// ============================================================================

/// Auf dem Gerät definiertes Preset, der Client wählt nur per Name aus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color_temp: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Preset {
    /// Preset nur mit Namen (für Auswahl ohne vorheriges Listing)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color_temp: String::new(),
            kind: String::new(),
        }
    }
}

// ============================================================================
// DeviceStatus
// ============================================================================

/// Erreichbarkeit des Mikrocontrollers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

/// Ereignisse, die den [`DeviceStatus`] verändern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    ProbeStarted,
    ProbeSucceeded,
    ProbeFailed,
    /// Ein Request des Synchronizers ist fehlgeschlagen
    RequestFailed,
}

impl DeviceStatus {
    /// Übergangstabelle des Status-Automaten
    ///
    /// Ein erfolgreicher Probe hebt `Offline` nicht auf: war der Status
    /// schon `Offline`, hat ein anderer Request während des Probes einen
    /// Fehler gesehen, und der gilt bis zum nächsten Probe.
    pub fn on(self, event: StatusEvent) -> DeviceStatus {
        use DeviceStatus::*;
        use StatusEvent::*;

        match (self, event) {
            (_, ProbeStarted) => Checking,
            (Checking | Online, ProbeSucceeded) => Online,
            (Offline, ProbeSucceeded) => Offline,
            (_, ProbeFailed | RequestFailed) => Offline,
        }
    }

    pub fn is_online(self) -> bool {
        self == DeviceStatus::Online
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Checking => "checking",
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
        }
    }
}

// ============================================================================
// SyncState
// ============================================================================

/// Inhalt des Observable Pixel Store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncState {
    pub current_frame: LedFrame,
    /// Name des aktiven Presets, leer wenn keins aktiv ist
    pub active_preset: String,
    pub status: DeviceStatus,
    /// true genau solange ein Kommando unterwegs ist
    pub pending: bool,
}

impl SyncState {
    pub fn is_active(&self, preset: &Preset) -> bool {
        !self.active_preset.is_empty() && self.active_preset == preset.name
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SyncState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "SyncState {{ status: {}, preset: {}, pending: {} }}",
            self.status,
            self.active_preset.as_str(),
            self.pending
        )
    }
}
