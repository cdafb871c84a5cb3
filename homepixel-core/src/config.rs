//! Standard-Konfiguration: Konstanten und Laufzeit-Parameter
//!
//! Die Konstanten sind die Defaults. Das Front-End kann sie zur Laufzeit
//! über [`SyncConfig`] überschreiben.

use embassy_time::Duration;
use rgb::RGB8;

// ============================================================================
// LED-Ring
// ============================================================================

/// Anzahl der LEDs im Ring
pub const LED_COUNT: usize = 12;

/// Platzhalter-Farbe bis der erste Sync durch ist (Gelb, wie die App)
pub const DEFAULT_PIXEL: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 0,
};

// ============================================================================
// Gerät
// ============================================================================

/// Standard-Adresse des Mikrocontrollers im LAN
pub const DEFAULT_DEVICE_ADDRESS: &str = "192.168.1.7";

/// HTTP-Port des Mikrocontrollers
pub const DEFAULT_DEVICE_PORT: u16 = 80;

/// Intervall zwischen zwei Erreichbarkeits-Prüfungen in Sekunden
pub const PROBE_INTERVAL_SECS: u64 = 30;

/// Harte Obergrenze für eine Erreichbarkeits-Prüfung in Sekunden
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Timeout für alle anderen Requests (Lesen und Kommandos) in Sekunden
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Store
// ============================================================================

/// Maximale Anzahl gleichzeitiger Subscriber am Store
pub const MAX_SUBSCRIBERS: usize = 8;

/// Queue-Tiefe pro Subscriber, ältere Updates werden verworfen
pub const STATE_QUEUE_DEPTH: usize = 8;

/// Laufzeit-Parameter für Monitor und Synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub probe_interval: Duration,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            probe_interval: Duration::from_secs(PROBE_INTERVAL_SECS),
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}
