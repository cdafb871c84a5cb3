//! Fehler- und Ergebnis-Typen
//!
//! Keiner dieser Fehler ist fatal. Geräte-Fehler landen als `offline` im
//! Store, nur [`InvalidColor`] geht direkt an den Aufrufer zurück.

use core::fmt;

/// Ungültige Farbeingabe (lokale Validierung, erreicht nie das Netzwerk)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidColor;

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid color")
    }
}

impl core::error::Error for InvalidColor {}

/// Fehler bei der Kommunikation mit dem Gerät
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Timeout oder Verbindungsfehler
    Unreachable,
    /// Gerät hat mit einem Nicht-2xx Status geantwortet
    Rejected(u16),
    /// Antwort (oder Request-Body) hat nicht die erwartete JSON-Form
    MalformedPayload,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Unreachable => f.write_str("device unreachable"),
            DeviceError::Rejected(status) => write!(f, "device rejected request ({status})"),
            DeviceError::MalformedPayload => f.write_str("malformed payload"),
        }
    }
}

impl core::error::Error for DeviceError {}

/// Fehler auf Transport-Ebene (unterhalb von HTTP-Statuscodes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    ConnectionFailed,
    Io,
    /// Antwort war kein gültiges HTTP
    InvalidResponse,
    /// Antwort überschreitet die Größengrenze des Transports
    ResponseTooLarge,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed => f.write_str("connection failed"),
            TransportError::Io => f.write_str("i/o error"),
            TransportError::InvalidResponse => f.write_str("invalid http response"),
            TransportError::ResponseTooLarge => f.write_str("response too large"),
        }
    }
}

impl core::error::Error for TransportError {}

impl From<TransportError> for DeviceError {
    fn from(e: TransportError) -> Self {
        match e {
            // Gerät hat geantwortet, nur nicht verwertbar
            TransportError::ResponseTooLarge => DeviceError::MalformedPayload,
            _ => DeviceError::Unreachable,
        }
    }
}

/// Fehler beim Zugriff auf den Store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Alle Subscriber-Slots sind belegt
    NoSubscriberSlots,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NoSubscriberSlots => f.write_str("no subscriber slots available"),
        }
    }
}

impl core::error::Error for StoreError {}

/// Ergebnis eines Sync-Kommandos
///
/// Informativ: Fehler sind bereits im Store als `offline` vermerkt, wenn
/// das Kommando zurückkehrt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Request ging durch, Zustand ist abgeglichen
    Applied,
    /// Gerät nicht online, kein Request gesendet
    SkippedOffline,
    /// Ein anderes Kommando ist noch unterwegs
    Busy,
    Failed(DeviceError),
}

impl CommandOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}
