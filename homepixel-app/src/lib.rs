// Library-Root: Front-End für den HomePixel LED-Ring
//
// Alles mit I/O lebt hier (TCP, Terminal, Konfiguration). Die Sync-Logik
// kommt aus homepixel-core.

// Module
pub mod config;
pub mod render;
pub mod tasks;
pub mod transport;

// Re-exports für Binary und Tests
pub use config::{AppConfig, DeviceAddress};
pub use transport::HttpTransport;

use anyhow::bail;
use homepixel_core::{CommandOutcome, DeviceStatus, Preset};
use log::warn;

use crate::render::status_label;

/// Übersetzt das Ergebnis eines Kommandos in einen CLI-Fehler
pub fn expect_applied(outcome: CommandOutcome) -> anyhow::Result<()> {
    match outcome {
        CommandOutcome::Applied => Ok(()),
        CommandOutcome::SkippedOffline => bail!("device is offline, nothing sent"),
        CommandOutcome::Busy => bail!("another command is still in flight"),
        CommandOutcome::Failed(e) => bail!("command failed: {e}"),
    }
}

/// Wie [`expect_applied`], aber nur mit Warnung statt Abbruch
///
/// Liefert `true` wenn das Kommando durchging.
pub fn warn_unless_applied(action: &str, outcome: CommandOutcome) -> bool {
    match expect_applied(outcome) {
        Ok(()) => true,
        Err(e) => {
            warn!("HomePixel: {action}: {e}");
            false
        }
    }
}

/// Sucht ein Preset per Name in der Liste des Geräts
///
/// `status` ist der Status nach dem Listing. Ohne `online` ist eine leere
/// oder unvollständige Liste kein Beweis, dass das Preset fehlt.
pub fn find_preset<'p>(
    presets: &'p [Preset],
    name: &str,
    status: DeviceStatus,
) -> anyhow::Result<&'p Preset> {
    if let Some(preset) = presets.iter().find(|p| p.name == name) {
        return Ok(preset);
    }
    if !status.is_online() {
        bail!("device is {}, cannot look up preset '{name}'", status_label(status));
    }
    bail!("device has no preset '{name}'")
}
