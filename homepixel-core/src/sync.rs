//! Device State Synchronizer
//!
//! Einzige Komponente, die Kommandos an das Gerät schickt, und einziger
//! Schreiber von Frame und aktivem Preset im Store.
//!
//! Ablauf eines Kommandos:
//!
//! ```text
//! Idle -> Pending (Request unterwegs) -> Idle (nach refresh)
//!                                     -> Idle (offline)
//! ```
//!
//! Es ist immer höchstens ein Kommando unterwegs. Ein zweites wird mit
//! [`CommandOutcome::Busy`] abgewiesen statt verschachtelt.

use alloc::vec::Vec;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{Duration, with_timeout};
use log::{debug, info, warn};
use rgb::RGB8;

use crate::error::{CommandOutcome, DeviceError};
use crate::protocol::{self, AVAILABLE_PRESETS_PATH, CURRENT_PATH, PRESET_PATH, SET_COLOR_PATH};
use crate::store::PixelStore;
use crate::traits::{DeviceRequest, DeviceTransport};
use crate::types::{LedFrame, Preset, StatusEvent};

pub struct Synchronizer<'a, T> {
    store: &'a PixelStore,
    transport: &'a T,
    request_timeout: Duration,
    in_flight: Mutex<NoopRawMutex, ()>,
}

/// Hält das Busy-Flag für die Dauer eines Kommandos
///
/// Drop setzt `pending` zurück, egal wie das Kommando endet.
struct PendingGuard<'s> {
    store: &'s PixelStore,
    _lock: MutexGuard<'s, NoopRawMutex, ()>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.store.update(|state| state.pending = false);
    }
}

impl<'a, T: DeviceTransport> Synchronizer<'a, T> {
    pub fn new(store: &'a PixelStore, transport: &'a T, request_timeout: Duration) -> Self {
        Self {
            store,
            transport,
            request_timeout,
            in_flight: Mutex::new(()),
        }
    }

    /// Holt den aktuellen Zustand vom Gerät und übernimmt ihn in den Store
    ///
    /// Ungültige Farblisten werden ignoriert, der letzte gute Frame bleibt.
    pub async fn refresh(&self) -> CommandOutcome {
        if !self.store.status().is_online() {
            debug!("SYNC: Skipping refresh, device not online");
            return CommandOutcome::SkippedOffline;
        }
        self.pull_current().await
    }

    /// `GET /current` ohne Status-Prüfung
    ///
    /// Nach einem erfolgreichen Kommando hat das Gerät gerade geantwortet,
    /// ein parallel laufender Probe (`Checking`) darf den Abgleich nicht
    /// verhindern.
    async fn pull_current(&self) -> CommandOutcome {
        let body = match self.request(DeviceRequest::get(CURRENT_PATH)).await {
            Ok(body) => body,
            Err(e) => return CommandOutcome::Failed(e),
        };

        let snapshot = match protocol::decode_current(&body) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("SYNC: Ignoring /current response: {e}");
                return CommandOutcome::Failed(e);
            }
        };

        self.store.update(|state| {
            state.active_preset = snapshot.active_preset;
            if let Some(frame) = snapshot.frame {
                state.current_frame = frame;
            }
        });
        CommandOutcome::Applied
    }

    /// Setzt alle LEDs auf dieselbe Farbe, danach refresh
    pub async fn apply_color(&self, color: RGB8) -> CommandOutcome {
        let frame = LedFrame::filled(color);
        let body = match protocol::encode_frame(&frame) {
            Ok(body) => body,
            Err(e) => return CommandOutcome::Failed(e),
        };

        info!("SYNC: Setting color {},{},{}", color.r, color.g, color.b);
        self.command(DeviceRequest::post_json(SET_COLOR_PATH, &body))
            .await
    }

    /// Aktiviert ein Preset per Name, danach refresh
    pub async fn apply_preset(&self, preset: &Preset) -> CommandOutcome {
        let body = match protocol::encode_preset(&preset.name) {
            Ok(body) => body,
            Err(e) => return CommandOutcome::Failed(e),
        };

        info!("SYNC: Activating preset '{}'", preset.name);
        self.command(DeviceRequest::post_json(PRESET_PATH, &body))
            .await
    }

    /// Liste der Presets auf dem Gerät, leer bei jedem Fehler
    ///
    /// Nicht an den Status gebunden. Transport-Fehler setzen trotzdem
    /// `offline`, wie bei jedem anderen Lese-Request.
    pub async fn list_presets(&self) -> Vec<Preset> {
        let body = match self.request(DeviceRequest::get(AVAILABLE_PRESETS_PATH)).await {
            Ok(body) => body,
            Err(_) => return Vec::new(),
        };

        match protocol::decode_presets(&body) {
            Ok(presets) => {
                debug!("SYNC: Device offers {} presets", presets.len());
                presets
            }
            Err(e) => {
                warn!("SYNC: Ignoring preset list: {e}");
                Vec::new()
            }
        }
    }

    /// Gemeinsamer Ablauf aller mutierenden Kommandos
    async fn command(&self, request: DeviceRequest<'_>) -> CommandOutcome {
        if !self.store.status().is_online() {
            info!("SYNC: Device not online, dropping {}", request.path);
            return CommandOutcome::SkippedOffline;
        }

        let Some(_guard) = self.begin() else {
            warn!("SYNC: Command already in flight, rejecting {}", request.path);
            return CommandOutcome::Busy;
        };

        if let Err(e) = self.request(request).await {
            return CommandOutcome::Failed(e);
        }

        // Kommando ist angekommen; ein fehlgeschlagener Abgleich ist schon
        // im Status vermerkt
        self.pull_current().await;
        CommandOutcome::Applied
    }

    fn begin(&self) -> Option<PendingGuard<'_>> {
        let lock = self.in_flight.try_lock().ok()?;
        self.store.update(|state| state.pending = true);
        Some(PendingGuard {
            store: self.store,
            _lock: lock,
        })
    }

    /// Request mit Timeout; jeder Fehler setzt den Status auf `offline`
    async fn request(&self, request: DeviceRequest<'_>) -> Result<Vec<u8>, DeviceError> {
        let result = match with_timeout(self.request_timeout, self.transport.send(request)).await {
            Ok(Ok(response)) if response.is_success() => Ok(response.body),
            Ok(Ok(response)) => Err(DeviceError::Rejected(response.status)),
            Ok(Err(e)) => Err(DeviceError::from(e)),
            Err(_) => Err(DeviceError::Unreachable),
        };

        if let Err(e) = &result {
            warn!(
                "SYNC: {} {} failed: {e}",
                request.method.as_str(),
                request.path
            );
            // Unbrauchbare Antwort heißt nicht, dass das Gerät weg ist
            if *e != DeviceError::MalformedPayload {
                self.store.apply_status(StatusEvent::RequestFailed);
            }
        }
        result
    }
}
