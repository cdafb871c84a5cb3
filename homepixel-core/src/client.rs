//! Command-Fassade für Front-End-Code
//!
//! Bündelt Store, Monitor und Synchronizer. UI-Code bekommt nur diese
//! Fassade, nie schreibenden Zugriff auf den Store.

use alloc::vec::Vec;

use log::info;
use rgb::RGB8;

use crate::color::{decode_css_rgb, from_hex};
use crate::config::SyncConfig;
use crate::error::{CommandOutcome, InvalidColor, StoreError};
use crate::monitor::{ReachabilityMonitor, ShutdownSignal};
use crate::store::{PixelStore, StateSubscriber};
use crate::sync::Synchronizer;
use crate::traits::DeviceTransport;
use crate::types::{DeviceStatus, Preset, SyncState};

pub struct PixelClient<'a, T> {
    store: &'a PixelStore,
    monitor: ReachabilityMonitor<'a, T>,
    sync: Synchronizer<'a, T>,
}

impl<'a, T: DeviceTransport> PixelClient<'a, T> {
    pub fn new(store: &'a PixelStore, transport: &'a T, config: SyncConfig) -> Self {
        Self {
            store,
            monitor: ReachabilityMonitor::new(
                store,
                transport,
                config.probe_timeout,
                config.probe_interval,
            ),
            sync: Synchronizer::new(store, transport, config.request_timeout),
        }
    }

    pub fn snapshot(&self) -> SyncState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> Result<StateSubscriber<'a>, StoreError> {
        self.store.subscribe()
    }

    pub async fn set_color(&self, color: RGB8) -> CommandOutcome {
        self.sync.apply_color(color).await
    }

    /// Farbe vom Color-Picker (`rgb(r, g, b)`)
    pub async fn set_color_css(&self, css: &str) -> Result<CommandOutcome, InvalidColor> {
        let color = decode_css_rgb(css)?;
        Ok(self.set_color(color).await)
    }

    pub async fn set_color_hex(&self, hex: &str) -> Result<CommandOutcome, InvalidColor> {
        let color = from_hex(hex)?;
        Ok(self.set_color(color).await)
    }

    pub async fn set_pixel_preset(&self, preset: &Preset) -> CommandOutcome {
        self.sync.apply_preset(preset).await
    }

    pub async fn check_status(&self) -> DeviceStatus {
        self.monitor.recheck().await
    }

    pub async fn refresh(&self) -> CommandOutcome {
        self.sync.refresh().await
    }

    pub async fn list_presets(&self) -> Vec<Preset> {
        self.sync.list_presets().await
    }

    /// Hintergrund-Schleife: periodische Probes bis `shutdown`
    ///
    /// Wird das Gerät (wieder) erreichbar, wird sein Zustand sofort geholt.
    pub async fn run(&self, shutdown: &ShutdownSignal) {
        let sync = &self.sync;
        self.monitor
            .run_with(shutdown, move |previous, current| async move {
                if current.is_online() && !previous.is_online() {
                    info!("SYNC: Device reachable, syncing state");
                    sync.refresh().await;
                }
            })
            .await
    }
}
