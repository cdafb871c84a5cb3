//! Device Reachability Monitor
//!
//! Prüft periodisch und auf Anfrage, ob der Mikrocontroller Requests
//! annimmt. Jeder Probe ist hart begrenzt und blockiert nie länger als
//! `probe_timeout`.

use core::future::Future;

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker, with_timeout};
use log::{debug, info, warn};

use crate::protocol::STATUS_PATH;
use crate::store::PixelStore;
use crate::traits::{DeviceRequest, DeviceTransport};
use crate::types::{DeviceStatus, StatusEvent};

/// Signal zum Beenden der Hintergrund-Schleife (z.B. beim Schließen der UI)
pub type ShutdownSignal = Signal<NoopRawMutex, ()>;

pub struct ReachabilityMonitor<'a, T> {
    store: &'a PixelStore,
    transport: &'a T,
    probe_timeout: Duration,
    probe_interval: Duration,
}

impl<'a, T: DeviceTransport> ReachabilityMonitor<'a, T> {
    pub fn new(
        store: &'a PixelStore,
        transport: &'a T,
        probe_timeout: Duration,
        probe_interval: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            probe_timeout,
            probe_interval,
        }
    }

    /// Einmalige Prüfung: `Checking` sofort, dann `Online` oder `Offline`
    ///
    /// Liefert den Status, der danach im Store steht. Startet währenddessen
    /// ein neuerer Probe, entscheidet dessen Ergebnis.
    pub async fn probe(&self) -> DeviceStatus {
        // Synchron vor dem Request, damit Beobachter den Übergang sofort sehen
        let generation = self.store.begin_probe();

        let result = with_timeout(
            self.probe_timeout,
            self.transport.send(DeviceRequest::get(STATUS_PATH)),
        )
        .await;

        let event = match result {
            Ok(Ok(response)) if response.is_success() => StatusEvent::ProbeSucceeded,
            Ok(Ok(response)) => {
                warn!("MONITOR: Device answered status {}", response.status);
                StatusEvent::ProbeFailed
            }
            Ok(Err(e)) => {
                warn!("MONITOR: Probe failed: {e}");
                StatusEvent::ProbeFailed
            }
            Err(_) => {
                warn!(
                    "MONITOR: Probe timed out after {} ms",
                    self.probe_timeout.as_millis()
                );
                StatusEvent::ProbeFailed
            }
        };

        let status = self.store.finish_probe(generation, event);
        debug!("MONITOR: Device is {}", status.as_str());
        status
    }

    /// Manuelle Prüfung außerhalb des Timers (z.B. Tippen auf die Statusanzeige)
    pub async fn recheck(&self) -> DeviceStatus {
        info!("MONITOR: Manual recheck");
        self.probe().await
    }

    /// Probt sofort und danach alle `probe_interval`, bis `shutdown` feuert
    pub async fn run(&self, shutdown: &ShutdownSignal) {
        self.run_with(shutdown, |_, _| async {}).await
    }

    /// Wie [`run`](Self::run), ruft nach jedem Probe `hook(vorher, nachher)` auf
    pub async fn run_with<F, Fut>(&self, shutdown: &ShutdownSignal, hook: F)
    where
        F: FnMut(DeviceStatus, DeviceStatus) -> Fut,
        Fut: Future<Output = ()>,
    {
        info!(
            "MONITOR: Started, probing every {} s",
            self.probe_interval.as_secs()
        );

        // Drop des Loop-Futures beendet auch den Ticker
        select(self.probe_loop(hook), shutdown.wait()).await;

        info!("MONITOR: Stopped");
    }

    async fn probe_loop<F, Fut>(&self, mut hook: F)
    where
        F: FnMut(DeviceStatus, DeviceStatus) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut ticker = Ticker::every(self.probe_interval);
        loop {
            let previous = self.store.status();
            let current = self.probe().await;
            hook(previous, current).await;
            ticker.next().await;
        }
    }
}
