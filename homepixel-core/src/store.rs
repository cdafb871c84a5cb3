//! Observable Pixel Store
//!
//! Einzige Instanz von [`SyncState`]. Front-End-Code liest Snapshots und
//! abonniert Änderungen, schreiben dürfen nur Monitor und Synchronizer
//! (crate-intern).

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Subscriber};

use crate::config::{MAX_SUBSCRIBERS, STATE_QUEUE_DEPTH};
use crate::error::StoreError;
use crate::types::{DeviceStatus, LedFrame, StatusEvent, SyncState};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================

/// PubSubChannel für State-Broadcasts
/// - STATE_QUEUE_DEPTH: Queue-Tiefe pro Subscriber
/// - MAX_SUBSCRIBERS: maximale Anzahl Subscribers
/// - 1: Publisher-Slots (Store nutzt nur den ImmediatePublisher)
pub type StateChannel = PubSubChannel<NoopRawMutex, SyncState, STATE_QUEUE_DEPTH, MAX_SUBSCRIBERS, 1>;

/// Subscriber für State-Broadcasts, Drop = Abmelden
pub type StateSubscriber<'a> =
    Subscriber<'a, NoopRawMutex, SyncState, STATE_QUEUE_DEPTH, MAX_SUBSCRIBERS, 1>;

pub struct PixelStore {
    state: BlockingMutex<NoopRawMutex, RefCell<SyncState>>,
    changes: StateChannel,
    /// Nummer des zuletzt gestarteten Probes
    probe_generation: Cell<u32>,
}

impl PixelStore {
    /// Store mit Platzhalter-Frame und Status `Checking`
    pub fn new() -> Self {
        Self::with_state(SyncState::default())
    }

    /// Store mit eigenem Start-Frame
    pub fn with_frame(frame: LedFrame) -> Self {
        Self::with_state(SyncState {
            current_frame: frame,
            ..SyncState::default()
        })
    }

    fn with_state(state: SyncState) -> Self {
        Self {
            state: BlockingMutex::new(RefCell::new(state)),
            changes: PubSubChannel::new(),
            probe_generation: Cell::new(0),
        }
    }

    /// Kopie des aktuellen Zustands
    pub fn snapshot(&self) -> SyncState {
        self.state.lock(|state| state.borrow().clone())
    }

    pub fn status(&self) -> DeviceStatus {
        self.state.lock(|state| state.borrow().status)
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock(|state| state.borrow().pending)
    }

    /// Abonniert alle künftigen Änderungen
    ///
    /// Jede Änderung eines Feldes wird einmal geliefert. Ein Subscriber, der
    /// mehr als [`STATE_QUEUE_DEPTH`] Updates hinterherhängt, verliert die
    /// ältesten.
    pub fn subscribe(&self) -> Result<StateSubscriber<'_>, StoreError> {
        self.changes
            .subscriber()
            .map_err(|_| StoreError::NoSubscriberSlots)
    }

    /// Ändert den Zustand und broadcastet ihn, falls sich etwas geändert hat
    pub(crate) fn update(&self, f: impl FnOnce(&mut SyncState)) -> bool {
        let changed = self.state.lock(|state| {
            let mut state = state.borrow_mut();
            let before = state.clone();
            f(&mut state);
            (*state != before).then(|| state.clone())
        });

        match changed {
            Some(state) => {
                self.changes.immediate_publisher().publish_immediate(state);
                true
            }
            None => false,
        }
    }

    /// Wendet ein Status-Ereignis an und liefert den neuen Status
    pub(crate) fn apply_status(&self, event: StatusEvent) -> DeviceStatus {
        let mut next = DeviceStatus::Checking;
        self.update(|state| {
            state.status = state.status.on(event);
            next = state.status;
        });
        next
    }

    /// Startet einen Probe: Status `Checking`, liefert die Probe-Nummer
    pub(crate) fn begin_probe(&self) -> u32 {
        let generation = self.probe_generation.get().wrapping_add(1);
        self.probe_generation.set(generation);
        self.apply_status(StatusEvent::ProbeStarted);
        generation
    }

    /// Übernimmt das Ergebnis eines Probes und liefert den gespeicherten Status
    ///
    /// Ergebnisse überholter Probes (inzwischen wurde ein neuerer gestartet)
    /// werden verworfen.
    pub(crate) fn finish_probe(&self, generation: u32, event: StatusEvent) -> DeviceStatus {
        if generation != self.probe_generation.get() {
            log::debug!("MONITOR: Dropping result of superseded probe #{generation}");
            return self.status();
        }
        self.apply_status(event)
    }
}

impl Default for PixelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    #[test]
    fn test_new_store_is_checking() {
        let store = PixelStore::new();
        let state = store.snapshot();
        assert_eq!(state.status, DeviceStatus::Checking);
        assert_eq!(state.current_frame, LedFrame::default());
        assert_eq!(state.active_preset, "");
        assert!(!state.pending);
    }

    #[test]
    fn test_update_publishes_only_changes() {
        let store = PixelStore::new();
        let mut sub = store.subscribe().unwrap();

        assert!(store.update(|s| s.pending = true));
        assert!(!store.update(|s| s.pending = true));
        assert!(store.update(|s| s.current_frame = LedFrame::filled(RGB8 { r: 1, g: 1, b: 1 })));

        let first = sub.try_next_message_pure().unwrap();
        assert!(first.pending);
        let second = sub.try_next_message_pure().unwrap();
        assert_eq!(second.current_frame.uniform_color(), Some(RGB8 { r: 1, g: 1, b: 1 }));
        assert!(sub.try_next_message_pure().is_none());
    }

    #[test]
    fn test_apply_status() {
        let store = PixelStore::new();
        assert_eq!(store.apply_status(StatusEvent::ProbeSucceeded), DeviceStatus::Online);
        assert_eq!(store.apply_status(StatusEvent::RequestFailed), DeviceStatus::Offline);
        assert_eq!(store.status(), DeviceStatus::Offline);
    }

    #[test]
    fn test_superseded_status_check_is_ignored() {
        let store = PixelStore::new();
        let first = store.begin_probe();
        let second = store.begin_probe();

        assert_eq!(store.finish_probe(second, StatusEvent::ProbeSucceeded), DeviceStatus::Online);
        // Timeout der älteren Prüfung kommt zu spät
        assert_eq!(store.finish_probe(first, StatusEvent::ProbeFailed), DeviceStatus::Online);
        assert_eq!(store.status(), DeviceStatus::Online);
    }

    #[test]
    fn test_request_failure_during_status_check_wins() {
        let store = PixelStore::new();
        let generation = store.begin_probe();
        store.apply_status(StatusEvent::RequestFailed);

        assert_eq!(store.finish_probe(generation, StatusEvent::ProbeSucceeded), DeviceStatus::Offline);
    }

    #[test]
    fn test_subscriber_slots_are_limited() {
        let store = PixelStore::new();
        let subs: alloc::vec::Vec<_> = (0..MAX_SUBSCRIBERS)
            .map(|_| store.subscribe().unwrap())
            .collect();
        assert_eq!(store.subscribe().err(), Some(StoreError::NoSubscriberSlots));

        // Drop gibt den Slot wieder frei
        drop(subs);
        assert!(store.subscribe().is_ok());
    }
}
