//! HomePixel Core - Geräte-Abgleich für den LED-Ring
//!
//! Diese Crate enthält KEINE I/O.
//! Sie definiert Farb-Codec, Datenmodell, das Transport-Trait und die
//! Sync-Logik (Store, Monitor, Synchronizer).

#![no_std]

extern crate alloc;

pub mod client;
pub mod color;
pub mod config;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod store;
pub mod sync;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use client::PixelClient;
pub use color::{
    PixelColor, color_from_components, decode_css_rgb, decode_wire_color, encode_wire_color,
    from_hex, parse_color, to_hex, to_wire,
};
pub use config::SyncConfig;
pub use error::{CommandOutcome, DeviceError, InvalidColor, StoreError, TransportError};
pub use monitor::{ReachabilityMonitor, ShutdownSignal};
pub use store::{PixelStore, StateSubscriber};
pub use sync::Synchronizer;
pub use traits::{DeviceRequest, DeviceResponse, DeviceTransport, Method};
pub use types::{DeviceStatus, FrameError, LedFrame, Preset, StatusEvent, SyncState};
