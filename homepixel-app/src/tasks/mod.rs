// Task-Modul: Hintergrund-Schleifen des Front-Ends
//
// Alle Tasks laufen auf einem Thread und werden per `select` kombiniert.
// Kommunikation nur über den PixelStore (Snapshots und Subscriber).

pub mod monitor;
pub mod watch;

// Re-export Tasks für einfachen Import
pub use monitor::monitor_task;
pub use watch::{describe_change, watch_task};
