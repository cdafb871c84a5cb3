// Transport-Modul: Implementierungen von homepixel_core::DeviceTransport
//
// Der Core kennt nur das Trait, hier sitzt das echte Netzwerk.

pub mod http;

pub use http::HttpTransport;
