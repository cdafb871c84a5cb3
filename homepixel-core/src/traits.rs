//! Transport Abstraction
//!
//! Der Core spricht nie selbst mit dem Netzwerk. Alle Requests laufen über
//! [`DeviceTransport`], damit Sync-Logik ohne echtes Gerät testbar ist.
//!
//! # Implementierungen
//! - **Production:** `HttpTransport` (TCP, im Front-End)
//! - **Testing:** `MockTransport` (skriptbare Antworten, in den Tests)

use alloc::vec::Vec;

use crate::error::TransportError;

/// HTTP-Methode eines Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Ein Request an das Gerät
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    /// JSON-Body, nur bei POST
    pub body: Option<&'a [u8]>,
}

impl<'a> DeviceRequest<'a> {
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    pub fn post_json(path: &'a str, body: &'a [u8]) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(body),
        }
    }
}

/// Antwort des Geräts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl DeviceResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait für den Zugriff auf das Gerät
///
/// `&self`, weil Probes parallel zu Kommandos laufen dürfen.
/// Implementierungen brauchen kein eigenes Timeout, der Core begrenzt jeden
/// Aufruf selbst.
#[allow(async_fn_in_trait)]
pub trait DeviceTransport {
    /// Sendet einen Request und liefert die rohe Antwort
    ///
    /// # Fehlerbehandlung
    /// Nicht-2xx Antworten sind **kein** Fehler, nur Transport-Probleme
    /// liefern `Err`.
    async fn send(&self, request: DeviceRequest<'_>) -> Result<DeviceResponse, TransportError>;
}
