// Front-End-Konfiguration: Geräte-Adresse und Zeitparameter
//
// Reihenfolge: CLI-Flag > Environment-Variable > .env file > Default aus
// homepixel_core::config.

use core::fmt;
use core::str::FromStr;
use std::net::Ipv6Addr;

use embassy_time::Duration;
use homepixel_core::SyncConfig;
use homepixel_core::config::{DEFAULT_DEVICE_ADDRESS, DEFAULT_DEVICE_PORT};

// ============================================================================
// Environment-Variablen
// ============================================================================

/// Geräte-Adresse (`host`, `host:port` oder `http://host:port`)
pub const ENV_DEVICE: &str = "HOMEPIXEL_DEVICE";

/// Probe-Intervall in Sekunden
pub const ENV_PROBE_INTERVAL: &str = "HOMEPIXEL_PROBE_INTERVAL_SECS";

/// Probe-Timeout in Sekunden
pub const ENV_PROBE_TIMEOUT: &str = "HOMEPIXEL_PROBE_TIMEOUT_SECS";

/// Request-Timeout in Sekunden
pub const ENV_REQUEST_TIMEOUT: &str = "HOMEPIXEL_REQUEST_TIMEOUT_SECS";

// ============================================================================
// HTTP-Transport
// ============================================================================

/// Obergrenze für eine Antwort vom Gerät in Bytes (inklusive Header)
/// Größere Antworten werden abgebrochen statt abgeschnitten
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// User-Agent für alle Requests
pub const USER_AGENT: &str = concat!("homepixel/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Geräte-Adresse
// ============================================================================

/// Host und Port des Mikrocontrollers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressError(String);

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid device address '{}'", self.0)
    }
}

impl std::error::Error for AddressError {}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEVICE_ADDRESS.to_string(),
            port: DEFAULT_DEVICE_PORT,
        }
    }
}

impl FromStr for DeviceAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || AddressError(s.to_string());

        let trimmed = s.trim();
        let rest = trimmed.strip_prefix("http://").unwrap_or(trimmed);
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        // Nur Host und Port, keine Pfade und kein https
        if rest.is_empty() || rest.contains('/') || rest.contains("://") {
            return Err(error());
        }

        let parse_port = |port: &str| port.parse::<u16>().map_err(|_| error());

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            // IPv6 in Klammern: `[addr]` oder `[addr]:port`
            let (host, tail) = bracketed.split_once(']').ok_or_else(error)?;
            host.parse::<Ipv6Addr>().map_err(|_| error())?;
            let port = match tail {
                "" => DEFAULT_DEVICE_PORT,
                _ => parse_port(tail.strip_prefix(':').ok_or_else(error)?)?,
            };
            (host, port)
        } else if rest.parse::<Ipv6Addr>().is_ok() {
            // Nackte IPv6-Adresse, ohne Klammern gibt es keinen Port
            (rest, DEFAULT_DEVICE_PORT)
        } else {
            match rest.split_once(':') {
                Some((host, port)) => (host, parse_port(port)?),
                None => (rest, DEFAULT_DEVICE_PORT),
            }
        };

        if host.is_empty() || port == 0 {
            return Err(error());
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

/// Form für URL und `Host`-Header, IPv6 in Klammern
impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            f.write_str(&self.host)?;
        }
        if self.port != DEFAULT_DEVICE_PORT {
            write!(f, ":{}", self.port)?;
        }
        Ok(())
    }
}

// ============================================================================
// Gesamt-Konfiguration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub device: DeviceAddress,
    pub sync: SyncConfig,
}

impl AppConfig {
    /// Baut die Konfiguration aus Sekunden-Werten (0 ist nicht erlaubt)
    pub fn new(
        device: DeviceAddress,
        probe_interval_secs: u64,
        probe_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        for (name, value) in [
            ("probe interval", probe_interval_secs),
            ("probe timeout", probe_timeout_secs),
            ("request timeout", request_timeout_secs),
        ] {
            anyhow::ensure!(value > 0, "{name} must be at least 1 second");
        }

        Ok(Self {
            device,
            sync: SyncConfig {
                probe_interval: Duration::from_secs(probe_interval_secs),
                probe_timeout: Duration::from_secs(probe_timeout_secs),
                request_timeout: Duration::from_secs(request_timeout_secs),
            },
        })
    }
}
