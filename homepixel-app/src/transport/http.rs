// HTTP Transport - spricht HTTP/1.0 mit dem Mikrocontroller
//
// Eine TCP-Verbindung pro Request (`Connection: close`). Das Gerät liefert
// nur kleine JSON-Antworten, daher wird die Antwort komplett gelesen und
// danach geparst.

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use homepixel_core::{DeviceRequest, DeviceResponse, DeviceTransport, TransportError};

use crate::config::{DeviceAddress, MAX_RESPONSE_BYTES, USER_AGENT};

const READ_CHUNK: usize = 1024;

/// Transport über eine TCP-Verbindung zum Gerät
pub struct HttpTransport {
    address: DeviceAddress,
}

impl HttpTransport {
    pub fn new(address: DeviceAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }
}

impl DeviceTransport for HttpTransport {
    async fn send(&self, request: DeviceRequest<'_>) -> Result<DeviceResponse, TransportError> {
        let mut stream = TcpStream::connect((self.address.host.as_str(), self.address.port))
            .await
            .map_err(|e| {
                debug!("HTTP: Connect to {} failed: {e}", self.address);
                TransportError::ConnectionFailed
            })?;

        let head = encode_request_head(&self.address, &request);
        stream.write_all(head.as_bytes()).await.map_err(io_error)?;
        if let Some(body) = request.body {
            stream.write_all(body).await.map_err(io_error)?;
        }
        stream.flush().await.map_err(io_error)?;

        let raw = read_response(&mut stream).await?;
        let response = parse_response(&raw)?;
        debug!(
            "HTTP: {} {} -> {} ({} bytes)",
            request.method.as_str(),
            request.path,
            response.status,
            response.body.len()
        );
        Ok(response)
    }
}

/// Liest bis Verbindungsende oder bis `Content-Length` Bytes Body da sind
///
/// Das Gerät darf die Verbindung trotz `Connection: close` offen halten.
async fn read_response(stream: &mut TcpStream) -> Result<Vec<u8>, TransportError> {
    let mut raw = Vec::new();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let n = stream.read(&mut buf).await.map_err(io_error)?;
        if n == 0 {
            return Ok(raw);
        }
        raw.extend_from_slice(&buf[..n]);

        let expected = expected_len(&raw)?;
        if expected.unwrap_or(raw.len()) > MAX_RESPONSE_BYTES {
            debug!("HTTP: Response exceeds {MAX_RESPONSE_BYTES} bytes, aborting");
            return Err(TransportError::ResponseTooLarge);
        }
        if expected.is_some_and(|len| raw.len() >= len) {
            return Ok(raw);
        }
    }
}

fn io_error(e: std::io::Error) -> TransportError {
    debug!("HTTP: I/O error: {e}");
    TransportError::Io
}

// ============================================================================
// Framing
// ============================================================================

/// Request-Zeile und Header (ohne Body)
pub fn encode_request_head(address: &DeviceAddress, request: &DeviceRequest<'_>) -> String {
    let mut head = format!(
        "{} {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n",
        request.method.as_str(),
        request.path,
        address,
        USER_AGENT
    );
    if let Some(body) = request.body {
        head.push_str("Content-Type: application/json\r\n");
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("\r\n");
    head
}

/// Status und Framing aus dem Header einer Antwort
struct ResponseHead {
    status: u16,
    /// Offset des ersten Body-Bytes
    body_start: usize,
    content_length: Option<usize>,
    chunked: bool,
}

/// Parst den Header, `None` solange `\r\n\r\n` noch nicht empfangen ist
fn parse_head(raw: &[u8]) -> Result<Option<ResponseHead>, TransportError> {
    let Some(head_end) = find(raw, b"\r\n\r\n") else {
        return Ok(None);
    };
    let head = core::str::from_utf8(&raw[..head_end]).map_err(|_| TransportError::InvalidResponse)?;

    let mut lines = head.split("\r\n");
    let status = parse_status_line(lines.next().unwrap_or_default())?;

    let mut content_length = None;
    let mut chunked = false;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            return Err(TransportError::InvalidResponse);
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            let length = value
                .parse::<usize>()
                .map_err(|_| TransportError::InvalidResponse)?;
            content_length = Some(length);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = value.to_ascii_lowercase().contains("chunked");
        }
    }

    Ok(Some(ResponseHead {
        status,
        body_start: head_end + 4,
        content_length,
        chunked,
    }))
}

/// Gesamtlänge der Antwort, sobald sie aus dem Header bekannt ist
///
/// Ohne `Content-Length` (oder bei chunked) endet die Antwort erst mit der
/// Verbindung.
pub fn expected_len(raw: &[u8]) -> Result<Option<usize>, TransportError> {
    Ok(parse_head(raw)?.and_then(|head| match (head.chunked, head.content_length) {
        (false, Some(length)) => Some(head.body_start + length),
        _ => None,
    }))
}

/// Parst eine komplette HTTP-Antwort
///
/// Unterstützt `Content-Length` und `Transfer-Encoding: chunked`. Ohne
/// beides gehört alles bis zum Verbindungsende zum Body.
pub fn parse_response(raw: &[u8]) -> Result<DeviceResponse, TransportError> {
    let head = parse_head(raw)?.ok_or(TransportError::InvalidResponse)?;
    let body = &raw[head.body_start..];

    let body = if head.chunked {
        decode_chunked(body)?
    } else if let Some(length) = head.content_length {
        // Kürzerer Body heißt abgebrochene Verbindung
        body.get(..length)
            .ok_or(TransportError::InvalidResponse)?
            .to_vec()
    } else {
        body.to_vec()
    };

    Ok(DeviceResponse::new(head.status, body))
}

fn parse_status_line(line: &str) -> Result<u16, TransportError> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(TransportError::InvalidResponse);
    }

    match parts.next().map(str::parse::<u16>) {
        Some(Ok(status)) if (100..600).contains(&status) => Ok(status),
        _ => Err(TransportError::InvalidResponse),
    }
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    loop {
        let line_end = find(data, b"\r\n").ok_or(TransportError::InvalidResponse)?;
        let line = core::str::from_utf8(&data[..line_end])
            .map_err(|_| TransportError::InvalidResponse)?;
        // Chunk-Extensions nach ';' ignorieren
        let size = line.split(';').next().unwrap_or_default().trim();
        let size =
            usize::from_str_radix(size, 16).map_err(|_| TransportError::InvalidResponse)?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(body);
        }

        let chunk = data.get(..size).ok_or(TransportError::InvalidResponse)?;
        body.extend_from_slice(chunk);
        data = data
            .get(size..)
            .and_then(|rest| rest.strip_prefix(b"\r\n"))
            .ok_or(TransportError::InvalidResponse)?;
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
