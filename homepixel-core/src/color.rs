//! Farb-Codec: Pure Functions ohne Seiteneffekte
//!
//! Konvertiert zwischen RGB-Tripeln, Hex-Strings, CSS `rgb(...)` Strings
//! und dem Wire-Format des Geräts (`"r,g,b"`).

use alloc::format;
use alloc::string::String;

use rgb::RGB8;

use crate::error::InvalidColor;

/// Ein Pixel des Rings
pub type PixelColor = RGB8;

/// Baut eine Farbe aus Fließkomma-Komponenten (z.B. vom Color-Picker)
///
/// Komponenten werden kaufmännisch gerundet (x.5 nach oben). NaN, Unendlich
/// oder Werte außerhalb von [0, 255] nach dem Runden sind ungültig.
pub fn color_from_components(r: f64, g: f64, b: f64) -> Result<PixelColor, InvalidColor> {
    Ok(RGB8 {
        r: round_component(r)?,
        g: round_component(g)?,
        b: round_component(b)?,
    })
}

/// Kodiert Komponenten ins Wire-Format
///
/// ```
/// # use homepixel_core::encode_wire_color;
/// assert_eq!(encode_wire_color(255.0, 0.4, 127.5).unwrap(), "255,0,128");
/// assert!(encode_wire_color(256.0, 0.0, 0.0).is_err());
/// ```
pub fn encode_wire_color(r: f64, g: f64, b: f64) -> Result<String, InvalidColor> {
    color_from_components(r, g, b).map(to_wire)
}

/// Wire-Format für eine bereits gültige Farbe
pub fn to_wire(color: PixelColor) -> String {
    format!("{},{},{}", color.r, color.g, color.b)
}

/// Dekodiert `"r,g,b"` (Leerzeichen um die Komponenten sind erlaubt)
pub fn decode_wire_color(s: &str) -> Result<PixelColor, InvalidColor> {
    parse_triple(s)
}

/// Dekodiert einen CSS-String der Form `rgb(r, g, b)` vom Color-Picker
pub fn decode_css_rgb(s: &str) -> Result<PixelColor, InvalidColor> {
    let inner = s
        .trim()
        .strip_prefix("rgb")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(InvalidColor)?;
    parse_triple(inner)
}

/// `#rrggbb` in Kleinbuchstaben
pub fn to_hex(color: PixelColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Dekodiert genau 6 Hex-Ziffern, optional mit führendem `#`
pub fn from_hex(s: &str) -> Result<PixelColor, InvalidColor> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(InvalidColor);
    }

    let channel = |range: core::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| InvalidColor)
    };

    Ok(RGB8 {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Akzeptiert jede der drei Text-Formen (Hex, CSS, Wire)
pub fn parse_color(s: &str) -> Result<PixelColor, InvalidColor> {
    let trimmed = s.trim();
    if trimmed.starts_with("rgb") {
        decode_css_rgb(trimmed)
    } else if trimmed.contains(',') {
        decode_wire_color(trimmed)
    } else {
        from_hex(trimmed)
    }
}

fn parse_triple(s: &str) -> Result<PixelColor, InvalidColor> {
    let mut parts = s.split(',');
    let r = parse_component(parts.next())?;
    let g = parse_component(parts.next())?;
    let b = parse_component(parts.next())?;
    if parts.next().is_some() {
        return Err(InvalidColor);
    }
    Ok(RGB8 { r, g, b })
}

fn parse_component(part: Option<&str>) -> Result<u8, InvalidColor> {
    let digits = part.ok_or(InvalidColor)?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidColor);
    }
    // Überlauf (> 255) liefert hier den Fehler
    digits.parse::<u8>().map_err(|_| InvalidColor)
}

fn round_component(value: f64) -> Result<u8, InvalidColor> {
    if !value.is_finite() || !(-1.0..=256.0).contains(&value) {
        return Err(InvalidColor);
    }

    // core hat kein f64::round, daher floor(x + 0.5) von Hand
    let shifted = value + 0.5;
    let truncated = shifted as i32;
    let rounded = if (truncated as f64) > shifted {
        truncated - 1
    } else {
        truncated
    };

    u8::try_from(rounded).map_err(|_| InvalidColor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wire_color() {
        assert_eq!(encode_wire_color(255.0, 0.0, 0.0).unwrap(), "255,0,0");
        assert_eq!(encode_wire_color(0.0, 128.0, 255.0).unwrap(), "0,128,255");
    }

    #[test]
    fn test_encode_wire_color_rounds() {
        assert_eq!(encode_wire_color(254.5, 0.49, 10.5).unwrap(), "255,0,11");
        assert_eq!(encode_wire_color(-0.4, 0.0, 0.0).unwrap(), "0,0,0");
    }

    #[test]
    fn test_encode_wire_color_out_of_range() {
        assert_eq!(encode_wire_color(255.5, 0.0, 0.0), Err(InvalidColor));
        assert_eq!(encode_wire_color(0.0, -1.0, 0.0), Err(InvalidColor));
        assert_eq!(encode_wire_color(0.0, 0.0, 1000.0), Err(InvalidColor));
        assert_eq!(encode_wire_color(f64::NAN, 0.0, 0.0), Err(InvalidColor));
        assert_eq!(encode_wire_color(0.0, f64::INFINITY, 0.0), Err(InvalidColor));
    }

    #[test]
    fn test_decode_wire_color() {
        assert_eq!(
            decode_wire_color("255,0,10"),
            Ok(RGB8 { r: 255, g: 0, b: 10 })
        );
        assert_eq!(
            decode_wire_color(" 1 , 2 ,3 "),
            Ok(RGB8 { r: 1, g: 2, b: 3 })
        );
    }

    #[test]
    fn test_decode_wire_color_malformed() {
        for input in ["", "1,2", "1,2,3,4", "256,0,0", "-1,0,0", "a,b,c", "1,,3", "+1,2,3"] {
            assert_eq!(decode_wire_color(input), Err(InvalidColor), "{input}");
        }
    }

    #[test]
    fn test_wire_round_trip_all_values() {
        for v in 0..=255u8 {
            let encoded = encode_wire_color(v as f64, (255 - v) as f64, (v / 2) as f64).unwrap();
            assert_eq!(
                decode_wire_color(&encoded),
                Ok(RGB8 { r: v, g: 255 - v, b: v / 2 })
            );
        }
    }

    #[test]
    fn test_decode_css_rgb() {
        assert_eq!(
            decode_css_rgb("rgb(255, 0, 0)"),
            Ok(RGB8 { r: 255, g: 0, b: 0 })
        );
        assert_eq!(
            decode_css_rgb("  rgb ( 12,34 , 56 ) "),
            Ok(RGB8 { r: 12, g: 34, b: 56 })
        );
    }

    #[test]
    fn test_decode_css_rgb_malformed() {
        for input in ["rgb(1,2)", "rgba(1,2,3,1)", "rgb 1,2,3", "rgb(300,0,0)", "(1,2,3)"] {
            assert_eq!(decode_css_rgb(input), Err(InvalidColor), "{input}");
        }
    }

    #[test]
    fn test_hex_round_trip() {
        let color = RGB8 { r: 0xab, g: 0x01, b: 0xff };
        assert_eq!(to_hex(color), "#ab01ff");
        assert_eq!(from_hex(&to_hex(color)), Ok(color));
    }

    #[test]
    fn test_from_hex_without_hash_and_uppercase() {
        assert_eq!(from_hex("FF8000"), Ok(RGB8 { r: 255, g: 128, b: 0 }));
    }

    #[test]
    fn test_from_hex_malformed() {
        for input in ["#12", "#ZZZZZZ", "", "#", "#1234567", "##123456", "12345"] {
            assert_eq!(from_hex(input), Err(InvalidColor), "{input}");
        }
    }

    #[test]
    fn test_parse_color_any_format() {
        let red = RGB8 { r: 255, g: 0, b: 0 };
        assert_eq!(parse_color("#ff0000"), Ok(red));
        assert_eq!(parse_color("ff0000"), Ok(red));
        assert_eq!(parse_color("rgb(255,0,0)"), Ok(red));
        assert_eq!(parse_color("255,0,0"), Ok(red));
        assert_eq!(parse_color("rot"), Err(InvalidColor));
    }
}
