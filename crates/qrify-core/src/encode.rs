//! QR code generation: SVG markup and PNG data URLs.

use crate::{QrifyError, Result};
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::render::svg;
use qrcode::QrCode;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// Light modules and the quiet zone are always white.
pub const BACKGROUND: HexColor = HexColor {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

/// Foreground used when the client does not send one.
pub const DEFAULT_FOREGROUND: HexColor = HexColor {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

/// PNG width used when the client does not send one.
pub const DEFAULT_PNG_SIZE: u32 = 200;

/// Quiet zone width in modules, on every side.
pub const QUIET_ZONE: u32 = 4;

/// An RGBA color parsed from `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    fn to_pixel(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl FromStr for HexColor {
    type Err = QrifyError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || QrifyError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        // Short forms double each digit: "f0c" -> "ff00cc"
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
            a: if expanded.len() == 8 { channel(3)? } else { 255 },
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Rendering options for [`encode`].
#[derive(Debug, Clone, Copy)]
pub struct QrOptions {
    pub foreground: HexColor,
    /// Target PNG width in pixels. The SVG is resolution independent.
    pub size: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            foreground: DEFAULT_FOREGROUND,
            size: DEFAULT_PNG_SIZE,
        }
    }
}

/// Both encodings of one payload.
#[derive(Debug, Clone)]
pub struct EncodedQr {
    /// `data:image/png;base64,...`
    pub png_data_url: String,
    pub svg: String,
}

/// Encode `text` as a QR symbol and render it as SVG and PNG.
pub fn encode(text: &str, options: &QrOptions) -> Result<EncodedQr> {
    let code = QrCode::new(text.as_bytes())?;

    let foreground = options.foreground.to_string();
    let background = BACKGROUND.to_string();
    let svg = code
        .render::<svg::Color>()
        .quiet_zone(true)
        .dark_color(svg::Color(&foreground))
        .light_color(svg::Color(&background))
        .build();

    let png = render_png(&code, options.foreground, options.size);
    let png_data_url = png_data_url(&png)?;

    Ok(EncodedQr { png_data_url, svg })
}

/// Rasterize `code` into a square image exactly `max(size, modules)` pixels wide.
///
/// Each module is `size / modules` pixels (at least one). Pixels left over by
/// the integer scale end up in the right and bottom quiet zone.
pub fn render_png(code: &QrCode, foreground: HexColor, size: u32) -> RgbaImage {
    let width = code.width() as u32;
    let modules = width + QUIET_ZONE * 2;
    let dimension = size.max(modules);
    let scale = dimension / modules;
    let margin = QUIET_ZONE * scale;

    let colors = code.to_colors();
    let dark = foreground.to_pixel();
    let mut img = RgbaImage::from_pixel(dimension, dimension, BACKGROUND.to_pixel());

    for y in 0..width {
        for x in 0..width {
            if colors[(y * width + x) as usize] != qrcode::Color::Dark {
                continue;
            }
            let (px, py) = (margin + x * scale, margin + y * scale);
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(px + dx, py + dy, dark);
                }
            }
        }
    }

    img
}

/// Encode a raster as a base64 PNG data URL.
pub fn png_data_url(img: &RgbaImage) -> Result<String> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(buf.into_inner());
    Ok(format!("data:image/png;base64,{}", encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#000000".parse::<HexColor>().unwrap(), DEFAULT_FOREGROUND);
        assert_eq!("fff".parse::<HexColor>().unwrap(), BACKGROUND);
        assert_eq!(
            "#f0c8".parse::<HexColor>().unwrap(),
            HexColor { r: 0xff, g: 0x00, b: 0xcc, a: 0x88 }
        );
        assert_eq!(
            " #12AB34 ".parse::<HexColor>().unwrap(),
            HexColor { r: 0x12, g: 0xab, b: 0x34, a: 255 }
        );
        assert_eq!(
            "#12ab3480".parse::<HexColor>().unwrap(),
            HexColor { r: 0x12, g: 0xab, b: 0x34, a: 0x80 }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "#", "red", "#12345", "#gggggg", "#1234567890", "rgb(0,0,0)", "#é12"] {
            assert!(bad.parse::<HexColor>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_display_normalizes() {
        assert_eq!("#ABC".parse::<HexColor>().unwrap().to_string(), "#aabbcc");
        assert_eq!("#00000080".parse::<HexColor>().unwrap().to_string(), "#00000080");
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(r: u8, g: u8, b: u8, a: u8) {
            let color = HexColor { r, g, b, a };
            prop_assert_eq!(color.to_string().parse::<HexColor>().unwrap(), color);
        }
    }

    #[test]
    fn test_render_png_dimensions() {
        let code = QrCode::new(b"https://example.com").unwrap();
        let modules = code.width() as u32 + QUIET_ZONE * 2;

        let img = render_png(&code, DEFAULT_FOREGROUND, 200);
        assert_eq!(img.dimensions(), (200, 200));

        // Too small for the symbol: one pixel per module.
        let img = render_png(&code, DEFAULT_FOREGROUND, 1);
        assert_eq!(img.dimensions(), (modules, modules));
    }

    #[test]
    fn test_render_png_colors() {
        let code = QrCode::new(b"hello").unwrap();
        let red: HexColor = "#ff0000".parse().unwrap();
        let img = render_png(&code, red, 300);
        let scale = 300 / (code.width() as u32 + QUIET_ZONE * 2);

        // Quiet zone corner is background.
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        // Top-left finder pattern starts with a dark module.
        let edge = QUIET_ZONE * scale;
        assert_eq!(*img.get_pixel(edge, edge), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_encode_outputs() {
        let options = QrOptions {
            foreground: "#123456".parse().unwrap(),
            size: 200,
        };
        let encoded = encode("https://example.com", &options).unwrap();

        assert!(encoded.png_data_url.starts_with("data:image/png;base64,"));
        assert!(encoded.svg.contains("<svg"));
        assert!(encoded.svg.contains("#123456"));
        assert!(encoded.svg.contains("#ffffff"));
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let payload = "x".repeat(8000);
        assert!(matches!(
            encode(&payload, &QrOptions::default()),
            Err(QrifyError::Encode(_))
        ));
    }
}
