//! QR rendering of payment intents.
//!
//! The seller screen shows the encoded [`PaymentIntent`] as a QR code with
//! dark modules on a light background.

use qrcode::QrCode;
use qrcode::render::svg;
pub use qrcode::types::QrError;

use crate::intent::PaymentIntent;

/// Colors and margin of a rendered code.
#[derive(Debug, Clone)]
pub struct QrStyle {
    /// Dark module color (hex, e.g. `"#000000"`).
    pub dark: String,
    /// Background color (hex, e.g. `"#FFFFFF"`).
    pub light: String,
    /// Whether to surround the code with a quiet zone.
    pub quiet_zone: bool,
    /// Minimum SVG width and height in pixels.
    pub min_size: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            dark: "#000000".to_owned(),
            light: "#FFFFFF".to_owned(),
            quiet_zone: true,
            min_size: 200,
        }
    }
}

/// Builds the QR code for an intent's payload.
///
/// # Errors
///
/// Returns [`QrError`] if the payload does not fit in a QR code.
pub fn encode_qr(intent: &PaymentIntent) -> Result<QrCode, QrError> {
    QrCode::new(intent.encode().as_bytes())
}

/// Renders an intent as an SVG document.
///
/// # Errors
///
/// Returns [`QrError`] if the payload does not fit in a QR code.
pub fn render_svg(intent: &PaymentIntent, style: &QrStyle) -> Result<String, QrError> {
    let code = encode_qr(intent)?;
    Ok(code
        .render::<svg::Color<'_>>()
        .quiet_zone(style.quiet_zone)
        .min_dimensions(style.min_size, style.min_size)
        .dark_color(svg::Color(&style.dark))
        .light_color(svg::Color(&style.light))
        .build())
}

/// Renders an intent as text for a terminal, two characters per module.
///
/// # Errors
///
/// Returns [`QrError`] if the payload does not fit in a QR code.
pub fn render_terminal(intent: &PaymentIntent) -> Result<String, QrError> {
    let code = encode_qr(intent)?;
    Ok(code
        .render::<char>()
        .quiet_zone(true)
        .module_dimensions(2, 1)
        .build())
}
