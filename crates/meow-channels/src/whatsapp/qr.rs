//! QR code rendering for the pairing flow.

use meow_core::error::MeowError;
use qrcode::{Color, EcLevel, QrCode};

/// Pixels per QR module in the PNG rendering.
const MODULE_PX: u32 = 10;
/// Quiet zone around the code, in modules.
const QUIET_ZONE: u32 = 2;

fn encode(qr_data: &str) -> Result<QrCode, MeowError> {
    QrCode::with_error_correction_level(qr_data.as_bytes(), EcLevel::L)
        .map_err(|e| MeowError::Transport(format!("QR generation failed: {e}")))
}

/// Render a QR code for the terminal with Unicode half blocks, two module
/// rows per text line.
pub fn generate_qr_terminal(qr_data: &str) -> Result<String, MeowError> {
    let code = encode(qr_data)?;
    let width = code.width();
    let colors = code.into_colors();
    let dark = |row: usize, col: usize| row < width && colors[row * width + col] == Color::Dark;

    let mut out = String::with_capacity((width + 1) * width.div_ceil(2));
    for row in (0..width).step_by(2) {
        for col in 0..width {
            out.push(match (dark(row, col), dark(row + 1, col)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    Ok(out)
}

/// Render a QR code as PNG bytes, served by the pairing endpoint.
pub fn generate_qr_image(qr_data: &str) -> Result<Vec<u8>, MeowError> {
    use image::{ImageBuffer, Luma};

    let code = encode(qr_data)?;
    let modules = code.width() as u32;
    let side = (modules + QUIET_ZONE * 2) * MODULE_PX;

    let img = ImageBuffer::from_fn(side, side, |x, y| {
        let (cx, cy) = (x / MODULE_PX, y / MODULE_PX);
        let inside = (QUIET_ZONE..QUIET_ZONE + modules).contains(&cx)
            && (QUIET_ZONE..QUIET_ZONE + modules).contains(&cy);
        if inside
            && code[((cx - QUIET_ZONE) as usize, (cy - QUIET_ZONE) as usize)] == Color::Dark
        {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });

    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| MeowError::Transport(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}
