use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::utils::errors::AppError;

const MODULE_SCALE: u32 = 8;
const QUIET_ZONE: u32 = 4;

/// Renders `data` as a QR code and returns it as a `data:image/png;base64,...`
/// URI, the format the receipt UI embeds directly in an `<img>` tag.
pub fn qr_png_data_uri(data: &str) -> Result<String, AppError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::Q)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode QR code: {}", e)))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let dim = (width + 2 * QUIET_ZONE) * MODULE_SCALE;
    let mut img = GrayImage::from_pixel(dim, dim, Luma([255u8]));

    for y in 0..width {
        for x in 0..width {
            if colors[(y * width + x) as usize] == Color::Dark {
                let base_x = (x + QUIET_ZONE) * MODULE_SCALE;
                let base_y = (y + QUIET_ZONE) * MODULE_SCALE;
                for dy in 0..MODULE_SCALE {
                    for dx in 0..MODULE_SCALE {
                        img.put_pixel(base_x + dx, base_y + dy, Luma([0u8]));
                    }
                }
            }
        }
    }

    let mut buf = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to render QR PNG: {}", e)))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(buf)))
}
