use image::{DynamicImage, GrayImage, imageops::FilterType};

use crate::error::{CreditError, Result};

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image)
}

pub fn downsample_gray(image: &DynamicImage, width: u32, height: u32) -> Result<GrayImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CreditError::HashFailed("zero-area image".into()));
    }
    if width == 0 || height == 0 {
        return Err(CreditError::HashFailed(format!(
            "invalid down-sample dimensions {width}x{height}"
        )));
    }

    Ok(image
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_luma8())
}

pub fn mean_intensity(image: &GrayImage) -> f64 {
    let count = image.pixels().len();
    if count == 0 {
        return 0.0;
    }
    image.pixels().map(|p| p[0] as f64).sum::<f64>() / count as f64
}
