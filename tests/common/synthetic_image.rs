use image::{GrayImage, Luma};

/// Uniform image of a single intensity.
pub fn constant(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Horizontal intensity ramp of slope 8 wrapping every 32 columns, starting `offset` columns in.
///
/// Any horizontal shift of 1 to 15 columns changes every pixel by at least 8 levels.
pub fn ramp(width: u32, height: u32, offset: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| Luma([(((x + offset) * 8) % 256) as u8]))
}

/// Horizontal ramp of slope 16 wrapping every 16 columns, starting `offset` columns in.
///
/// Any horizontal shift of 1 to 15 columns changes every pixel by at least 16 levels.
pub fn steep_ramp(width: u32, height: u32, offset: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| Luma([(((x + offset) * 16) % 256) as u8]))
}

/// Add deterministic noise in `-amplitude..=amplitude` to every pixel, clamped to 0..=255.
pub fn with_noise(img: &GrayImage, amplitude: u32, seed: u32) -> GrayImage {
    let hashed = textured(img.width(), img.height(), seed);

    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let offset = (hashed.get_pixel(x, y).0[0] as u32 % (2 * amplitude + 1)) as i32
            - amplitude as i32;
        let value = img.get_pixel(x, y).0[0] as i32 + offset;
        Luma([value.max(0).min(255) as u8])
    })
}

/// Stereo pair where scene content appears `shift` columns further left in the right image.
pub fn shifted_ramp_pair(width: u32, height: u32, shift: u32) -> (GrayImage, GrayImage) {
    (ramp(width, height, 0), ramp(width, height, shift))
}

/// Irregular texture without a consistent disparity.
pub fn textured(width: u32, height: u32, seed: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let mut h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663) ^ seed;
        h ^= h >> 13;
        h = h.wrapping_mul(0x5bd1_e995);
        h ^= h >> 15;
        Luma([(h & 0xff) as u8])
    })
}
