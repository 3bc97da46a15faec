//! Sample smoke-test image.
//!
//! A 32x32 grid of black/white pixels replicated across R, G and B, stored
//! as an uncompressed 24-bit BMP (BITMAPFILEHEADER + BITMAPINFOHEADER,
//! bottom-up rows, BGR order). The firmware's BMP reader expects exactly
//! this container.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Width and height of the sample image.
pub const SAMPLE_SIDE: usize = 32;

/// File header (14) plus info header (40).
pub const BMP_HEADER_LEN: usize = 54;

const INFO_HEADER_LEN: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;
/// 96 DPI expressed in pixels per metre.
const PIXELS_PER_METRE: i32 = 3780;

/// Single-intensity image; every pixel is written to all three channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleImage {
    side: usize,
    /// Row-major, top row first
    intensity: Vec<u8>,
}

impl SampleImage {
    /// Random binary pattern (0 or 255 per pixel) from `seed`.
    pub fn random_binary(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let intensity = (0..SAMPLE_SIDE * SAMPLE_SIDE)
            .map(|_| if rng.random_bool(0.5) { 255 } else { 0 })
            .collect();
        Self { side: SAMPLE_SIDE, intensity }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Intensity at (x, y) with y = 0 the top row.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.intensity[y * self.side + x]
    }

    /// Encode as a 24-bit BMP file.
    pub fn to_bmp(&self) -> Vec<u8> {
        let width = self.side;
        let height = self.side;
        let stride = (width * 3).div_ceil(4) * 4;
        let image_size = stride * height;
        let file_size = BMP_HEADER_LEN + image_size;

        let mut out = Vec::with_capacity(file_size);

        // BITMAPFILEHEADER
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&(file_size as u32).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(BMP_HEADER_LEN as u32).to_le_bytes());

        // BITMAPINFOHEADER
        out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
        out.extend_from_slice(&(width as i32).to_le_bytes());
        out.extend_from_slice(&(height as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        out.extend_from_slice(&(image_size as u32).to_le_bytes());
        out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        let padding = stride - width * 3;
        for y in (0..height).rev() {
            for x in 0..width {
                let v = self.pixel(x, y);
                out.extend_from_slice(&[v, v, v]);
            }
            out.extend(std::iter::repeat_n(0u8, padding));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_bmp_header_fields() {
        let bmp = SampleImage::random_binary(1).to_bmp();

        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(bmp.len(), 54 + 32 * 32 * 3);
        assert_eq!(u32_at(&bmp, 2) as usize, bmp.len());
        assert_eq!(u32_at(&bmp, 10), 54);
        assert_eq!(u32_at(&bmp, 14), 40);
        assert_eq!(u32_at(&bmp, 18), 32);
        assert_eq!(u32_at(&bmp, 22), 32);
        assert_eq!(u16_at(&bmp, 26), 1);
        assert_eq!(u16_at(&bmp, 28), 24);
        assert_eq!(u32_at(&bmp, 30), 0);
        assert_eq!(u32_at(&bmp, 34), 32 * 32 * 3);
    }

    #[test]
    fn test_pixels_are_binary_and_grey() {
        let bmp = SampleImage::random_binary(7).to_bmp();
        for px in bmp[BMP_HEADER_LEN..].chunks_exact(3) {
            assert!(px[0] == 0 || px[0] == 255);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_rows_are_bottom_up() {
        let image = SampleImage::random_binary(3);
        let bmp = image.to_bmp();
        // First stored row is the bottom image row
        for x in 0..SAMPLE_SIDE {
            assert_eq!(bmp[BMP_HEADER_LEN + x * 3], image.pixel(x, SAMPLE_SIDE - 1));
        }
        let last_row = BMP_HEADER_LEN + (SAMPLE_SIDE - 1) * SAMPLE_SIDE * 3;
        for x in 0..SAMPLE_SIDE {
            assert_eq!(bmp[last_row + x * 3], image.pixel(x, 0));
        }
    }

    #[test]
    fn test_same_seed_same_image() {
        assert_eq!(SampleImage::random_binary(42), SampleImage::random_binary(42));
        assert_ne!(SampleImage::random_binary(42), SampleImage::random_binary(43));
    }

    #[test]
    fn test_pattern_uses_both_levels() {
        let image = SampleImage::random_binary(5);
        let white = (0..SAMPLE_SIDE)
            .flat_map(|y| (0..SAMPLE_SIDE).map(move |x| (x, y)))
            .filter(|&(x, y)| image.pixel(x, y) == 255)
            .count();
        assert!(white > 0 && white < SAMPLE_SIDE * SAMPLE_SIDE);
    }
}
