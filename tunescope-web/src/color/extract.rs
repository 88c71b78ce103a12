//! Dominant color extraction from album artwork

use super::ColorValue;
use image::{DynamicImage, RgbaImage};

/// Artwork is downsampled to fit this edge before sampling
const SAMPLE_MAX_EDGE: u32 = 64;

/// Pixels with lower alpha are ignored
const MIN_ALPHA: u8 = 125;

/// Bits kept per channel when bucketing (4 bits -> 4096 buckets)
const BUCKET_BITS: u8 = 4;

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u32,
    r_sum: u64,
    g_sum: u64,
    b_sum: u64,
    /// Order in which the bucket was first hit, for stable tie-breaking
    first_seen: usize,
}

/// Decode `bytes` and return the dominant color of the image
///
/// Images without any opaque pixels yield black.
pub fn dominant_color(bytes: &[u8]) -> image::ImageResult<ColorValue> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(dominant_color_of(&decoded))
}

/// Dominant color of an already decoded image
pub fn dominant_color_of(image: &DynamicImage) -> ColorValue {
    let sample = image.thumbnail(SAMPLE_MAX_EDGE, SAMPLE_MAX_EDGE).to_rgba8();
    dominant_color_of_pixels(&sample)
}

fn bucket_index(r: u8, g: u8, b: u8) -> usize {
    let shift = 8 - BUCKET_BITS;
    ((usize::from(r >> shift)) << (2 * BUCKET_BITS))
        | ((usize::from(g >> shift)) << BUCKET_BITS)
        | usize::from(b >> shift)
}

fn dominant_color_of_pixels(pixels: &RgbaImage) -> ColorValue {
    let mut buckets = vec![Bucket::default(); 1 << (3 * BUCKET_BITS)];
    let mut seen = 0usize;

    for pixel in pixels.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < MIN_ALPHA {
            continue;
        }

        let bucket = &mut buckets[bucket_index(r, g, b)];
        if bucket.count == 0 {
            bucket.first_seen = seen;
            seen += 1;
        }
        bucket.count += 1;
        bucket.r_sum += u64::from(r);
        bucket.g_sum += u64::from(g);
        bucket.b_sum += u64::from(b);
    }

    let winner = buckets
        .iter()
        .filter(|bucket| bucket.count > 0)
        .max_by(|a, b| {
            a.count
                .cmp(&b.count)
                .then_with(|| b.first_seen.cmp(&a.first_seen))
        });

    match winner {
        Some(bucket) => {
            let n = u64::from(bucket.count);
            // Means of u8 values always fit in u8
            ColorValue::new(
                (bucket.r_sum / n) as u8,
                (bucket.g_sum / n) as u8,
                (bucket.b_sum / n) as u8,
            )
        }
        None => ColorValue::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode_png(image: RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_solid_image() {
        let image = RgbaImage::from_pixel(32, 32, Rgba([200, 40, 40, 255]));
        assert_eq!(dominant_color_of_pixels(&image), ColorValue::new(200, 40, 40));
    }

    #[test]
    fn test_majority_color_wins() {
        // 3/4 blue, 1/4 yellow
        let image = RgbaImage::from_fn(40, 40, |x, _| {
            if x < 30 {
                Rgba([20, 40, 200, 255])
            } else {
                Rgba([250, 230, 10, 255])
            }
        });
        assert_eq!(dominant_color_of_pixels(&image), ColorValue::new(20, 40, 200));
    }

    #[test]
    fn test_bucket_averages_similar_shades() {
        // Both shades land in the same 4-bit bucket
        let image = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([100, 100, 100, 255])
            } else {
                Rgba([102, 104, 106, 255])
            }
        });
        assert_eq!(dominant_color_of_pixels(&image), ColorValue::new(101, 102, 103));
    }

    #[test]
    fn test_tie_prefers_first_seen() {
        let image = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([250, 0, 0, 255])
            } else {
                Rgba([0, 0, 250, 255])
            }
        });
        assert_eq!(dominant_color_of_pixels(&image), ColorValue::new(250, 0, 0));
    }

    #[test]
    fn test_transparent_pixels_ignored() {
        let image = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 8 {
                Rgba([255, 255, 255, 0])
            } else {
                Rgba([10, 120, 60, 255])
            }
        });
        assert_eq!(dominant_color_of_pixels(&image), ColorValue::new(10, 120, 60));
    }

    #[test]
    fn test_fully_transparent_is_black() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        assert_eq!(dominant_color_of_pixels(&image), ColorValue::BLACK);
    }

    #[test]
    fn test_decode_png_bytes() {
        let bytes = encode_png(RgbaImage::from_pixel(300, 300, Rgba([30, 215, 96, 255])));
        assert_eq!(dominant_color(&bytes).unwrap(), ColorValue::new(30, 215, 96));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(dominant_color(b"definitely not an image").is_err());
    }
}
