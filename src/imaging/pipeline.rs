//! Decode, transform, and encode operations backed by the `image` crate.
//!
//! All resampling uses the Lanczos3 kernel. Nothing here hand-rolls pixel
//! work: cropping, resizing, sharpening, and the JPEG/PNG/WebP codecs are
//! direct calls into `image`.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageOutputFormat};

use super::error::{ImagingError, Result};
use super::params::{CropRect, FitMode, OutputFormat, Quality, Sharpening};

/// Source image description returned by [`probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Container format name, e.g. `jpeg`, `png`, `webp`
    pub format: &'static str,
}

fn reader(data: &[u8]) -> Result<image::io::Reader<Cursor<&[u8]>>> {
    image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImagingError::Decode(image::ImageError::IoError(e)))
}

/// Report source dimensions and container format without a full decode.
///
/// Reads only the image header, so it is safe to call before the pixel
/// limit check.
pub fn probe(data: &[u8]) -> Result<ImageInfo> {
    let r = reader(data)?;
    let format = r.format().ok_or(ImagingError::UnknownFormat)?;
    let (width, height) = r.into_dimensions().map_err(ImagingError::Decode)?;
    Ok(ImageInfo {
        width,
        height,
        format: format_name(format),
    })
}

/// Decode the source image, rejecting anything over `max_pixels`.
///
/// Dimensions come from the header before the full decode runs, so an
/// oversized source is rejected without allocating its pixel buffer.
pub fn decode(data: &[u8], max_pixels: u64) -> Result<DynamicImage> {
    let (width, height) = reader(data)?
        .into_dimensions()
        .map_err(ImagingError::Decode)?;
    let pixels = u64::from(width) * u64::from(height);
    if pixels > max_pixels {
        return Err(ImagingError::TooLarge {
            width,
            height,
            max_pixels,
        });
    }
    reader(data)?.decode().map_err(ImagingError::Decode)
}

/// Extract a pixel rectangle. The rectangle must lie fully inside the image.
pub fn crop(img: &DynamicImage, rect: CropRect) -> Result<DynamicImage> {
    let (width, height) = (img.width(), img.height());
    let fits = rect.width > 0
        && rect.height > 0
        && rect.x.checked_add(rect.width).is_some_and(|r| r <= width)
        && rect.y.checked_add(rect.height).is_some_and(|b| b <= height);
    if !fits {
        return Err(ImagingError::CropOutOfBounds {
            x: rect.x,
            y: rect.y,
            w: rect.width,
            h: rect.height,
            width,
            height,
        });
    }
    Ok(img.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// Resize to the target box according to the fit mode.
#[must_use]
pub fn resize(img: &DynamicImage, width: u32, height: u32, fit: FitMode) -> DynamicImage {
    match fit {
        FitMode::Cover => img.resize_to_fill(width, height, FilterType::Lanczos3),
        FitMode::Inside => {
            // inside never enlarges: a box bigger than the source is a no-op
            if width >= img.width() && height >= img.height() {
                img.clone()
            } else {
                img.resize(width, height, FilterType::Lanczos3)
            }
        }
        FitMode::Fill => img.resize_exact(width, height, FilterType::Lanczos3),
    }
}

/// Apply an unsharp mask.
#[must_use]
pub fn sharpen(img: &DynamicImage, sharpening: Sharpening) -> DynamicImage {
    img.unsharpen(sharpening.sigma, sharpening.threshold)
}

/// Encode to the requested output format.
///
/// `quality` only affects JPEG; PNG is lossless and the `image` crate's WebP
/// encoder is lossless as well.
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            // JPEG cannot carry an alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality.value()))
        }
        OutputFormat::Png => img.write_to(&mut buffer, ImageOutputFormat::Png),
        OutputFormat::WebP => img.write_to(&mut buffer, ImageOutputFormat::WebP),
    }
    .map_err(ImagingError::Encode)?;
    Ok(buffer.into_inner())
}

/// Compute upscale target dimensions.
///
/// Scales the longer side to exactly `target`, the shorter side
/// proportionally (rounded to nearest). A source whose longer side is
/// already at or above `target` keeps its dimensions.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn upscale_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    if width >= height {
        if width >= target {
            (width, height)
        } else {
            let scaled = (f64::from(height) / f64::from(width) * f64::from(target)).round() as u32;
            (target, scaled.max(1))
        }
    } else if height >= target {
        (width, height)
    } else {
        let scaled = (f64::from(width) / f64::from(height) * f64::from(target)).round() as u32;
        (scaled.max(1), target)
    }
}

/// Map a detected container format to its conventional lowercase name.
const fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Ico => "ico",
        ImageFormat::Avif => "avif",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// Build a small gradient image entirely in memory.
    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        encode(&test_image(width, height), OutputFormat::Png, Quality::default()).unwrap()
    }

    #[test]
    fn probe_reports_dimensions_and_format() {
        let data = png_bytes(320, 200);
        let info = probe(&data).unwrap();
        assert_eq!(info.width, 320);
        assert_eq!(info.height, 200);
        assert_eq!(info.format, "png");
    }

    #[test]
    fn probe_rejects_garbage() {
        assert!(matches!(
            probe(&[0u8; 16]),
            Err(ImagingError::UnknownFormat)
        ));
    }

    #[test]
    fn decode_roundtrip() {
        let data = png_bytes(64, 48);
        let img = decode(&data, 1_000_000).unwrap();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 48);
    }

    #[test]
    fn decode_enforces_pixel_limit() {
        let data = png_bytes(100, 100);
        let err = decode(&data, 5_000).unwrap_err();
        assert!(matches!(err, ImagingError::TooLarge { .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn crop_inside_bounds() {
        let img = test_image(100, 80);
        let cropped = crop(
            &img,
            CropRect {
                x: 10,
                y: 20,
                width: 50,
                height: 40,
            },
        )
        .unwrap();
        assert_eq!(cropped.width(), 50);
        assert_eq!(cropped.height(), 40);
    }

    #[test]
    fn crop_rejects_out_of_bounds_rect() {
        let img = test_image(100, 80);
        let result = crop(
            &img,
            CropRect {
                x: 60,
                y: 0,
                width: 50,
                height: 40,
            },
        );
        assert!(matches!(result, Err(ImagingError::CropOutOfBounds { .. })));
    }

    #[test]
    fn crop_rejects_zero_size_rect() {
        let img = test_image(100, 80);
        let result = crop(
            &img,
            CropRect {
                x: 0,
                y: 0,
                width: 0,
                height: 10,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn resize_cover_hits_exact_dimensions() {
        let img = test_image(400, 300);
        let out = resize(&img, 100, 100, FitMode::Cover);
        assert_eq!((out.width(), out.height()), (100, 100));
    }

    #[test]
    fn resize_inside_preserves_aspect_ratio() {
        let img = test_image(400, 300);
        let out = resize(&img, 200, 200, FitMode::Inside);
        // 400x300 into a 200x200 box: width bound, 200x150
        assert_eq!((out.width(), out.height()), (200, 150));
    }

    #[test]
    fn resize_inside_never_enlarges() {
        let img = test_image(100, 50);
        let out = resize(&img, 400, 400, FitMode::Inside);
        assert_eq!((out.width(), out.height()), (100, 50));
    }

    #[test]
    fn resize_fill_ignores_aspect_ratio() {
        let img = test_image(400, 300);
        let out = resize(&img, 120, 90, FitMode::Fill);
        assert_eq!((out.width(), out.height()), (120, 90));
    }

    #[test]
    fn sharpen_keeps_dimensions() {
        let img = test_image(50, 40);
        let out = sharpen(&img, Sharpening::light());
        assert_eq!((out.width(), out.height()), (50, 40));
    }

    #[test]
    fn encode_jpeg_flattens_alpha() {
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            10,
            10,
            image::Rgba([255, 0, 0, 128]),
        ));
        let data = encode(&rgba, OutputFormat::Jpeg, Quality::new(80)).unwrap();
        assert_eq!(probe(&data).unwrap().format, "jpeg");
    }

    #[test]
    fn encode_webp_roundtrip() {
        let data = encode(&test_image(32, 32), OutputFormat::WebP, Quality::default()).unwrap();
        assert_eq!(probe(&data).unwrap().format, "webp");
    }

    #[test]
    fn upscale_landscape_scales_long_side_to_target() {
        assert_eq!(upscale_dimensions(1000, 500, 4096), (4096, 2048));
    }

    #[test]
    fn upscale_portrait_scales_long_side_to_target() {
        assert_eq!(upscale_dimensions(500, 1000, 4096), (2048, 4096));
    }

    #[test]
    fn upscale_square_scales_both_sides() {
        assert_eq!(upscale_dimensions(100, 100, 4096), (4096, 4096));
    }

    #[test]
    fn upscale_short_side_rounds_to_nearest() {
        // 1000x1500 -> height 4096, width 4096 * 2/3 = 2730.67 -> 2731
        assert_eq!(upscale_dimensions(1000, 1500, 4096), (2731, 4096));
    }

    #[test]
    fn upscale_skips_already_large_sources() {
        assert_eq!(upscale_dimensions(5000, 2500, 4096), (5000, 2500));
        assert_eq!(upscale_dimensions(4096, 1000, 4096), (4096, 1000));
    }
}
