//! Parameter types for image operations.
//!
//! These structs describe *what* to do; the [`pipeline`](super::pipeline)
//! module does the actual pixel work. Handlers build them from query strings
//! and never touch the `image` crate directly.

/// Output encoding selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Parse a query parameter value. `jpg` is an alias for `jpeg`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// MIME type for the Content-Type header.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

/// Policy for reconciling the source aspect ratio with target dimensions.
///
/// - `Cover`: fill the target box and center-crop overflow
/// - `Inside`: fit within the box, never enlarging the source
/// - `Fill`: stretch to the exact box, ignoring aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    #[default]
    Cover,
    Inside,
    Fill,
}

impl FitMode {
    /// Parse a query parameter value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cover" => Some(Self::Cover),
            "inside" => Some(Self::Inside),
            "fill" => Some(Self::Fill),
            _ => None,
        }
    }
}

/// Quality setting for lossy image encoding (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(if value == 0 { 1 } else if value > 100 { 100 } else { value })
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Unsharp-mask parameters.
///
/// - `sigma`: standard deviation of the Gaussian blur (higher = more sharpening)
/// - `threshold`: minimum brightness difference to sharpen (0 = sharpen all pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpening {
    /// Light sharpening applied after Lanczos upscaling.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

/// Pixel rectangle extracted from the source before any resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_accepts_jpg_alias() {
        assert_eq!(OutputFormat::parse("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("webp"), Some(OutputFormat::WebP));
        assert_eq!(OutputFormat::parse("avif"), None);
    }

    #[test]
    fn format_content_types() {
        assert_eq!(OutputFormat::Jpeg.content_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.content_type(), "image/png");
        assert_eq!(OutputFormat::WebP.content_type(), "image/webp");
    }

    #[test]
    fn fit_mode_parse() {
        assert_eq!(FitMode::parse("cover"), Some(FitMode::Cover));
        assert_eq!(FitMode::parse("inside"), Some(FitMode::Inside));
        assert_eq!(FitMode::parse("fill"), Some(FitMode::Fill));
        assert_eq!(FitMode::parse("outside"), None);
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(200).value(), 100);
    }

    #[test]
    fn quality_default_is_95() {
        assert_eq!(Quality::default().value(), 95);
    }

    #[test]
    fn sharpening_light_values() {
        let s = Sharpening::light();
        assert_eq!(s.sigma, 0.5);
        assert_eq!(s.threshold, 0);
    }
}
