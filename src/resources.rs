//! Loading of the optional external resources: the cover image and a custom font.
//!
//! Both loaders return a [`ResourceError`] on failure. The renderers treat those as
//! warnings and fall back to a solid background or the built-in font family.

use std::fs;
use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::error::ResourceError;
use crate::fonts::metrics::win_ansi_char;

/// A decoded image ready to be embedded, stored as 8-bit RGB samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageResource {
    source: PathBuf,
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl ImageResource {
    /// Builds a resource from raw RGB samples (`width * height * 3` bytes).
    pub fn from_rgb(source: impl Into<PathBuf>, width: u32, height: u32, rgb: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            rgb,
        }
    }

    /// Path the image was loaded from; also used to de-duplicate embedded copies.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGB samples.
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Effective resolution when stretched over `width_in` x `height_in` inches. The lower
    /// of the two axes is returned.
    pub fn effective_dpi(&self, width_in: f64, height_in: f64) -> f64 {
        let horizontal = f64::from(self.width) / width_in;
        let vertical = f64::from(self.height) / height_in;
        horizontal.min(vertical)
    }
}

/// Decodes the image at `path`, guessing the format from its contents.
pub fn load_image(path: &Path) -> Result<ImageResource, ResourceError> {
    let io_error = |source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let decoded = image::io::Reader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?
        .decode()
        .map_err(|source| ResourceError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    let (width, height) = decoded.dimensions();
    let rgb = decoded.to_rgb8().into_raw();
    Ok(ImageResource::from_rgb(path, width, height, rgb))
}

/// Glyph metrics of a custom font, scaled to 1000 units per em.
#[derive(Clone, Debug, PartialEq)]
pub struct FontMetrics {
    /// Advance widths indexed by WinAnsi code.
    pub widths: Vec<u16>,
    /// Typographic ascender.
    pub ascent: i32,
    /// Typographic descender (negative).
    pub descent: i32,
    /// Height of capital letters.
    pub cap_height: i32,
    /// Font bounding box `[x_min, y_min, x_max, y_max]`.
    pub bbox: [i32; 4],
    /// Whether the face reports itself as italic.
    pub italic: bool,
}

impl FontMetrics {
    /// Width of a WinAnsi byte in 1000ths of the font size.
    pub fn width_of(&self, code: u8) -> u16 {
        self.widths.get(usize::from(code)).copied().unwrap_or(0)
    }
}

/// A parsed TrueType/OpenType font file.
#[derive(Clone, Debug, PartialEq)]
pub struct FontResource {
    source: PathBuf,
    data: Vec<u8>,
    metrics: FontMetrics,
}

impl FontResource {
    /// Parses font bytes, keeping the original data for embedding.
    pub fn parse(source: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self, ResourceError> {
        let source = source.into();
        let face = ttf_parser::Face::parse(&data, 0).map_err(|err| ResourceError::Font {
            path: source.clone(),
            reason: err.to_string(),
        })?;

        let units = f64::from(face.units_per_em().max(1));
        let scale = |value: f64| (value * 1000.0 / units).round() as i32;

        let widths = (0..=255u8)
            .map(|code| {
                win_ansi_char(code)
                    .and_then(|c| face.glyph_index(c))
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| scale(f64::from(advance)).max(0) as u16)
                    .unwrap_or(0)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let ascent = scale(f64::from(face.ascender()));
        let metrics = FontMetrics {
            widths,
            ascent,
            descent: scale(f64::from(face.descender())),
            cap_height: face
                .capital_height()
                .map(|height| scale(f64::from(height)))
                .unwrap_or(ascent),
            bbox: [
                scale(f64::from(bbox.x_min)),
                scale(f64::from(bbox.y_min)),
                scale(f64::from(bbox.x_max)),
                scale(f64::from(bbox.y_max)),
            ],
            italic: face.is_italic(),
        };

        Ok(Self {
            source,
            data,
            metrics,
        })
    }

    /// Path the font was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw font program bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parsed metrics.
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }
}

/// Reads and parses the font file at `path`.
pub fn load_font(path: &Path) -> Result<FontResource, ResourceError> {
    let data = fs::read(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontResource::parse(path, data)
}
