//! Page geometry: margins, the content rectangle and page size presets.
//!
//! Physical inputs are expressed in inches. Everything returned from this module is
//! already converted to render units (points) with the origin at the bottom-left
//! corner of the page, which is the coordinate system of the drawing surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Axis, InvalidMarginsError, ValidationError};
use crate::units::{mm_to_inches, to_render_units};

/// Four page margins in inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Distance from the top edge.
    pub top: f64,
    /// Distance from the bottom edge.
    pub bottom: f64,
    /// Distance from the left edge.
    pub left: f64,
    /// Distance from the right edge.
    pub right: f64,
}

impl Margins {
    /// Creates margins from explicit values.
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Uses the same margin on every side.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Returns the margins paired with their side names, top first.
    pub fn sides(&self) -> [(&'static str, f64); 4] {
        [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ]
    }
}

/// Usable drawing area of a page, in render units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentRect {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl ContentRect {
    /// Horizontal extent of the rectangle.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent of the rectangle.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Computes the content rectangle for a page of the given size (inches).
///
/// Fails when the margins meet or cross on either axis.
pub fn resolve_content_rect(
    page_width: f64,
    page_height: f64,
    margins: &Margins,
) -> Result<ContentRect, InvalidMarginsError> {
    let rect = ContentRect {
        left: to_render_units(margins.left),
        right: to_render_units(page_width - margins.right),
        top: to_render_units(page_height - margins.top),
        bottom: to_render_units(margins.bottom),
    };

    // Negated comparisons so NaN inputs are rejected as well.
    if !(rect.right > rect.left) {
        return Err(InvalidMarginsError {
            axis: Axis::Horizontal,
            near: rect.left,
            far: rect.right,
        });
    }
    if !(rect.top > rect.bottom) {
        return Err(InvalidMarginsError {
            axis: Axis::Vertical,
            near: rect.bottom,
            far: rect.top,
        });
    }

    Ok(rect)
}

/// Rectangle placement in render units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Scales a `source_width` x `source_height` box to fit inside the target box while keeping
/// its aspect ratio, centered on both axes.
pub fn fit_within(target: Placement, source_width: f64, source_height: f64) -> Placement {
    if source_width <= 0.0 || source_height <= 0.0 {
        return target;
    }

    let scale = (target.width / source_width).min(target.height / source_height);
    let width = source_width * scale;
    let height = source_height * scale;

    Placement {
        x: target.x + (target.width - width) / 2.0,
        y: target.y + (target.height - height) / 2.0,
        width,
        height,
    }
}

/// Common trim sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageSize {
    /// 6 x 9 inch trade paperback.
    SixByNine,
    /// US Letter, 8.5 x 11 inches.
    Letter,
    /// ISO A4, 210 x 297 mm.
    A4,
    /// Arbitrary width and height in inches.
    Custom {
        /// Width in inches.
        width: f64,
        /// Height in inches.
        height: f64,
    },
}

impl PageSize {
    /// Portrait dimensions in inches as `(width, height)`.
    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            Self::SixByNine => (6.0, 9.0),
            Self::Letter => (8.5, 11.0),
            Self::A4 => (mm_to_inches(210.0), mm_to_inches(297.0)),
            Self::Custom { width, height } => (width, height),
        }
    }

    /// Dimensions for the given orientation.
    pub fn oriented(&self, orientation: Orientation) -> (f64, f64) {
        let (width, height) = self.dimensions();
        match orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }
}

impl FromStr for PageSize {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "6x9" => Ok(Self::SixByNine),
            "8.5x11" | "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            other => {
                let unknown = || ValidationError::UnknownPageSize(value.to_string());
                let (width, height) = other.split_once('x').ok_or_else(unknown)?;
                let width = width.trim().parse::<f64>().map_err(|_| unknown())?;
                let height = height.trim().parse::<f64>().map_err(|_| unknown())?;
                Ok(Self::Custom { width, height })
            }
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SixByNine => f.write_str("6x9"),
            Self::Letter => f.write_str("8.5x11"),
            Self::A4 => f.write_str("A4"),
            Self::Custom { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

/// Page orientation applied to a [`PageSize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl FromStr for Orientation {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(ValidationError::UnknownOrientation(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_half_inch_margins_on_six_by_nine() {
        let rect = resolve_content_rect(6.0, 9.0, &Margins::uniform(0.5)).expect("valid margins");
        assert_eq!(rect.left, 36.0);
        assert_eq!(rect.right, 396.0);
        assert_eq!(rect.top, 612.0);
        assert_eq!(rect.bottom, 36.0);
        assert_eq!(rect.height(), 576.0);
        assert_eq!(rect.width(), 360.0);
    }

    #[test]
    fn valid_margins_always_yield_positive_extent() {
        for (width, height) in [(6.0, 9.0), (8.5, 11.0), (5.0, 5.0)] {
            for margin in [0.0, 0.1, 0.5, 1.25, 2.4] {
                let rect = resolve_content_rect(width, height, &Margins::uniform(margin))
                    .expect("margins smaller than half the page");
                assert!(rect.right > rect.left);
                assert!(rect.top > rect.bottom);
            }
        }
    }

    #[test]
    fn touching_horizontal_margins_are_rejected() {
        let err = resolve_content_rect(6.0, 9.0, &Margins::new(0.5, 0.5, 3.0, 3.0)).unwrap_err();
        assert_eq!(err.axis, Axis::Horizontal);
    }

    #[test]
    fn crossing_vertical_margins_are_rejected() {
        let err = resolve_content_rect(6.0, 9.0, &Margins::new(5.0, 4.5, 0.5, 0.5)).unwrap_err();
        assert_eq!(err.axis, Axis::Vertical);
    }

    #[test]
    fn nan_margin_is_rejected() {
        assert!(resolve_content_rect(6.0, 9.0, &Margins::new(0.5, 0.5, f64::NAN, 0.5)).is_err());
    }

    #[test]
    fn fit_within_preserves_aspect_and_centers() {
        let page = Placement {
            x: 0.0,
            y: 0.0,
            width: 432.0,
            height: 648.0,
        };
        let placed = fit_within(page, 1000.0, 1000.0);
        assert_eq!(placed.width, 432.0);
        assert_eq!(placed.height, 432.0);
        assert_eq!(placed.x, 0.0);
        assert_eq!(placed.y, 108.0);
    }

    #[test]
    fn page_size_presets_parse() {
        assert_eq!("6x9".parse::<PageSize>(), Ok(PageSize::SixByNine));
        assert_eq!("A4".parse::<PageSize>(), Ok(PageSize::A4));
        assert_eq!(
            "5.5 x 8.5".parse::<PageSize>(),
            Ok(PageSize::Custom {
                width: 5.5,
                height: 8.5
            })
        );
        assert!(matches!(
            "tabloid".parse::<PageSize>(),
            Err(ValidationError::UnknownPageSize(_))
        ));
    }

    #[test]
    fn landscape_swaps_dimensions() {
        assert_eq!(
            PageSize::Letter.oriented(Orientation::Landscape),
            (11.0, 8.5)
        );
    }
}
