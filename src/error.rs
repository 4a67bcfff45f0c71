//! Error types shared across the layout engine.
//!
//! Validation problems surface before any drawing happens, resource problems are
//! downgraded to warnings by the renderers, and everything that goes wrong while
//! writing the finished artifact is reported as a finalization failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which pair of margins collapsed the content rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Left and right margins.
    Horizontal,
    /// Top and bottom margins.
    Vertical,
}

/// The margins leave no usable drawing area on the page.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("margins leave no content area along the {axis:?} axis (near edge {near:.2}pt, far edge {far:.2}pt)")]
pub struct InvalidMarginsError {
    /// Axis on which the rectangle is degenerate.
    pub axis: Axis,
    /// Resolved left (or bottom) edge in points.
    pub near: f64,
    /// Resolved right (or top) edge in points.
    pub far: f64,
}

/// An interior pattern name that the pattern renderer does not know.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsupported pattern kind `{0}` (expected lined, dotted, grid or blank)")]
pub struct UnsupportedPatternKindError(pub String);

/// Options that cannot produce a document. Raised before any output is opened.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    /// No title was supplied, or it only contains whitespace.
    #[error("a title is required")]
    MissingTitle,

    /// The interior page count must be at least one.
    #[error("page count must be positive")]
    NonPositivePageCount,

    /// A page dimension is zero, negative or not a number.
    #[error("{field} must be a positive number of inches, got {value}")]
    NonPositiveDimension {
        /// Name of the offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// A margin is negative or not a number.
    #[error("{side} margin must be zero or more inches, got {value}")]
    NegativeMargin {
        /// Which margin.
        side: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// A pattern spacing is zero, negative or not a number.
    #[error("{field} must be a positive number of inches, got {value}")]
    NonPositiveSpacing {
        /// Name of the offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// Margins collapse the content rectangle.
    #[error(transparent)]
    InvalidMargins(#[from] InvalidMarginsError),

    /// Pattern kind is not one of the supported kinds.
    #[error(transparent)]
    UnsupportedPatternKind(#[from] UnsupportedPatternKindError),

    /// Page size preset name is unknown.
    #[error("unknown page size `{0}` (expected 6x9, 8.5x11, A4 or WIDTHxHEIGHT)")]
    UnknownPageSize(String),

    /// Orientation name is unknown.
    #[error("unknown orientation `{0}` (expected portrait or landscape)")]
    UnknownOrientation(String),

    /// Template name is unknown.
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),
}

/// Failure to load an optional external resource.
///
/// The engine never aborts on these; renderers log them and substitute a default.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Resource path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The cover image could not be decoded.
    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        /// Resource path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The font file is not a usable TrueType/OpenType font.
    #[error("failed to parse font {}: {reason}", path.display())]
    Font {
        /// Resource path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// None of the font search directories contained the requested file.
    #[error("font {} not found (searched: {searched})", path.display())]
    FontNotFound {
        /// Requested path.
        path: PathBuf,
        /// Human readable list of searched locations.
        searched: String,
    },
}

/// Errors raised by a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A drawing call was issued before the first page was opened.
    #[error("no page is open; call new_page first")]
    NoOpenPage,

    /// Text was requested in a font that was never registered.
    #[error("font `{0}` is not registered with the surface")]
    UnknownFont(String),

    /// Text was requested before any font was selected.
    #[error("no font selected")]
    NoFontSelected,

    /// `pop_transform` without a matching `push_transform`.
    #[error("transform stack underflow")]
    TransformUnderflow,

    /// The document was already saved; no further drawing is accepted.
    #[error("document already finalized")]
    Finalized,

    /// The document outline could not be attached.
    #[error("outline failed: {0}")]
    Outline(#[from] crate::bookmarks::BookmarkError),

    /// The PDF object graph could not be serialized.
    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Top-level error returned by document assembly.
#[derive(Debug, Error)]
pub enum PressError {
    /// Options were rejected; nothing was written.
    #[error("invalid options: {0}")]
    Validation(#[from] ValidationError),

    /// A drawing operation failed mid-document.
    #[error("drawing failed: {0}")]
    Surface(#[from] SurfaceError),

    /// The finished document could not be saved. Any partial output is invalid.
    #[error("failed to write {}", path.display())]
    Finalization {
        /// Target path of the artifact.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: SurfaceError,
    },

    /// Generation stopped at a page boundary because cancellation was requested.
    #[error("generation cancelled after {completed_pages} interior pages")]
    Cancelled {
        /// Interior pages sealed before the stop.
        completed_pages: u32,
    },

    /// The background worker terminated abnormally.
    #[error("generation worker panicked")]
    WorkerPanicked,
}

/// Errors raised while reading or writing project files.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The project file could not be read or written.
    #[error("project file {}: {source}", path.display())]
    Io {
        /// Project path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The project file is not valid JSON for an options record.
    #[error("project file {} is malformed: {source}", path.display())]
    Json {
        /// Project path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}
