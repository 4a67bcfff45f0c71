//! Core entry point for the journal_press crate.
//!
//! Generates print-ready low-content books (journals, notebooks, planners) as PDF: a
//! cover, `N` interior pages carrying a lined, dotted, grid or blank pattern with
//! optional overlays, and a back cover.
//!
//! ```no_run
//! use journal_press::{assemble, OptionsBuilder, PatternKind};
//!
//! let options = OptionsBuilder::new("Daily Journal")
//!     .with_page_count(5)
//!     .with_pattern(PatternKind::Lined)
//!     .build()?;
//! let path = assemble(&options)?;
//! println!("wrote {}", path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod bookmarks;
pub mod cover;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod options;
pub mod overlay;
pub mod pattern;
pub mod pdf;
pub mod preflight;
pub mod project;
pub mod resources;
pub mod surface;
pub mod templates;
pub mod units;

pub use assembler::{assemble, spawn, Assembler, CancelFlag, GenerationHandle};
pub use error::{PressError, ValidationError};
pub use geometry::{Margins, Orientation, PageSize};
pub use options::{GenerationOptions, OptionsBuilder, PatternKind};
pub use pdf::PdfSurface;
pub use surface::{DrawingSurface, RecordingSurface};
