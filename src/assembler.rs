//! Document assembly: cover, interior pages, back cover, save.
//!
//! Pages are produced strictly in order on one surface. Cancellation is cooperative and
//! checked only between interior pages, so a cancelled run never leaves a half drawn
//! page behind and never writes an output file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::cover::{render_back_cover, render_cover, CoverText};
use crate::error::PressError;
use crate::fonts;
use crate::options::GenerationOptions;
use crate::overlay::{render_overlays, Overlays, PageFrame};
use crate::pattern::render_pattern;
use crate::pdf::{DocumentInfo, PdfSurface};
use crate::surface::DrawingSurface;
use crate::units::to_render_units;

/// Outline entry for the front cover.
pub const COVER_BOOKMARK: &str = "Cover";
/// Outline entry for the back cover.
pub const BACK_COVER_BOOKMARK: &str = "Back Cover";

/// Shared flag used to request that a running assembly stop at the next page boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type ProgressFn = Box<dyn FnMut(u32, u32) + Send>;

/// Assembles documents into an output directory.
pub struct Assembler {
    output_dir: PathBuf,
    cancel: CancelFlag,
    progress: Option<ProgressFn>,
    compress: bool,
}

impl fmt::Debug for Assembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembler")
            .field("output_dir", &self.output_dir)
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .field("compress", &self.compress)
            .finish()
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Creates an assembler that writes into the working directory.
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::new(),
            cancel: CancelFlag::new(),
            progress: None,
            compress: true,
        }
    }

    /// Writes output files into `dir` instead of the working directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Uses `flag` to observe cancellation requests.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// Enables or disables stream compression in the written PDF.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Calls `progress(done, total)` after each interior page.
    pub fn on_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(u32, u32) + Send + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// The cancellation flag observed by this assembler.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Path the document for `options` will be written to.
    pub fn output_path(&self, options: &GenerationOptions) -> PathBuf {
        self.output_dir.join(options.output_file_name())
    }

    /// Validates `options`, renders the whole document to PDF and saves it.
    ///
    /// Returns the path of the written file.
    pub fn assemble(&mut self, options: &GenerationOptions) -> Result<PathBuf, PressError> {
        options.validate()?;
        let path = self.output_path(options);

        let mut surface = PdfSurface::new(
            to_render_units(options.page_width()),
            to_render_units(options.page_height()),
        )
        .with_compression(self.compress)
        .with_info(DocumentInfo {
            title: Some(options.title().to_string()),
            author: options.author().map(str::to_string),
            subject: options.subtitle().map(str::to_string),
        });

        self.render(options, &mut surface, &path)?;
        Ok(path)
    }

    /// Draws the document for `options` on `surface` and saves it to `path`.
    pub fn render<S>(
        &mut self,
        options: &GenerationOptions,
        surface: &mut S,
        path: &Path,
    ) -> Result<(), PressError>
    where
        S: DrawingSurface + ?Sized,
    {
        options.validate()?;
        info!(
            "Generating '{}' ({} pages) to {}",
            options.title(),
            options.total_pages(),
            path.display()
        );

        let frame = PageFrame {
            width: to_render_units(options.page_width()),
            height: to_render_units(options.page_height()),
        };
        let rect = options.content_rect();
        let spacing = to_render_units(options.spacing_for_pattern());
        let overlays = Overlays {
            watermark: options.watermark(),
            header: options.header(),
            footer: options.footer(),
            page_numbers: options.page_numbers(),
        };

        let family = fonts::register_font(surface, options.custom_font(), options.font_name())?;

        surface.new_page()?;
        if options.bookmarks() {
            surface.bookmark(COVER_BOOKMARK)?;
        }
        let cover_text = CoverText {
            title: options.title(),
            subtitle: options.subtitle(),
            author: options.author(),
        };
        render_cover(surface, frame, &cover_text, options.cover_image(), &family)?;

        let total = options.page_count();
        for index in 1..=total {
            if self.cancel.is_cancelled() {
                info!("Generation cancelled after {} of {} pages", index - 1, total);
                return Err(PressError::Cancelled {
                    completed_pages: index - 1,
                });
            }

            surface.new_page()?;
            if options.bookmarks() {
                surface.bookmark(&format!("Page {index}"))?;
            }
            render_pattern(surface, options.pattern(), &rect, spacing)?;
            render_overlays(surface, &overlays, frame, &rect, &family, Some(index))?;
            debug!("Rendered interior page {}/{}", index, total);

            if let Some(progress) = self.progress.as_mut() {
                progress(index, total);
            }
        }

        surface.new_page()?;
        if options.bookmarks() {
            surface.bookmark(BACK_COVER_BOOKMARK)?;
        }
        render_back_cover(surface, frame, &family)?;

        surface
            .save(path)
            .map_err(|source| PressError::Finalization {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Saved {}", path.display());
        Ok(())
    }

    /// Runs [`assemble`](Self::assemble) on a worker thread.
    pub fn spawn(mut self, options: GenerationOptions) -> GenerationHandle {
        let cancel = self.cancel.clone();
        let worker = thread::spawn(move || self.assemble(&options));
        GenerationHandle { cancel, worker }
    }
}

/// A document being generated in the background.
#[derive(Debug)]
pub struct GenerationHandle {
    cancel: CancelFlag,
    worker: JoinHandle<Result<PathBuf, PressError>>,
}

impl GenerationHandle {
    /// Asks the worker to stop at the next page boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the worker has finished.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and returns its result.
    pub fn join(self) -> Result<PathBuf, PressError> {
        self.worker.join().map_err(|_| PressError::WorkerPanicked)?
    }
}

/// Assembles `options` into the working directory.
pub fn assemble(options: &GenerationOptions) -> Result<PathBuf, PressError> {
    Assembler::new().assemble(options)
}

/// Assembles `options` into the working directory on a worker thread.
pub fn spawn(options: GenerationOptions) -> GenerationHandle {
    Assembler::new().spawn(options)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::options::{OptionsBuilder, PatternKind};
    use crate::surface::{DrawCommand, RecordingSurface};

    fn journal(pages: u32) -> GenerationOptions {
        OptionsBuilder::new("Daily Journal")
            .with_page_count(pages)
            .with_pattern(PatternKind::Lined)
            .build()
            .expect("valid options")
    }

    fn record(
        options: &GenerationOptions,
        assembler: &mut Assembler,
    ) -> (RecordingSurface, Result<(), PressError>) {
        let mut surface = RecordingSurface::new();
        let result = assembler.render(options, &mut surface, Path::new("out.pdf"));
        (surface, result)
    }

    #[test]
    fn document_has_cover_interior_and_back_cover() {
        let options = journal(5);
        let (surface, result) = record(&options, &mut Assembler::new());
        result.expect("render");
        assert_eq!(surface.page_count(), 7);
        assert_eq!(
            surface.commands().last(),
            Some(&DrawCommand::Save(PathBuf::from("out.pdf")))
        );
    }

    #[test]
    fn interior_pages_are_numbered_in_order() {
        let options = journal(3);
        let (surface, result) = record(&options, &mut Assembler::new());
        result.expect("render");

        let numbers: Vec<String> = surface.pages()[1..4]
            .iter()
            .filter_map(|page| {
                page.iter().find_map(|command| match command {
                    DrawCommand::CenteredText { text, .. } => Some(text.clone()),
                    _ => None,
                })
            })
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn outline_entries_follow_page_order() {
        let options = journal(2);
        let (surface, result) = record(&options, &mut Assembler::new());
        result.expect("render");
        let bookmarks: Vec<&str> = surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Bookmark(title) => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(bookmarks, vec!["Cover", "Page 1", "Page 2", "Back Cover"]);
    }

    #[test]
    fn outline_can_be_disabled() {
        let options = OptionsBuilder::new("Plain")
            .with_page_count(2)
            .with_bookmarks(false)
            .build()
            .expect("valid");
        let (surface, result) = record(&options, &mut Assembler::new());
        result.expect("render");
        assert!(!surface
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Bookmark(_))));
    }

    #[test]
    fn cancellation_before_start_draws_no_interior_page() {
        let flag = CancelFlag::new();
        flag.cancel();
        let mut assembler = Assembler::new().with_cancel_flag(flag);
        let (surface, result) = record(&journal(4), &mut assembler);

        assert!(matches!(
            result,
            Err(PressError::Cancelled { completed_pages: 0 })
        ));
        assert_eq!(surface.page_count(), 1);
        assert!(!surface
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Save(_))));
    }

    #[test]
    fn cancellation_stops_at_a_page_boundary() {
        let flag = CancelFlag::new();
        let trigger = flag.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        let mut assembler = Assembler::new()
            .with_cancel_flag(flag)
            .on_progress(move |done, total| {
                log.lock().expect("progress log").push((done, total));
                if done == 2 {
                    trigger.cancel();
                }
            });
        let (surface, result) = record(&journal(10), &mut assembler);

        assert!(matches!(
            result,
            Err(PressError::Cancelled { completed_pages: 2 })
        ));
        assert_eq!(surface.page_count(), 3);
        assert_eq!(*seen.lock().expect("progress log"), vec![(1, 10), (2, 10)]);
    }

    #[test]
    fn output_path_joins_directory_and_derived_name() {
        let assembler = Assembler::new().output_dir("/tmp/books");
        assert_eq!(
            assembler.output_path(&journal(1)),
            PathBuf::from("/tmp/books/Daily_Journal.pdf")
        );
    }

    #[test]
    fn assemble_writes_a_pdf_into_the_output_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Assembler::new()
            .output_dir(dir.path())
            .assemble(&journal(2))
            .expect("assemble");
        assert_eq!(path, dir.path().join("Daily_Journal.pdf"));
        let document = lopdf::Document::load(&path).expect("valid pdf");
        assert_eq!(document.get_pages().len(), 4);
    }

    #[test]
    fn unwritable_output_is_a_finalization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Assembler::new()
            .output_dir(dir.path().join("missing"))
            .assemble(&journal(1))
            .unwrap_err();
        assert!(matches!(err, PressError::Finalization { .. }));
    }

    #[test]
    fn cancelled_background_run_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let flag = CancelFlag::new();
        flag.cancel();
        let handle = Assembler::new()
            .output_dir(dir.path())
            .with_cancel_flag(flag)
            .spawn(journal(3));
        handle.cancel();

        assert!(matches!(handle.join(), Err(PressError::Cancelled { .. })));
        assert!(!dir.path().join("Daily_Journal.pdf").exists());
    }

    #[test]
    fn background_run_returns_the_output_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handle = Assembler::new().output_dir(dir.path()).spawn(journal(2));
        let path = handle.join().expect("background assemble");
        assert!(path.is_file());
    }
}
