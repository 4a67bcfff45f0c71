//! The drawing-surface contract used by every renderer.
//!
//! Renderers never talk to a PDF library directly; they issue an ordered stream of pen
//! and shape commands against a [`DrawingSurface`]. The PDF backend lives in
//! [`crate::pdf`]; [`RecordingSurface`] keeps the commands in memory, which is what the
//! tests (and anything that wants to inspect a layout without writing a file) use.
//!
//! Coordinates are render units with the origin at the bottom-left corner of the page.

use std::path::{Path, PathBuf};

use crate::error::SurfaceError;
use crate::resources::{FontResource, ImageResource};

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::gray(0.0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::gray(1.0);

    /// Creates a colour from its components.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Creates a neutral gray of the given lightness.
    pub const fn gray(level: f64) -> Self {
        Self::new(level, level, level)
    }
}

/// The surface contract.
///
/// All operations apply to the page opened by the most recent [`new_page`](Self::new_page)
/// call. Opening a page seals the previous one; [`save`](Self::save) seals the last page and
/// finalizes the document.
pub trait DrawingSurface {
    /// Seals the current page (if any) and opens a new, empty page.
    fn new_page(&mut self) -> Result<(), SurfaceError>;

    /// Sets the colour used for filled shapes and text.
    fn set_fill_color(&mut self, color: Rgb) -> Result<(), SurfaceError>;

    /// Sets the colour used for stroked lines.
    fn set_stroke_color(&mut self, color: Rgb) -> Result<(), SurfaceError>;

    /// Sets the stroke width in render units.
    fn set_line_width(&mut self, width: f64) -> Result<(), SurfaceError>;

    /// Strokes a straight line.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), SurfaceError>;

    /// Draws an axis-aligned rectangle, filled (no outline) or stroked.
    fn draw_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        filled: bool,
    ) -> Result<(), SurfaceError>;

    /// Draws a circle, filled (no outline) or stroked.
    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, filled: bool)
        -> Result<(), SurfaceError>;

    /// Draws an image into the given box, optionally keeping its aspect ratio.
    fn draw_image(
        &mut self,
        image: &ImageResource,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        preserve_aspect: bool,
    ) -> Result<(), SurfaceError>;

    /// Makes a loaded font available under a logical name.
    fn register_font(&mut self, name: &str, font: &FontResource) -> Result<(), SurfaceError>;

    /// Selects the font used by subsequent text calls.
    fn set_font(&mut self, name: &str, size: f64) -> Result<(), SurfaceError>;

    /// Draws text with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), SurfaceError>;

    /// Draws text horizontally centered on `x`, baseline at `y`.
    fn draw_centered_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), SurfaceError>;

    /// Saves the pen state and transform.
    fn push_transform(&mut self) -> Result<(), SurfaceError>;

    /// Rotates the coordinate system counter-clockwise by `degrees`.
    fn rotate(&mut self, degrees: f64) -> Result<(), SurfaceError>;

    /// Moves the origin.
    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), SurfaceError>;

    /// Restores the state saved by the matching [`push_transform`](Self::push_transform).
    fn pop_transform(&mut self) -> Result<(), SurfaceError>;

    /// Sets fill and stroke opacity (`1.0` is opaque).
    fn set_opacity(&mut self, alpha: f64) -> Result<(), SurfaceError>;

    /// Adds an outline entry pointing at the current page. Surfaces without an outline
    /// ignore it.
    fn bookmark(&mut self, _title: &str) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Seals the last page and writes the finished document to `path`.
    fn save(&mut self, path: &Path) -> Result<(), SurfaceError>;
}

/// Runs `draw` between a push and a pop so transform and pen changes cannot leak.
pub fn with_saved_state<S, F>(surface: &mut S, draw: F) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
    F: FnOnce(&mut S) -> Result<(), SurfaceError>,
{
    surface.push_transform()?;
    let result = draw(surface);
    let popped = surface.pop_transform();
    result.and(popped)
}

/// A single recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`DrawingSurface::new_page`].
    NewPage,
    /// [`DrawingSurface::set_fill_color`].
    SetFillColor(Rgb),
    /// [`DrawingSurface::set_stroke_color`].
    SetStrokeColor(Rgb),
    /// [`DrawingSurface::set_line_width`].
    SetLineWidth(f64),
    /// [`DrawingSurface::draw_line`].
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// [`DrawingSurface::draw_rect`].
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        filled: bool,
    },
    /// [`DrawingSurface::draw_circle`].
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        filled: bool,
    },
    /// [`DrawingSurface::draw_image`], identified by the image's source path.
    Image {
        source: PathBuf,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        preserve_aspect: bool,
    },
    /// [`DrawingSurface::register_font`].
    RegisterFont {
        name: String,
    },
    /// [`DrawingSurface::set_font`].
    SetFont {
        name: String,
        size: f64,
    },
    /// [`DrawingSurface::draw_text`].
    Text {
        x: f64,
        y: f64,
        text: String,
    },
    /// [`DrawingSurface::draw_centered_text`].
    CenteredText {
        x: f64,
        y: f64,
        text: String,
    },
    /// [`DrawingSurface::push_transform`].
    PushTransform,
    /// [`DrawingSurface::rotate`], in degrees.
    Rotate(f64),
    /// [`DrawingSurface::translate`].
    Translate(f64, f64),
    /// [`DrawingSurface::pop_transform`].
    PopTransform,
    /// [`DrawingSurface::set_opacity`].
    SetOpacity(f64),
    /// [`DrawingSurface::bookmark`].
    Bookmark(String),
    /// [`DrawingSurface::save`].
    Save(PathBuf),
}

impl DrawCommand {
    /// Whether the command puts marks on the page (as opposed to changing pen state).
    pub fn is_mark(&self) -> bool {
        matches!(
            self,
            Self::Line { .. }
                | Self::Rect { .. }
                | Self::Circle { .. }
                | Self::Image { .. }
                | Self::Text { .. }
                | Self::CenteredText { .. }
        )
    }
}

/// A surface that records every call instead of rendering it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    fonts: Vec<String>,
    depth: usize,
}

impl RecordingSurface {
    /// Creates an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command issued so far, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Names of the fonts registered so far.
    pub fn registered_fonts(&self) -> &[String] {
        &self.fonts
    }

    /// Number of pages opened.
    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::NewPage))
            .count()
    }

    /// Commands grouped per page, without the `NewPage` markers. Commands issued before the
    /// first page (such as font registration) are not included.
    pub fn pages(&self) -> Vec<&[DrawCommand]> {
        let mut pages = Vec::new();
        let mut start = None;
        for (index, command) in self.commands.iter().enumerate() {
            match command {
                DrawCommand::NewPage => {
                    if let Some(begin) = start {
                        pages.push(&self.commands[begin..index]);
                    }
                    start = Some(index + 1);
                }
                DrawCommand::Save(_) => {
                    if let Some(begin) = start.take() {
                        pages.push(&self.commands[begin..index]);
                    }
                }
                _ => {}
            }
        }
        if let Some(begin) = start {
            pages.push(&self.commands[begin..]);
        }
        pages
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), SurfaceError> {
        self.commands.push(command);
        Ok(())
    }
}

impl DrawingSurface for RecordingSurface {
    fn new_page(&mut self) -> Result<(), SurfaceError> {
        self.record(DrawCommand::NewPage)
    }

    fn set_fill_color(&mut self, color: Rgb) -> Result<(), SurfaceError> {
        self.record(DrawCommand::SetFillColor(color))
    }

    fn set_stroke_color(&mut self, color: Rgb) -> Result<(), SurfaceError> {
        self.record(DrawCommand::SetStrokeColor(color))
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), SurfaceError> {
        self.record(DrawCommand::SetLineWidth(width))
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Line { x1, y1, x2, y2 })
    }

    fn draw_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        filled: bool,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            filled,
        })
    }

    fn draw_circle(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        filled: bool,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Circle {
            cx,
            cy,
            radius,
            filled,
        })
    }

    fn draw_image(
        &mut self,
        image: &ImageResource,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        preserve_aspect: bool,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Image {
            source: image.source().to_path_buf(),
            x,
            y,
            width,
            height,
            preserve_aspect,
        })
    }

    fn register_font(&mut self, name: &str, _font: &FontResource) -> Result<(), SurfaceError> {
        self.fonts.push(name.to_string());
        self.record(DrawCommand::RegisterFont {
            name: name.to_string(),
        })
    }

    fn set_font(&mut self, name: &str, size: f64) -> Result<(), SurfaceError> {
        self.record(DrawCommand::SetFont {
            name: name.to_string(),
            size,
        })
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        })
    }

    fn draw_centered_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), SurfaceError> {
        self.record(DrawCommand::CenteredText {
            x,
            y,
            text: text.to_string(),
        })
    }

    fn push_transform(&mut self) -> Result<(), SurfaceError> {
        self.depth += 1;
        self.record(DrawCommand::PushTransform)
    }

    fn rotate(&mut self, degrees: f64) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Rotate(degrees))
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Translate(dx, dy))
    }

    fn pop_transform(&mut self) -> Result<(), SurfaceError> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or(SurfaceError::TransformUnderflow)?;
        self.record(DrawCommand::PopTransform)
    }

    fn set_opacity(&mut self, alpha: f64) -> Result<(), SurfaceError> {
        self.record(DrawCommand::SetOpacity(alpha))
    }

    fn bookmark(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Bookmark(title.to_string()))
    }

    fn save(&mut self, path: &Path) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Save(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_split_on_new_page() {
        let mut surface = RecordingSurface::new();
        surface.new_page().unwrap();
        surface.draw_line(0.0, 0.0, 1.0, 1.0).unwrap();
        surface.new_page().unwrap();
        surface.draw_text(1.0, 2.0, "hi").unwrap();
        surface.draw_text(1.0, 3.0, "there").unwrap();
        surface.save(Path::new("out.pdf")).unwrap();

        let pages = surface.pages();
        assert_eq!(surface.page_count(), 2);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 1);
        assert_eq!(pages[1].len(), 2);
    }

    #[test]
    fn unbalanced_pop_is_an_error() {
        let mut surface = RecordingSurface::new();
        assert!(matches!(
            surface.pop_transform(),
            Err(SurfaceError::TransformUnderflow)
        ));
    }

    #[test]
    fn saved_state_is_restored_even_when_drawing_fails() {
        let mut surface = RecordingSurface::new();
        let result = with_saved_state(&mut surface, |s| {
            s.rotate(45.0)?;
            Err(SurfaceError::NoOpenPage)
        });
        assert!(result.is_err());
        assert_eq!(
            surface.commands().last(),
            Some(&DrawCommand::PopTransform)
        );
    }
}
