//! Front and back cover pages.

use std::path::Path;

use log::warn;

use crate::error::SurfaceError;
use crate::fonts::FontFamily;
use crate::overlay::PageFrame;
use crate::resources;
use crate::surface::{DrawingSurface, Rgb};

/// Title font size on the front cover.
pub const TITLE_SIZE: f64 = 36.0;
/// Subtitle font size.
pub const SUBTITLE_SIZE: f64 = 24.0;
/// Author font size.
pub const AUTHOR_SIZE: f64 = 18.0;
/// Distance from the top edge to the title baseline.
pub const TITLE_TOP_OFFSET: f64 = 144.0;
/// Extra space between stacked cover lines, added to the previous line's font size.
pub const LINE_GAP: f64 = 20.0;
/// Text on the back cover.
pub const BACK_COVER_TEXT: &str = "The End";
/// Back cover font size.
pub const BACK_COVER_SIZE: f64 = 24.0;

/// Text shown on the front cover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverText<'a> {
    /// Book title.
    pub title: &'a str,
    /// Optional subtitle.
    pub subtitle: Option<&'a str>,
    /// Optional author, printed as "By ...".
    pub author: Option<&'a str>,
}

/// One positioned line of the cover text block.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverLine {
    /// Text to draw.
    pub text: String,
    /// Which font of the family to use.
    pub role: FontRole,
    /// Font size.
    pub size: f64,
    /// Baseline.
    pub y: f64,
}

/// Font role inside a [`FontFamily`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontRole {
    /// Subtitle.
    Regular,
    /// Title.
    Bold,
    /// Author line.
    Italic,
}

impl FontRole {
    fn pick(self, fonts: &FontFamily) -> &str {
        match self {
            Self::Regular => &fonts.regular,
            Self::Bold => &fonts.bold,
            Self::Italic => &fonts.italic,
        }
    }
}

/// Stacks title, subtitle and author from the top of the page downwards. Each baseline
/// sits below the previous one by that line's font size plus [`LINE_GAP`].
pub fn layout_cover_text(text: &CoverText<'_>, page_height: f64) -> Vec<CoverLine> {
    let mut lines = vec![CoverLine {
        text: text.title.to_string(),
        role: FontRole::Bold,
        size: TITLE_SIZE,
        y: page_height - TITLE_TOP_OFFSET,
    }];

    let followers = [
        text.subtitle
            .map(|subtitle| (subtitle.to_string(), FontRole::Regular, SUBTITLE_SIZE)),
        text.author
            .map(|author| (format!("By {author}"), FontRole::Italic, AUTHOR_SIZE)),
    ];

    for (text, role, size) in followers.into_iter().flatten() {
        let previous = &lines[lines.len() - 1];
        let y = previous.y - (previous.size + LINE_GAP);
        lines.push(CoverLine {
            text,
            role,
            size,
            y,
        });
    }

    lines
}

/// Draws the front cover on the current page.
///
/// A cover image that cannot be loaded is logged and replaced by a white background.
pub fn render_cover<S>(
    surface: &mut S,
    frame: PageFrame,
    text: &CoverText<'_>,
    cover_image: Option<&Path>,
    fonts: &FontFamily,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    let image = cover_image.and_then(|path| match resources::load_image(path) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("Cover image unavailable ({err}); using a plain background.");
            None
        }
    });

    match image {
        Some(image) => surface.draw_image(&image, 0.0, 0.0, frame.width, frame.height, true)?,
        None => fill_background(surface, frame)?,
    }

    surface.set_fill_color(Rgb::BLACK)?;
    for line in layout_cover_text(text, frame.height) {
        surface.set_font(line.role.pick(fonts), line.size)?;
        surface.draw_centered_text(frame.width / 2.0, line.y, &line.text)?;
    }
    Ok(())
}

/// Draws the back cover on the current page.
pub fn render_back_cover<S>(
    surface: &mut S,
    frame: PageFrame,
    fonts: &FontFamily,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    fill_background(surface, frame)?;
    surface.set_fill_color(Rgb::BLACK)?;
    surface.set_font(&fonts.bold, BACK_COVER_SIZE)?;
    surface.draw_centered_text(frame.width / 2.0, frame.height / 2.0, BACK_COVER_TEXT)
}

fn fill_background<S>(surface: &mut S, frame: PageFrame) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    surface.set_fill_color(Rgb::WHITE)?;
    surface.draw_rect(0.0, 0.0, frame.width, frame.height, true)
}
