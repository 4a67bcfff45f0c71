//! Watermark, header, footer and page number drawn on top of an interior pattern.

use crate::error::SurfaceError;
use crate::fonts::FontFamily;
use crate::geometry::ContentRect;
use crate::surface::{with_saved_state, DrawingSurface, Rgb};

/// Watermark font size in points.
pub const WATERMARK_SIZE: f64 = 50.0;
/// Watermark rotation, counter-clockwise.
pub const WATERMARK_ANGLE: f64 = 45.0;
/// Watermark opacity.
pub const WATERMARK_OPACITY: f64 = 0.1;
/// Watermark fill.
pub const WATERMARK_COLOR: Rgb = Rgb::gray(0.75);
/// Header and footer font size.
pub const RUNNING_TEXT_SIZE: f64 = 12.0;
/// Page number font size.
pub const PAGE_NUMBER_SIZE: f64 = 10.0;
/// Gap between the top margin line and the header baseline.
pub const HEADER_OFFSET: f64 = 10.0;
/// Gap between the bottom margin line and the footer baseline.
pub const FOOTER_OFFSET: f64 = 15.0;
/// Page number baseline, measured from the physical bottom edge.
pub const PAGE_NUMBER_BASELINE: f64 = 20.0;

/// Text overlays shared by every interior page of a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlays<'a> {
    /// Diagonal watermark across the whole page.
    pub watermark: Option<&'a str>,
    /// Left-aligned text above the content area.
    pub header: Option<&'a str>,
    /// Left-aligned text below the content area.
    pub footer: Option<&'a str>,
    /// Whether to print page numbers.
    pub page_numbers: bool,
}

/// Physical page size in render units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageFrame {
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
}

/// Draws the overlays for one interior page. `page_index` is 1-based.
pub fn render_overlays<S>(
    surface: &mut S,
    overlays: &Overlays<'_>,
    frame: PageFrame,
    rect: &ContentRect,
    fonts: &FontFamily,
    page_index: Option<u32>,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    if let Some(text) = overlays.watermark {
        draw_watermark(surface, frame, fonts, text)?;
    }

    if overlays.header.is_some() || overlays.footer.is_some() {
        surface.set_fill_color(Rgb::BLACK)?;
        surface.set_font(&fonts.regular, RUNNING_TEXT_SIZE)?;
        if let Some(text) = overlays.header {
            surface.draw_text(rect.left, rect.top + HEADER_OFFSET, text)?;
        }
        if let Some(text) = overlays.footer {
            surface.draw_text(rect.left, rect.bottom - FOOTER_OFFSET, text)?;
        }
    }

    if let (true, Some(index)) = (overlays.page_numbers, page_index) {
        surface.set_fill_color(Rgb::BLACK)?;
        surface.set_font(&fonts.regular, PAGE_NUMBER_SIZE)?;
        surface.draw_centered_text(frame.width / 2.0, PAGE_NUMBER_BASELINE, &index.to_string())?;
    }

    Ok(())
}

fn draw_watermark<S>(
    surface: &mut S,
    frame: PageFrame,
    fonts: &FontFamily,
    text: &str,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    with_saved_state(surface, |surface| {
        surface.translate(frame.width / 2.0, frame.height / 2.0)?;
        surface.rotate(WATERMARK_ANGLE)?;
        surface.set_opacity(WATERMARK_OPACITY)?;
        surface.set_fill_color(WATERMARK_COLOR)?;
        surface.set_font(&fonts.regular, WATERMARK_SIZE)?;
        surface.draw_centered_text(0.0, 0.0, text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{resolve_content_rect, Margins};
    use crate::surface::{DrawCommand, RecordingSurface};

    const FRAME: PageFrame = PageFrame {
        width: 432.0,
        height: 648.0,
    };

    fn rect() -> ContentRect {
        resolve_content_rect(6.0, 9.0, &Margins::uniform(0.5)).expect("valid")
    }

    fn render(overlays: &Overlays<'_>, page: Option<u32>) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        render_overlays(
            &mut surface,
            overlays,
            FRAME,
            &rect(),
            &FontFamily::builtin(),
            page,
        )
        .expect("render");
        surface
    }

    #[test]
    fn nothing_configured_draws_nothing() {
        let surface = render(&Overlays::default(), Some(3));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn watermark_is_rotated_translucent_and_balanced() {
        let overlays = Overlays {
            watermark: Some("SAMPLE"),
            ..Overlays::default()
        };
        let surface = render(&overlays, None);
        let commands = surface.commands();

        let rotations: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rotate(angle) => Some(*angle),
                _ => None,
            })
            .collect();
        assert_eq!(rotations, vec![45.0]);
        assert!(commands.contains(&DrawCommand::SetOpacity(0.1)));
        assert!(commands.contains(&DrawCommand::Translate(216.0, 324.0)));
        assert_eq!(
            commands.iter().filter(|c| c.is_mark()).count(),
            1,
            "exactly one watermark mark"
        );
        assert_eq!(commands.first(), Some(&DrawCommand::PushTransform));
        assert_eq!(commands.last(), Some(&DrawCommand::PopTransform));
    }

    #[test]
    fn header_and_footer_hug_the_margin_lines() {
        let overlays = Overlays {
            header: Some("Week of"),
            footer: Some("Notes"),
            ..Overlays::default()
        };
        let surface = render(&overlays, None);
        let texts: Vec<_> = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .cloned()
            .collect();
        assert_eq!(
            texts,
            vec![
                DrawCommand::Text {
                    x: 36.0,
                    y: 622.0,
                    text: "Week of".into()
                },
                DrawCommand::Text {
                    x: 36.0,
                    y: 21.0,
                    text: "Notes".into()
                },
            ]
        );
        assert!(surface.commands().contains(&DrawCommand::SetFont {
            name: "Helvetica".into(),
            size: RUNNING_TEXT_SIZE
        }));
    }

    #[test]
    fn page_number_is_centered_near_the_bottom_edge() {
        let overlays = Overlays {
            page_numbers: true,
            ..Overlays::default()
        };
        let surface = render(&overlays, Some(7));
        assert!(surface.commands().contains(&DrawCommand::CenteredText {
            x: 216.0,
            y: PAGE_NUMBER_BASELINE,
            text: "7".into()
        }));
        assert!(surface.commands().contains(&DrawCommand::SetFont {
            name: "Helvetica".into(),
            size: PAGE_NUMBER_SIZE
        }));
    }

    #[test]
    fn page_number_needs_an_index() {
        let overlays = Overlays {
            page_numbers: true,
            ..Overlays::default()
        };
        assert!(render(&overlays, None).commands().is_empty());
    }
}
