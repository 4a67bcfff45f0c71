//! Interior page patterns: lined, dotted, grid and blank.
//!
//! Rendering is a pure function of the pattern kind, the content rectangle and the
//! spacing; identical inputs always produce the identical command sequence. Every
//! coordinate is computed from an integer step index rather than by accumulating the
//! spacing, so long pages do not drift.

use crate::error::SurfaceError;
use crate::geometry::ContentRect;
use crate::options::PatternKind;
use crate::surface::{DrawingSurface, Rgb};

/// Colour of lined and grid rules.
pub const RULE_COLOR: Rgb = Rgb::gray(0.6);
/// Stroke width of lined and grid rules, in render units.
pub const RULE_WIDTH: f64 = 0.5;
/// Radius of a dot, in render units.
pub const DOT_RADIUS: f64 = 1.0;
/// Fill colour of dots.
pub const DOT_COLOR: Rgb = Rgb::gray(0.5);

// Absorbs floating point noise when the extent is an exact multiple of the spacing.
const EPSILON: f64 = 1e-9;

/// Number of rules that fit into `extent` at `spacing`: `floor(extent / spacing)`.
pub fn rule_count(extent: f64, spacing: f64) -> u32 {
    if !(spacing > 0.0) || !(extent > 0.0) {
        return 0;
    }
    (extent / spacing + EPSILON).floor() as u32
}

/// Draws the interior pattern for one page. `spacing` is in render units.
pub fn render_pattern<S>(
    surface: &mut S,
    kind: PatternKind,
    rect: &ContentRect,
    spacing: f64,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    match kind {
        PatternKind::Lined => {
            set_rule_pen(surface)?;
            draw_horizontal_rules(surface, rect, spacing)
        }
        PatternKind::Dotted => draw_dots(surface, rect, spacing),
        PatternKind::Grid => {
            set_rule_pen(surface)?;
            draw_horizontal_rules(surface, rect, spacing)?;
            draw_vertical_rules(surface, rect, spacing)
        }
        PatternKind::Blank => Ok(()),
    }
}

fn set_rule_pen<S>(surface: &mut S) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    surface.set_stroke_color(RULE_COLOR)?;
    surface.set_line_width(RULE_WIDTH)
}

/// Rules at `top - k * spacing` for `k = 1..=floor(height / spacing)`, spanning the full
/// content width.
fn draw_horizontal_rules<S>(
    surface: &mut S,
    rect: &ContentRect,
    spacing: f64,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    for step in 1..=rule_count(rect.height(), spacing) {
        let y = rect.top - f64::from(step) * spacing;
        surface.draw_line(rect.left, y, rect.right, y)?;
    }
    Ok(())
}

/// Rules at `left + k * spacing` for `k = 1..=floor(width / spacing)`, spanning the full
/// content height.
fn draw_vertical_rules<S>(
    surface: &mut S,
    rect: &ContentRect,
    spacing: f64,
) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    for step in 1..=rule_count(rect.width(), spacing) {
        let x = rect.left + f64::from(step) * spacing;
        surface.draw_line(x, rect.bottom, x, rect.top)?;
    }
    Ok(())
}

/// Dot centres at `offset + (k + 1/2) * spacing`, kept strictly inside the rectangle.
fn dot_offsets(start: f64, end: f64, spacing: f64) -> impl Iterator<Item = f64> {
    let valid = spacing > 0.0;
    (0u32..)
        .map(move |step| start + (f64::from(step) + 0.5) * spacing)
        .take_while(move |position| valid && *position < end)
}

fn draw_dots<S>(surface: &mut S, rect: &ContentRect, spacing: f64) -> Result<(), SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    surface.set_fill_color(DOT_COLOR)?;
    for y in dot_offsets(rect.bottom, rect.top, spacing) {
        for x in dot_offsets(rect.left, rect.right, spacing) {
            surface.draw_circle(x, y, DOT_RADIUS, true)?;
        }
    }
    Ok(())
}
