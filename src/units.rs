//! Conversions between physical measurements and PDF points.

/// Number of render units (PDF points) in one inch.
pub const POINTS_PER_INCH: f64 = 72.0;

const MM_PER_INCH: f64 = 25.4;

/// Converts a length in inches to render units.
pub fn to_render_units(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// Converts a length in millimetres to inches.
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}
