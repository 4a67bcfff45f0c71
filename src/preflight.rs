//! Print-readiness checks run before generation.
//!
//! Preflight never blocks generation; it only reports what a print service is likely to
//! reject.

use std::fmt;

use log::debug;

use crate::fonts;
use crate::options::GenerationOptions;
use crate::resources;

/// Minimum distance from the trim edge, in inches, that print services require.
pub const BLEED: f64 = 0.125;
/// Minimum effective cover resolution.
pub const MIN_COVER_DPI: f64 = 300.0;

/// Outcome of a single check.
#[derive(Clone, Debug, PartialEq)]
pub struct PreflightCheck {
    /// Short check name.
    pub name: &'static str,
    /// Whether the check passed.
    pub passed: bool,
    /// What was found.
    pub detail: String,
}

/// Every check run against one set of options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreflightReport {
    checks: Vec<PreflightCheck>,
}

impl PreflightReport {
    /// Individual results in the order they ran.
    pub fn checks(&self) -> &[PreflightCheck] {
        &self.checks
    }

    /// Number of passing checks.
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|check| check.passed).count()
    }

    /// Whether every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    fn push(&mut self, name: &'static str, passed: bool, detail: String) {
        debug!("Preflight {name}: {} ({detail})", if passed { "pass" } else { "fail" });
        self.checks.push(PreflightCheck {
            name,
            passed,
            detail,
        });
    }
}

impl fmt::Display for PreflightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            let mark = if check.passed { "PASS" } else { "FAIL" };
            writeln!(f, "[{mark}] {}: {}", check.name, check.detail)?;
        }
        write!(
            f,
            "Preflight Checks: {}/{} Passed",
            self.passed(),
            self.checks.len()
        )
    }
}

/// Runs every check against `options`.
pub fn run_preflight(options: &GenerationOptions) -> PreflightReport {
    let mut report = PreflightReport::default();
    check_bleed(options, &mut report);
    check_cover_resolution(options, &mut report);
    check_fonts(options, &mut report);
    report
}

fn check_bleed(options: &GenerationOptions, report: &mut PreflightReport) {
    let narrow: Vec<String> = options
        .margins()
        .sides()
        .into_iter()
        .filter(|(_, value)| *value < BLEED)
        .map(|(side, value)| format!("{side} {value}in"))
        .collect();

    if narrow.is_empty() {
        report.push("Bleed area", true, format!("all margins at least {BLEED}in"));
    } else {
        report.push(
            "Bleed area",
            false,
            format!("margins inside the {BLEED}in bleed: {}", narrow.join(", ")),
        );
    }
}

fn check_cover_resolution(options: &GenerationOptions, report: &mut PreflightReport) {
    let Some(path) = options.cover_image() else {
        report.push("Cover resolution", true, "no cover image".to_string());
        return;
    };

    match resources::load_image(path) {
        Ok(image) => {
            let dpi = image.effective_dpi(options.page_width(), options.page_height());
            report.push(
                "Cover resolution",
                dpi >= MIN_COVER_DPI,
                format!("{dpi:.0} DPI at trim size (minimum {MIN_COVER_DPI:.0})"),
            );
        }
        Err(err) => report.push("Cover resolution", false, err.to_string()),
    }
}

fn check_fonts(options: &GenerationOptions, report: &mut PreflightReport) {
    let Some(path) = options.custom_font() else {
        report.push(
            "Embedded fonts",
            true,
            format!("built-in {} family", fonts::DEFAULT_FONT_FAMILY_NAME),
        );
        return;
    };

    match fonts::load_custom_font(path) {
        Ok(font) => report.push(
            "Embedded fonts",
            true,
            format!("{} can be embedded", font.source().display()),
        ),
        Err(err) => report.push("Embedded fonts", false, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionsBuilder;

    #[test]
    fn default_options_pass_every_check() {
        let options = OptionsBuilder::new("Notes").build().expect("valid");
        let report = run_preflight(&options);
        assert_eq!(report.checks().len(), 3);
        assert!(report.all_passed());
        assert!(report
            .to_string()
            .ends_with("Preflight Checks: 3/3 Passed"));
    }

    #[test]
    fn thin_margin_fails_the_bleed_check() {
        let options = OptionsBuilder::new("Notes")
            .with_margin_left(0.1)
            .build()
            .expect("valid");
        let report = run_preflight(&options);
        let bleed = &report.checks()[0];
        assert!(!bleed.passed);
        assert!(bleed.detail.contains("left"));
        assert_eq!(report.passed(), 2);
    }

    #[test]
    fn low_resolution_cover_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cover.png");
        image::RgbImage::from_pixel(600, 900, image::Rgb([0, 0, 0]))
            .save(&path)
            .expect("encode");

        let options = OptionsBuilder::new("Notes")
            .with_cover_image(&path)
            .build()
            .expect("valid");
        let check = run_preflight(&options).checks()[1].clone();
        assert!(!check.passed);
        assert!(check.detail.starts_with("100 DPI"));
    }

    #[test]
    fn unreadable_font_fails_without_panicking() {
        let options = OptionsBuilder::new("Notes")
            .with_custom_font("/__journal_press_missing__/Hand.ttf")
            .build()
            .expect("valid");
        assert!(!run_preflight(&options).checks()[2].passed);
    }
}
