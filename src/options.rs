//! The options record that drives document generation.
//!
//! [`OptionsBuilder`] is the mutable, partially filled configuration collected from
//! templates, project files and command line flags. Every field is optional so builders
//! can be layered on top of each other with [`OptionsBuilder::merged_over`]. Calling
//! [`OptionsBuilder::build`] fills the gaps with the named defaults below, validates the
//! result and produces an immutable [`GenerationOptions`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{UnsupportedPatternKindError, ValidationError};
use crate::geometry::{resolve_content_rect, ContentRect, Margins, Orientation, PageSize};

/// Interior page count used when none is configured.
pub const DEFAULT_PAGE_COUNT: u32 = 100;
/// Default trim width in inches.
pub const DEFAULT_PAGE_WIDTH: f64 = 6.0;
/// Default trim height in inches.
pub const DEFAULT_PAGE_HEIGHT: f64 = 9.0;
/// Default margin on every side, in inches.
pub const DEFAULT_MARGIN: f64 = 0.5;
/// Default spacing for lined pages, in inches.
pub const DEFAULT_LINE_SPACING: f64 = 0.25;
/// Default spacing for dotted pages, in inches.
pub const DEFAULT_DOT_SPACING: f64 = 0.25;
/// Default spacing for grid pages, in inches.
pub const DEFAULT_GRID_SPACING: f64 = 0.25;
/// File extension of the generated artifact.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Interior page pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Horizontal writing rules.
    #[default]
    Lined,
    /// Regular dot grid.
    Dotted,
    /// Square grid of horizontal and vertical rules.
    Grid,
    /// Nothing drawn.
    Blank,
}

impl PatternKind {
    /// Every supported kind.
    pub const ALL: [PatternKind; 4] = [Self::Lined, Self::Dotted, Self::Grid, Self::Blank];

    /// Lower-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lined => "lined",
            Self::Dotted => "dotted",
            Self::Grid => "grid",
            Self::Blank => "blank",
        }
    }
}

impl FromStr for PatternKind {
    type Err = UnsupportedPatternKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnsupportedPatternKindError(value.to_string()))
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated, immutable generation options.
///
/// Instances can only be created through [`OptionsBuilder::build`], so every value held
/// here satisfies the document invariants: positive dimensions and page count, a
/// non-degenerate content rectangle and positive spacings.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOptions {
    title: String,
    subtitle: Option<String>,
    author: Option<String>,
    page_count: u32,
    page_width: f64,
    page_height: f64,
    pattern: PatternKind,
    margins: Margins,
    line_spacing: f64,
    dot_spacing: f64,
    grid_spacing: f64,
    page_numbers: bool,
    watermark: Option<String>,
    header: Option<String>,
    footer: Option<String>,
    cover_image: Option<PathBuf>,
    custom_font: Option<PathBuf>,
    font_name: Option<String>,
    output_name: Option<String>,
    bookmarks: bool,
}

impl GenerationOptions {
    /// Starts a builder with the given title.
    pub fn builder(title: impl Into<String>) -> OptionsBuilder {
        OptionsBuilder::new(title)
    }

    /// Book title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional subtitle shown beneath the title on the cover.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Optional author shown on the cover.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Number of interior pages.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Page width in inches.
    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    /// Page height in inches.
    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Interior pattern.
    pub fn pattern(&self) -> PatternKind {
        self.pattern
    }

    /// Page margins in inches.
    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    /// Spacing between lined rules, in inches.
    pub fn line_spacing(&self) -> f64 {
        self.line_spacing
    }

    /// Spacing between dots, in inches.
    pub fn dot_spacing(&self) -> f64 {
        self.dot_spacing
    }

    /// Spacing between grid rules, in inches.
    pub fn grid_spacing(&self) -> f64 {
        self.grid_spacing
    }

    /// Spacing (inches) that applies to the configured pattern.
    pub fn spacing_for_pattern(&self) -> f64 {
        match self.pattern {
            PatternKind::Lined | PatternKind::Blank => self.line_spacing,
            PatternKind::Dotted => self.dot_spacing,
            PatternKind::Grid => self.grid_spacing,
        }
    }

    /// Whether interior pages carry page numbers.
    pub fn page_numbers(&self) -> bool {
        self.page_numbers
    }

    /// Optional diagonal watermark text.
    pub fn watermark(&self) -> Option<&str> {
        self.watermark.as_deref()
    }

    /// Optional running header text.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Optional running footer text.
    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    /// Optional cover image path.
    pub fn cover_image(&self) -> Option<&Path> {
        self.cover_image.as_deref()
    }

    /// Optional custom font path.
    pub fn custom_font(&self) -> Option<&Path> {
        self.custom_font.as_deref()
    }

    /// Optional logical name for the custom font.
    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    /// Explicit output name, if one was configured.
    pub fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    /// Whether the document gets an outline (bookmarks panel).
    pub fn bookmarks(&self) -> bool {
        self.bookmarks
    }

    /// Total pages in the finished document: cover, interior pages and back cover.
    pub fn total_pages(&self) -> u64 {
        u64::from(self.page_count) + 2
    }

    /// Content rectangle shared by every interior page.
    pub fn content_rect(&self) -> ContentRect {
        // Margins were validated in `build`, so the fallback is never taken.
        resolve_content_rect(self.page_width, self.page_height, &self.margins).unwrap_or(
            ContentRect {
                left: 0.0,
                right: 0.0,
                top: 0.0,
                bottom: 0.0,
            },
        )
    }

    /// File name of the artifact: the explicit output name, or one derived from the title.
    pub fn output_file_name(&self) -> String {
        match &self.output_name {
            Some(name) => name.clone(),
            None => derive_file_name(&self.title),
        }
    }

    /// Re-checks the invariants of an already built record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            &self.title,
            self.page_count,
            self.page_width,
            self.page_height,
            &self.margins,
            [
                ("line spacing", self.line_spacing),
                ("dot spacing", self.dot_spacing),
                ("grid spacing", self.grid_spacing),
            ],
        )
    }
}

/// Derives an artifact file name from a title.
///
/// Characters other than letters, digits, spaces and underscores are dropped, the result
/// is trimmed and spaces become underscores. A title with nothing left falls back to
/// `untitled`.
pub fn derive_file_name(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    let stem = kept.trim().replace(' ', "_");
    let stem = if stem.is_empty() { "untitled" } else { &stem };
    format!("{stem}.{DOCUMENT_EXTENSION}")
}

fn validate_fields(
    title: &str,
    page_count: u32,
    page_width: f64,
    page_height: f64,
    margins: &Margins,
    spacings: [(&'static str, f64); 3],
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if page_count == 0 {
        return Err(ValidationError::NonPositivePageCount);
    }
    for (field, value) in [("page width", page_width), ("page height", page_height)] {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ValidationError::NonPositiveDimension { field, value });
        }
    }
    for (side, value) in margins.sides() {
        if !(value >= 0.0) || !value.is_finite() {
            return Err(ValidationError::NegativeMargin { side, value });
        }
    }
    for (field, value) in spacings {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ValidationError::NonPositiveSpacing { field, value });
        }
    }
    resolve_content_rect(page_width, page_height, margins)?;
    Ok(())
}

/// Partially filled options with named defaults.
///
/// The builder is also the on-disk project format, so it (de)serializes with `serde` and
/// keeps the pattern as a raw string: an unknown pattern in a project file is reported by
/// [`OptionsBuilder::build`] as a validation error rather than a parse error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsBuilder {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    margin_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    margin_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    margin_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dot_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_numbers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watermark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_image: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_font: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bookmarks: Option<bool>,
}

impl OptionsBuilder {
    /// Creates a builder with the given title and every other field unset.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Creates a builder with no fields set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the number of interior pages.
    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Sets the page dimensions in inches.
    pub fn with_page_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the page dimensions from a preset and orientation.
    pub fn with_page_size(self, size: PageSize, orientation: Orientation) -> Self {
        let (width, height) = size.oriented(orientation);
        self.with_page_dimensions(width, height)
    }

    /// Sets the interior pattern.
    pub fn with_pattern(self, pattern: PatternKind) -> Self {
        self.with_pattern_name(pattern.name())
    }

    /// Sets the interior pattern by name. Unknown names are rejected by [`build`](Self::build).
    pub fn with_pattern_name(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets all four margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margin_top = Some(margins.top);
        self.margin_bottom = Some(margins.bottom);
        self.margin_left = Some(margins.left);
        self.margin_right = Some(margins.right);
        self
    }

    /// Sets the top margin.
    pub fn with_margin_top(mut self, inches: f64) -> Self {
        self.margin_top = Some(inches);
        self
    }

    /// Sets the bottom margin.
    pub fn with_margin_bottom(mut self, inches: f64) -> Self {
        self.margin_bottom = Some(inches);
        self
    }

    /// Sets the left margin.
    pub fn with_margin_left(mut self, inches: f64) -> Self {
        self.margin_left = Some(inches);
        self
    }

    /// Sets the right margin.
    pub fn with_margin_right(mut self, inches: f64) -> Self {
        self.margin_right = Some(inches);
        self
    }

    /// Sets the spacing between lined rules.
    pub fn with_line_spacing(mut self, inches: f64) -> Self {
        self.line_spacing = Some(inches);
        self
    }

    /// Sets the spacing between dots.
    pub fn with_dot_spacing(mut self, inches: f64) -> Self {
        self.dot_spacing = Some(inches);
        self
    }

    /// Sets the spacing between grid rules.
    pub fn with_grid_spacing(mut self, inches: f64) -> Self {
        self.grid_spacing = Some(inches);
        self
    }

    /// Enables or disables page numbers.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.page_numbers = Some(enabled);
        self
    }

    /// Sets the watermark text.
    pub fn with_watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark = Some(text.into());
        self
    }

    /// Sets the header text.
    pub fn with_header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(text.into());
        self
    }

    /// Sets the footer text.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    /// Sets the cover image path.
    pub fn with_cover_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.cover_image = Some(path.into());
        self
    }

    /// Sets the custom font path.
    pub fn with_custom_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_font = Some(path.into());
        self
    }

    /// Sets the logical name of the custom font.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Sets the output file name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Enables or disables the document outline.
    pub fn with_bookmarks(mut self, enabled: bool) -> Self {
        self.bookmarks = Some(enabled);
        self
    }

    /// Layers `self` on top of `base`: every field set here wins, unset fields fall back
    /// to `base`.
    pub fn merged_over(self, base: OptionsBuilder) -> OptionsBuilder {
        OptionsBuilder {
            title: self.title.or(base.title),
            subtitle: self.subtitle.or(base.subtitle),
            author: self.author.or(base.author),
            pages: self.pages.or(base.pages),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            pattern: self.pattern.or(base.pattern),
            margin_top: self.margin_top.or(base.margin_top),
            margin_bottom: self.margin_bottom.or(base.margin_bottom),
            margin_left: self.margin_left.or(base.margin_left),
            margin_right: self.margin_right.or(base.margin_right),
            line_spacing: self.line_spacing.or(base.line_spacing),
            dot_spacing: self.dot_spacing.or(base.dot_spacing),
            grid_spacing: self.grid_spacing.or(base.grid_spacing),
            page_numbers: self.page_numbers.or(base.page_numbers),
            watermark: self.watermark.or(base.watermark),
            header: self.header.or(base.header),
            footer: self.footer.or(base.footer),
            cover_image: self.cover_image.or(base.cover_image),
            custom_font: self.custom_font.or(base.custom_font),
            font_name: self.font_name.or(base.font_name),
            output_name: self.output_name.or(base.output_name),
            bookmarks: self.bookmarks.or(base.bookmarks),
        }
    }

    /// Applies defaults, validates and freezes the options.
    pub fn build(self) -> Result<GenerationOptions, ValidationError> {
        let title = self.title.unwrap_or_default();
        let pattern = match self.pattern.as_deref() {
            Some(name) => name.parse::<PatternKind>()?,
            None => PatternKind::default(),
        };
        let margins = Margins::new(
            self.margin_top.unwrap_or(DEFAULT_MARGIN),
            self.margin_bottom.unwrap_or(DEFAULT_MARGIN),
            self.margin_left.unwrap_or(DEFAULT_MARGIN),
            self.margin_right.unwrap_or(DEFAULT_MARGIN),
        );

        let options = GenerationOptions {
            title,
            subtitle: non_blank(self.subtitle),
            author: non_blank(self.author),
            page_count: self.pages.unwrap_or(DEFAULT_PAGE_COUNT),
            page_width: self.width.unwrap_or(DEFAULT_PAGE_WIDTH),
            page_height: self.height.unwrap_or(DEFAULT_PAGE_HEIGHT),
            pattern,
            margins,
            line_spacing: self.line_spacing.unwrap_or(DEFAULT_LINE_SPACING),
            dot_spacing: self.dot_spacing.unwrap_or(DEFAULT_DOT_SPACING),
            grid_spacing: self.grid_spacing.unwrap_or(DEFAULT_GRID_SPACING),
            page_numbers: self.page_numbers.unwrap_or(true),
            watermark: non_blank(self.watermark),
            header: non_blank(self.header),
            footer: non_blank(self.footer),
            cover_image: self.cover_image,
            custom_font: self.custom_font,
            font_name: non_blank(self.font_name),
            output_name: non_blank(self.output_name),
            bookmarks: self.bookmarks.unwrap_or(true),
        };

        options.validate()?;
        Ok(options)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;

    fn journal() -> OptionsBuilder {
        OptionsBuilder::new("Daily Journal")
            .with_page_count(5)
            .with_page_dimensions(6.0, 9.0)
            .with_pattern(PatternKind::Lined)
            .with_margins(Margins::uniform(0.5))
            .with_line_spacing(0.25)
            .with_page_numbers(true)
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let options = OptionsBuilder::new("Notes").build().expect("defaults are valid");
        assert_eq!(options.page_count(), DEFAULT_PAGE_COUNT);
        assert_eq!(options.page_width(), DEFAULT_PAGE_WIDTH);
        assert_eq!(options.pattern(), PatternKind::Lined);
        assert_eq!(options.margins(), &Margins::uniform(DEFAULT_MARGIN));
        assert!(options.page_numbers());
        assert!(options.bookmarks());
    }

    #[test]
    fn zero_pages_is_rejected() {
        let err = journal().with_page_count(0).build().unwrap_err();
        assert_eq!(err, ValidationError::NonPositivePageCount);
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let err = journal().with_page_dimensions(0.0, 9.0).build().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositiveDimension {
                field: "page width",
                ..
            }
        ));
    }

    #[test]
    fn negative_margin_is_rejected() {
        let err = journal().with_margin_left(-0.1).build().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NegativeMargin { side: "left", .. }
        ));
    }

    #[test]
    fn degenerate_margins_are_rejected() {
        let err = journal()
            .with_margin_top(4.5)
            .with_margin_bottom(4.5)
            .build()
            .unwrap_err();
        match err {
            ValidationError::InvalidMargins(inner) => assert_eq!(inner.axis, Axis::Vertical),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let err = journal().with_dot_spacing(0.0).build().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositiveSpacing {
                field: "dot spacing",
                ..
            }
        ));
    }

    #[test]
    fn unknown_pattern_is_a_validation_error() {
        let err = journal().with_pattern_name("hexagon").build().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedPatternKind(UnsupportedPatternKindError(
                "hexagon".to_string()
            ))
        );
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            OptionsBuilder::new("   ").build().unwrap_err(),
            ValidationError::MissingTitle
        );
        assert_eq!(
            OptionsBuilder::empty().build().unwrap_err(),
            ValidationError::MissingTitle
        );
    }

    #[test]
    fn output_name_is_derived_from_title() {
        let options = journal().build().expect("valid");
        assert_eq!(options.output_file_name(), "Daily_Journal.pdf");
        assert_eq!(derive_file_name("  My: Travel/Log!  "), "My_TravelLog.pdf");
        assert_eq!(derive_file_name("snake_case title"), "snake_case_title.pdf");
        assert_eq!(derive_file_name("?!"), "untitled.pdf");
    }

    #[test]
    fn explicit_output_name_wins() {
        let options = journal().with_output_name("out.pdf").build().expect("valid");
        assert_eq!(options.output_file_name(), "out.pdf");
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = OptionsBuilder::empty()
            .with_pattern(PatternKind::Grid)
            .with_page_count(40)
            .with_watermark("DRAFT");
        let merged = OptionsBuilder::new("Graph")
            .with_page_count(12)
            .merged_over(base)
            .build()
            .expect("valid");
        assert_eq!(merged.pattern(), PatternKind::Grid);
        assert_eq!(merged.page_count(), 12);
        assert_eq!(merged.watermark(), Some("DRAFT"));
        assert_eq!(merged.title(), "Graph");
    }

    #[test]
    fn spacing_follows_pattern() {
        let options = journal()
            .with_pattern(PatternKind::Dotted)
            .with_dot_spacing(0.2)
            .build()
            .expect("valid");
        assert_eq!(options.spacing_for_pattern(), 0.2);
    }

    #[test]
    fn builder_round_trips_through_json_with_original_field_names() {
        let json = r#"{"title":"Daily Journal","pages":5,"width":6,"height":9,"type":"lined","line_spacing":0.25,"page_numbers":true}"#;
        let builder: OptionsBuilder = serde_json::from_str(json).expect("parse");
        let options = builder.build().expect("valid");
        assert_eq!(options.page_count(), 5);
        assert_eq!(options.pattern(), PatternKind::Lined);
    }

    #[test]
    fn total_pages_counts_both_covers_without_overflow() {
        assert_eq!(journal().build().expect("valid").total_pages(), 7);
        let largest = journal().with_page_count(u32::MAX).build().expect("valid");
        assert_eq!(largest.total_pages(), u64::from(u32::MAX) + 2);
    }

    #[test]
    fn blank_optional_text_is_treated_as_absent() {
        let options = journal().with_watermark("  ").build().expect("valid");
        assert_eq!(options.watermark(), None);
    }
}
