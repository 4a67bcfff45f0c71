//! Named presets that pre-fill the options for common kinds of books.
//!
//! A template is only a partial [`OptionsBuilder`]; user supplied values are layered on
//! top with [`OptionsBuilder::merged_over`].

use crate::error::ValidationError;
use crate::geometry::{Margins, Orientation, PageSize};
use crate::options::{OptionsBuilder, PatternKind};

/// A preset and the one-line description shown by `journal-press templates`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateInfo {
    /// Name used to select the template.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
}

/// Every available template, in display order.
pub const TEMPLATES: [TemplateInfo; 5] = [
    TemplateInfo {
        name: "journal",
        description: "6x9 lined journal, 120 pages, page numbers",
    },
    TemplateInfo {
        name: "bullet-journal",
        description: "6x9 dot grid at 5 mm, 160 pages, page numbers",
    },
    TemplateInfo {
        name: "graph-notebook",
        description: "8.5x11 quarter-inch grid, 100 pages",
    },
    TemplateInfo {
        name: "sketchbook",
        description: "8.5x11 blank pages, 100 pages, no page numbers",
    },
    TemplateInfo {
        name: "planner",
        description: "8.5x11 lined planner with weekly header and notes footer",
    },
];

/// Names of every available template.
pub fn template_names() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|info| info.name)
}

/// Returns the partial options for the template called `name` (case-insensitive).
pub fn template(name: &str) -> Result<OptionsBuilder, ValidationError> {
    let normalized = name.trim().to_ascii_lowercase();
    let builder = match normalized.as_str() {
        "journal" => OptionsBuilder::empty()
            .with_page_size(PageSize::SixByNine, Orientation::Portrait)
            .with_page_count(120)
            .with_pattern(PatternKind::Lined)
            .with_line_spacing(0.25)
            .with_page_numbers(true),
        "bullet-journal" => OptionsBuilder::empty()
            .with_page_size(PageSize::SixByNine, Orientation::Portrait)
            .with_page_count(160)
            .with_pattern(PatternKind::Dotted)
            .with_dot_spacing(5.0 / 25.4)
            .with_page_numbers(true),
        "graph-notebook" => OptionsBuilder::empty()
            .with_page_size(PageSize::Letter, Orientation::Portrait)
            .with_page_count(100)
            .with_pattern(PatternKind::Grid)
            .with_grid_spacing(0.25)
            .with_margins(Margins::uniform(0.5))
            .with_page_numbers(false),
        "sketchbook" => OptionsBuilder::empty()
            .with_page_size(PageSize::Letter, Orientation::Portrait)
            .with_page_count(100)
            .with_pattern(PatternKind::Blank)
            .with_page_numbers(false),
        "planner" => OptionsBuilder::empty()
            .with_page_size(PageSize::Letter, Orientation::Portrait)
            .with_page_count(104)
            .with_pattern(PatternKind::Lined)
            .with_line_spacing(0.3)
            .with_margins(Margins::new(0.75, 0.75, 0.625, 0.625))
            .with_header("Week of ____________")
            .with_footer("Notes")
            .with_page_numbers(true),
        _ => return Err(ValidationError::UnknownTemplate(name.to_string())),
    };
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_template_builds_with_a_title() {
        for name in template_names() {
            let options = OptionsBuilder::new("Title")
                .merged_over(template(name).expect("known template"))
                .build();
            assert!(options.is_ok(), "template {name} should be valid");
        }
    }

    #[test]
    fn templates_do_not_supply_a_title() {
        for name in template_names() {
            let err = template(name).expect("known").build().unwrap_err();
            assert_eq!(err, ValidationError::MissingTitle);
        }
    }

    #[test]
    fn user_values_override_the_template() {
        let options = OptionsBuilder::new("Graph")
            .with_page_count(10)
            .merged_over(template("graph-notebook").expect("known"))
            .build()
            .expect("valid");
        assert_eq!(options.page_count(), 10);
        assert_eq!(options.pattern(), PatternKind::Grid);
        assert_eq!(options.page_width(), 8.5);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(template("  Journal ").is_ok());
    }

    #[test]
    fn unknown_template_is_rejected() {
        assert_eq!(
            template("cookbook").unwrap_err(),
            ValidationError::UnknownTemplate("cookbook".into())
        );
    }
}
