use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use journal_press::preflight::run_preflight;
use journal_press::project::{load_project, save_project};
use journal_press::templates::{template, TEMPLATES};
use journal_press::{Assembler, Margins, OptionsBuilder, Orientation, PageSize};
use log::{info, warn};

/// Generates print-ready journals, notebooks and planners as PDF.
///
/// Relative custom font paths are also looked up in `$JOURNAL_PRESS_FONTS_DIR` and in
/// `assets/fonts` next to the executable. Set `RUST_LOG=debug` for per-page logging.
#[derive(Parser)]
#[command(author, version, about = "Low-content book generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a book to PDF.
    Generate {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Directory the PDF is written to.
        #[arg(long, short = 'd', default_value = ".")]
        output_dir: PathBuf,
    },

    /// List the available templates.
    Templates,

    /// Write the merged options to a JSON project file.
    #[command(name = "save-project", aliases = ["save_project"])]
    SaveProject {
        /// Project file to write.
        path: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Check the options against common print requirements.
    Preflight {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Options shared by every command that works on a book layout.
///
/// Precedence from lowest to highest: built-in defaults, `--template`, `--project`, flags.
#[derive(Args)]
struct LayoutArgs {
    /// Start from a named template (see `templates`).
    #[arg(long, short = 't')]
    template: Option<String>,

    /// Start from a saved project file.
    #[arg(long, short = 'p')]
    project: Option<PathBuf>,

    /// Book title.
    #[arg(long)]
    title: Option<String>,

    /// Subtitle printed under the title.
    #[arg(long)]
    subtitle: Option<String>,

    /// Author printed on the cover.
    #[arg(long)]
    author: Option<String>,

    /// Number of interior pages.
    #[arg(long, short = 'n')]
    pages: Option<u32>,

    /// Page size preset: 6x9, 8.5x11, a4 or WIDTHxHEIGHT in inches.
    #[arg(long)]
    size: Option<PageSize>,

    /// Orientation of the page size preset.
    #[arg(long, requires = "size")]
    orientation: Option<Orientation>,

    /// Page width in inches.
    #[arg(long)]
    width: Option<f64>,

    /// Page height in inches.
    #[arg(long)]
    height: Option<f64>,

    /// Interior pattern: lined, dotted, grid or blank.
    #[arg(long = "type", alias = "pattern")]
    pattern: Option<String>,

    /// Margin on every side, in inches.
    #[arg(long)]
    margin: Option<f64>,

    /// Top margin in inches.
    #[arg(long)]
    margin_top: Option<f64>,

    /// Bottom margin in inches.
    #[arg(long)]
    margin_bottom: Option<f64>,

    /// Left margin in inches.
    #[arg(long)]
    margin_left: Option<f64>,

    /// Right margin in inches.
    #[arg(long)]
    margin_right: Option<f64>,

    /// Spacing between lined rules, in inches.
    #[arg(long)]
    line_spacing: Option<f64>,

    /// Spacing between dots, in inches.
    #[arg(long)]
    dot_spacing: Option<f64>,

    /// Spacing between grid rules, in inches.
    #[arg(long)]
    grid_spacing: Option<f64>,

    /// Leave interior pages unnumbered.
    #[arg(long)]
    no_page_numbers: bool,

    /// Diagonal watermark text.
    #[arg(long)]
    watermark: Option<String>,

    /// Header text above the content area.
    #[arg(long)]
    header: Option<String>,

    /// Footer text below the content area.
    #[arg(long)]
    footer: Option<String>,

    /// Cover image (JPEG, PNG, TIFF...).
    #[arg(long)]
    cover_image: Option<PathBuf>,

    /// TrueType font used for all text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Name to register the custom font under.
    #[arg(long)]
    font_name: Option<String>,

    /// Output file name; derived from the title when omitted.
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Do not add an outline (bookmarks panel) to the PDF.
    #[arg(long)]
    no_bookmarks: bool,
}

impl LayoutArgs {
    /// Layers the flags over the project file and template.
    fn resolve(self) -> Result<OptionsBuilder, Box<dyn Error>> {
        let mut base = match &self.template {
            Some(name) => template(name)?,
            None => OptionsBuilder::empty(),
        };
        if let Some(path) = &self.project {
            base = load_project(path)?.merged_over(base);
        }
        Ok(self.into_builder().merged_over(base))
    }

    fn into_builder(self) -> OptionsBuilder {
        let mut builder = OptionsBuilder::empty();

        if let Some(title) = self.title {
            builder = builder.with_title(title);
        }
        if let Some(subtitle) = self.subtitle {
            builder = builder.with_subtitle(subtitle);
        }
        if let Some(author) = self.author {
            builder = builder.with_author(author);
        }
        if let Some(pages) = self.pages {
            builder = builder.with_page_count(pages);
        }
        if let Some(size) = self.size {
            builder = builder.with_page_size(size, self.orientation.unwrap_or_default());
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            builder = builder.with_page_dimensions(width, height);
        } else if self.width.is_some() || self.height.is_some() {
            warn!("--width and --height must be given together; ignoring the one provided.");
        }
        if let Some(pattern) = self.pattern {
            builder = builder.with_pattern_name(pattern);
        }
        if let Some(margin) = self.margin {
            builder = builder.with_margins(Margins::uniform(margin));
        }
        if let Some(value) = self.margin_top {
            builder = builder.with_margin_top(value);
        }
        if let Some(value) = self.margin_bottom {
            builder = builder.with_margin_bottom(value);
        }
        if let Some(value) = self.margin_left {
            builder = builder.with_margin_left(value);
        }
        if let Some(value) = self.margin_right {
            builder = builder.with_margin_right(value);
        }
        if let Some(value) = self.line_spacing {
            builder = builder.with_line_spacing(value);
        }
        if let Some(value) = self.dot_spacing {
            builder = builder.with_dot_spacing(value);
        }
        if let Some(value) = self.grid_spacing {
            builder = builder.with_grid_spacing(value);
        }
        if self.no_page_numbers {
            builder = builder.with_page_numbers(false);
        }
        if let Some(text) = self.watermark {
            builder = builder.with_watermark(text);
        }
        if let Some(text) = self.header {
            builder = builder.with_header(text);
        }
        if let Some(text) = self.footer {
            builder = builder.with_footer(text);
        }
        if let Some(path) = self.cover_image {
            builder = builder.with_cover_image(path);
        }
        if let Some(path) = self.font {
            builder = builder.with_custom_font(path);
        }
        if let Some(name) = self.font_name {
            builder = builder.with_font_name(name);
        }
        if let Some(name) = self.output {
            builder = builder.with_output_name(name);
        }
        if self.no_bookmarks {
            builder = builder.with_bookmarks(false);
        }

        builder
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Generate { layout, output_dir } => {
            let options = layout.resolve()?.build()?;
            let mut assembler = Assembler::new()
                .output_dir(output_dir)
                .on_progress(|done, total| {
                    if done == total || done % 25 == 0 {
                        info!("{done}/{total} interior pages");
                    }
                });
            let path = assembler.assemble(&options)?;
            println!("{}", path.display());
        }
        Commands::Templates => {
            for info in TEMPLATES {
                println!("{:<16} {}", info.name, info.description);
            }
        }
        Commands::SaveProject { path, layout } => {
            let builder = layout.resolve()?;
            save_project(&path, &builder)?;
            println!("{}", path.display());
        }
        Commands::Preflight { layout } => {
            let options = layout.resolve()?.build()?;
            let report = run_preflight(&options);
            println!("{report}");
            if !report.all_passed() {
                std::process::exit(2);
            }
        }
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
