//! Font selection for the layout engine.
//!
//! Every document uses one [`FontFamily`]: either the built-in Helvetica family or a
//! single custom TrueType font registered once before drawing starts. A custom font that
//! cannot be found or parsed is reported with `warn!` and the built-in family is used
//! instead; font problems never abort generation.

pub mod metrics;

use std::env;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{ResourceError, SurfaceError};
use crate::resources::{self, FontResource};
use crate::surface::DrawingSurface;

use self::metrics::BuiltinFont;

/// Name of the built-in font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Helvetica";

/// Environment variable holding an extra directory to search for relative font paths.
pub const FONTS_DIR_ENV: &str = "JOURNAL_PRESS_FONTS_DIR";

/// Logical font names for each text role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFamily {
    /// Body text, header, footer, page numbers, watermark and subtitle.
    pub regular: String,
    /// Cover title and back cover.
    pub bold: String,
    /// Author line.
    pub italic: String,
}

impl FontFamily {
    /// The built-in Helvetica family.
    pub fn builtin() -> Self {
        Self {
            regular: BuiltinFont::Helvetica.name().to_string(),
            bold: BuiltinFont::HelveticaBold.name().to_string(),
            italic: BuiltinFont::HelveticaOblique.name().to_string(),
        }
    }

    /// A family that uses one registered custom font for every role.
    pub fn single(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            regular: name.clone(),
            bold: name.clone(),
            italic: name,
        }
    }

    /// Whether this is the built-in family.
    pub fn is_builtin(&self) -> bool {
        *self == Self::builtin()
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Derives a logical font name from a file path: its base name without extension.
pub fn logical_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .filter(|stem| !stem.is_empty())
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(FONTS_DIR_ENV) {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            candidates.push(path);
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.iter().any(|existing| existing == &candidate) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Finds the font file for `path`.
///
/// Absolute paths and paths that exist relative to the working directory are used as
/// they are. Otherwise the file is looked up in `$JOURNAL_PRESS_FONTS_DIR` and in
/// `assets/fonts` next to the executable.
pub fn resolve_font_path(path: &Path) -> Result<PathBuf, ResourceError> {
    if path.is_file() || path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let mut attempts = vec![path.display().to_string()];
    for directory in font_directory_candidates() {
        let candidate = directory.join(path);
        if candidate.is_file() {
            return Ok(candidate);
        }
        attempts.push(candidate.display().to_string());
    }

    Err(ResourceError::FontNotFound {
        path: path.to_path_buf(),
        searched: attempts.join(", "),
    })
}

/// Loads the custom font at `path` (after search-path resolution).
pub fn load_custom_font(path: &Path) -> Result<FontResource, ResourceError> {
    let resolved = resolve_font_path(path)?;
    resources::load_font(&resolved)
}

/// Registers the document font and returns the family renderers should use.
///
/// With no `path` the built-in family is returned without touching the surface. With a
/// path, the font is loaded, bound to `explicit_name` (or the file's base name) and used
/// for every role. Load failures log a warning and fall back to the built-in family;
/// only a failing surface is reported as an error.
pub fn register_font<S>(
    surface: &mut S,
    path: Option<&Path>,
    explicit_name: Option<&str>,
) -> Result<FontFamily, SurfaceError>
where
    S: DrawingSurface + ?Sized,
{
    let Some(path) = path else {
        return Ok(FontFamily::builtin());
    };

    let name = match explicit_name
        .map(str::to_string)
        .or_else(|| logical_name_for(path))
    {
        Some(name) => name,
        None => {
            warn!(
                "Custom font path {} has no usable file name; using '{}' instead.",
                path.display(),
                DEFAULT_FONT_FAMILY_NAME
            );
            return Ok(FontFamily::builtin());
        }
    };

    match load_custom_font(path) {
        Ok(font) => {
            surface.register_font(&name, &font)?;
            info!("Registered custom font '{}' from {}", name, font.source().display());
            Ok(FontFamily::single(name))
        }
        Err(err) => {
            warn!(
                "Custom font unavailable ({}); falling back to the built-in '{}' family.",
                err, DEFAULT_FONT_FAMILY_NAME
            );
            Ok(FontFamily::builtin())
        }
    }
}
