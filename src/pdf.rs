//! PDF backend for the drawing surface, built directly on `lopdf`.
//!
//! Each page gets its own content stream; fonts, images and opacity states are collected
//! into one resources dictionary shared by every page. The object graph is only
//! completed when the document is saved, at which point the page tree, catalog,
//! metadata and outline are written.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::bookmarks::{apply_bookmarks, Bookmark};
use crate::error::SurfaceError;
use crate::fonts::metrics::{encode_win_ansi, encoded_width, BuiltinFont};
use crate::geometry::{fit_within, Placement};
use crate::resources::{FontResource, ImageResource};
use crate::surface::{DrawingSurface, Rgb};

/// Control point distance for approximating a quarter circle with a cubic Bézier.
const KAPPA: f64 = 0.552_284_749_8;

const PRODUCER: &str = concat!("journal_press ", env!("CARGO_PKG_VERSION"));

/// Document information dictionary entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    /// `/Title`.
    pub title: Option<String>,
    /// `/Author`.
    pub author: Option<String>,
    /// `/Subject`.
    pub subject: Option<String>,
}

enum GlyphWidths {
    Builtin(BuiltinFont),
    Embedded(Vec<u16>),
}

impl GlyphWidths {
    fn width_of(&self, code: u8) -> u16 {
        match self {
            Self::Builtin(font) => font.width_of(code),
            Self::Embedded(widths) => widths.get(usize::from(code)).copied().unwrap_or(0),
        }
    }
}

struct PdfFont {
    resource: String,
    object_id: ObjectId,
    widths: GlyphWidths,
}

#[derive(Clone, Debug, Default)]
struct PenState {
    font: Option<(String, f64)>,
}

/// A [`DrawingSurface`] that produces a PDF document.
pub struct PdfSurface {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    width: f64,
    height: f64,
    page: Option<Vec<Operation>>,
    fonts: BTreeMap<String, PdfFont>,
    images: BTreeMap<PathBuf, (String, ObjectId)>,
    opacities: BTreeMap<u32, (String, ObjectId)>,
    pen: PenState,
    saved: Vec<PenState>,
    bookmarks: Vec<Bookmark>,
    info: DocumentInfo,
    compress: bool,
    finalized: bool,
}

impl PdfSurface {
    /// Creates a surface whose pages all measure `width` x `height` render units.
    pub fn new(width: f64, height: f64) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            width,
            height,
            page: None,
            fonts: BTreeMap::new(),
            images: BTreeMap::new(),
            opacities: BTreeMap::new(),
            pen: PenState::default(),
            saved: Vec::new(),
            bookmarks: Vec::new(),
            info: DocumentInfo::default(),
            compress: true,
            finalized: false,
        }
    }

    /// Sets the document information dictionary.
    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    /// Enables or disables Flate compression of content streams, images and fonts.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Number of pages opened so far, including the one being drawn.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.page.is_some())
    }

    /// Finalizes the document and returns the serialized bytes.
    pub fn to_bytes(mut self) -> Result<Vec<u8>, SurfaceError> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn ops(&mut self) -> Result<&mut Vec<Operation>, SurfaceError> {
        if self.finalized {
            return Err(SurfaceError::Finalized);
        }
        self.page.as_mut().ok_or(SurfaceError::NoOpenPage)
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) -> Result<(), SurfaceError> {
        self.ops()?.push(Operation::new(operator, operands));
        Ok(())
    }

    fn stream(&self, mut dict: Dictionary, data: Vec<u8>) -> Result<Stream, SurfaceError> {
        if !self.compress {
            return Ok(Stream::new(dict, data));
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data)?;
        dict.set("Filter", "FlateDecode");
        Ok(Stream::new(dict, encoder.finish()?))
    }

    fn seal_page(&mut self) -> Result<(), SurfaceError> {
        let Some(mut operations) = self.page.take() else {
            return Ok(());
        };

        if !self.saved.is_empty() {
            warn!(
                "Page {} ended with {} unbalanced state pushes; closing them.",
                self.page_ids.len() + 1,
                self.saved.len()
            );
            operations.extend(self.saved.drain(..).map(|_| Operation::new("Q", vec![])));
        }
        self.pen = PenState::default();

        let encoded = Content { operations }.encode()?;
        let stream = self.stream(Dictionary::new(), encoded)?;
        let content_id = self.document.add_object(stream);
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(self.width), real(self.height)],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        debug!("Sealed PDF page {}", self.page_ids.len());
        Ok(())
    }

    fn ensure_builtin_font(&mut self, name: &str) -> bool {
        if self.fonts.contains_key(name) {
            return true;
        }
        let Some(builtin) = BuiltinFont::from_name(name) else {
            return false;
        };
        let object_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => builtin.name(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.insert_font(name, object_id, GlyphWidths::Builtin(builtin));
        true
    }

    fn insert_font(&mut self, name: &str, object_id: ObjectId, widths: GlyphWidths) {
        let resource = format!("F{}", self.fonts.len() + 1);
        self.fonts.insert(
            name.to_string(),
            PdfFont {
                resource,
                object_id,
                widths,
            },
        );
    }

    fn image_resource(&mut self, image: &ImageResource) -> Result<String, SurfaceError> {
        if let Some((resource, _)) = self.images.get(image.source()) {
            return Ok(resource.clone());
        }

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width()),
            "Height" => i64::from(image.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        let stream = self.stream(dict, image.rgb().to_vec())?;
        let object_id = self.document.add_object(stream);
        let resource = format!("Im{}", self.images.len() + 1);
        self.images
            .insert(image.source().to_path_buf(), (resource.clone(), object_id));
        Ok(resource)
    }

    fn opacity_resource(&mut self, alpha: f64) -> String {
        let key = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u32;
        if let Some((resource, _)) = self.opacities.get(&key) {
            return resource.clone();
        }
        let value = f64::from(key) / 1000.0;
        let object_id = self.document.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => real(value),
            "CA" => real(value),
        });
        let resource = format!("GS{}", self.opacities.len() + 1);
        self.opacities.insert(key, (resource.clone(), object_id));
        resource
    }

    fn current_font(&self) -> Result<(&PdfFont, f64), SurfaceError> {
        let (name, size) = self.pen.font.as_ref().ok_or(SurfaceError::NoFontSelected)?;
        let font = self
            .fonts
            .get(name)
            .ok_or_else(|| SurfaceError::UnknownFont(name.clone()))?;
        Ok((font, *size))
    }

    fn show_text(&mut self, x: f64, y: f64, encoded: Vec<u8>) -> Result<(), SurfaceError> {
        let (font, size) = self.current_font()?;
        let resource = font.resource.clone();
        let operations = self.ops()?;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(resource.into_bytes()), real(size)],
        ));
        operations.push(Operation::new("Td", vec![real(x), real(y)]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
        Ok(())
    }

    fn resource_map<'a>(entries: impl Iterator<Item = (&'a String, ObjectId)>) -> Dictionary {
        let mut dict = Dictionary::new();
        for (resource, object_id) in entries {
            dict.set(resource.as_bytes().to_vec(), object_id);
        }
        dict
    }

    fn finalize(&mut self) -> Result<(), SurfaceError> {
        if self.finalized {
            return Err(SurfaceError::Finalized);
        }
        self.seal_page()?;

        let resources = dictionary! {
            "ProcSet" => vec!["PDF".into(), "Text".into(), "ImageC".into()],
            "Font" => Self::resource_map(
                self.fonts.values().map(|font| (&font.resource, font.object_id)),
            ),
            "XObject" => Self::resource_map(
                self.images.values().map(|(resource, id)| (resource, *id)),
            ),
            "ExtGState" => Self::resource_map(
                self.opacities.values().map(|(resource, id)| (resource, *id)),
            ),
        };
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "Creator" => Object::string_literal(PRODUCER),
        };
        for (key, value) in [
            ("Title", &self.info.title),
            ("Author", &self.info.author),
            ("Subject", &self.info.subject),
        ] {
            if let Some(value) = value {
                info.set(key, Object::String(encode_win_ansi(value), StringFormat::Literal));
            }
        }
        let info_id = self.document.add_object(info);
        self.document.trailer.set("Info", info_id);

        apply_bookmarks(&mut self.document, &self.page_ids, &self.bookmarks)?;

        self.finalized = true;
        Ok(())
    }
}

fn real(value: f64) -> Object {
    Object::from(value as f32)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

fn write_document(document: &mut Document, target: &Path) -> Result<(), SurfaceError> {
    let file = File::create(target)?;
    let mut writer = BufWriter::new(file);
    document.save_to(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn base_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "CustomFont".to_string()
    } else {
        cleaned
    }
}

impl DrawingSurface for PdfSurface {
    fn new_page(&mut self) -> Result<(), SurfaceError> {
        if self.finalized {
            return Err(SurfaceError::Finalized);
        }
        self.seal_page()?;
        self.page = Some(Vec::new());
        Ok(())
    }

    fn set_fill_color(&mut self, color: Rgb) -> Result<(), SurfaceError> {
        self.push("rg", vec![real(color.r), real(color.g), real(color.b)])
    }

    fn set_stroke_color(&mut self, color: Rgb) -> Result<(), SurfaceError> {
        self.push("RG", vec![real(color.r), real(color.g), real(color.b)])
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), SurfaceError> {
        self.push("w", vec![real(width)])
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), SurfaceError> {
        let operations = self.ops()?;
        operations.push(Operation::new("m", vec![real(x1), real(y1)]));
        operations.push(Operation::new("l", vec![real(x2), real(y2)]));
        operations.push(Operation::new("S", vec![]));
        Ok(())
    }

    fn draw_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        filled: bool,
    ) -> Result<(), SurfaceError> {
        let operations = self.ops()?;
        operations.push(Operation::new(
            "re",
            vec![real(x), real(y), real(width), real(height)],
        ));
        operations.push(Operation::new(if filled { "f" } else { "S" }, vec![]));
        Ok(())
    }

    fn draw_circle(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        filled: bool,
    ) -> Result<(), SurfaceError> {
        let k = radius * KAPPA;
        let curve = |x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64| {
            Operation::new(
                "c",
                vec![real(x1), real(y1), real(x2), real(y2), real(x3), real(y3)],
            )
        };

        let operations = self.ops()?;
        operations.push(Operation::new("m", vec![real(cx + radius), real(cy)]));
        operations.push(curve(cx + radius, cy + k, cx + k, cy + radius, cx, cy + radius));
        operations.push(curve(cx - k, cy + radius, cx - radius, cy + k, cx - radius, cy));
        operations.push(curve(cx - radius, cy - k, cx - k, cy - radius, cx, cy - radius));
        operations.push(curve(cx + k, cy - radius, cx + radius, cy - k, cx + radius, cy));
        operations.push(Operation::new("h", vec![]));
        operations.push(Operation::new(if filled { "f" } else { "S" }, vec![]));
        Ok(())
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
        self.ops()?;
        let target = Placement {
            x,
            y,
            width,
            height,
        };
        let placed = if preserve_aspect {
            fit_within(target, f64::from(image.width()), f64::from(image.height()))
        } else {
            target
        };
        let resource = self.image_resource(image)?;

        let operations = self.ops()?;
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new(
            "cm",
            vec![
                real(placed.width),
                0.into(),
                0.into(),
                real(placed.height),
                real(placed.x),
                real(placed.y),
            ],
        ));
        operations.push(Operation::new("Do", vec![Object::Name(resource.into_bytes())]));
        operations.push(Operation::new("Q", vec![]));
        Ok(())
    }

    fn register_font(&mut self, name: &str, font: &FontResource) -> Result<(), SurfaceError> {
        if self.finalized {
            return Err(SurfaceError::Finalized);
        }
        if self.fonts.contains_key(name) {
            warn!("Font '{}' is already registered; keeping the first binding.", name);
            return Ok(());
        }

        let metrics = font.metrics();
        let base_font = base_font_name(name);
        let file = self.stream(
            dictionary! { "Length1" => font.data().len() as i64 },
            font.data().to_vec(),
        )?;
        let file_id = self.document.add_object(file);

        let flags: i64 = if metrics.italic { 32 | 64 } else { 32 };
        let descriptor_id = self.document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.as_str(),
            "Flags" => flags,
            "FontBBox" => metrics.bbox.iter().map(|v| Object::Integer(i64::from(*v))).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => i64::from(metrics.ascent),
            "Descent" => i64::from(metrics.descent),
            "CapHeight" => i64::from(metrics.cap_height),
            "StemV" => 80,
            "FontFile2" => file_id,
        });

        let widths: Vec<Object> = (32..=255u8)
            .map(|code| Object::Integer(i64::from(metrics.width_of(code))))
            .collect();
        let object_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => base_font.as_str(),
            "FirstChar" => 32,
            "LastChar" => 255,
            "Widths" => widths,
            "Encoding" => "WinAnsiEncoding",
            "FontDescriptor" => descriptor_id,
        });

        self.insert_font(name, object_id, GlyphWidths::Embedded(metrics.widths.clone()));
        Ok(())
    }

    fn set_font(&mut self, name: &str, size: f64) -> Result<(), SurfaceError> {
        if self.finalized {
            return Err(SurfaceError::Finalized);
        }
        if !self.ensure_builtin_font(name) {
            return Err(SurfaceError::UnknownFont(name.to_string()));
        }
        self.pen.font = Some((name.to_string(), size));
        Ok(())
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), SurfaceError> {
        self.show_text(x, y, encode_win_ansi(text))
    }

    fn draw_centered_text(&mut self, x: f64, y: f64, text: &str) -> Result<(), SurfaceError> {
        let encoded = encode_win_ansi(text);
        let (font, size) = self.current_font()?;
        let width = encoded_width(&encoded, size, |code| font.widths.width_of(code));
        self.show_text(x - width / 2.0, y, encoded)
    }

    fn push_transform(&mut self) -> Result<(), SurfaceError> {
        self.push("q", vec![])?;
        self.saved.push(self.pen.clone());
        Ok(())
    }

    fn rotate(&mut self, degrees: f64) -> Result<(), SurfaceError> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.push(
            "cm",
            vec![real(cos), real(sin), real(-sin), real(cos), 0.into(), 0.into()],
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), SurfaceError> {
        self.push(
            "cm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), real(dx), real(dy)],
        )
    }

    fn pop_transform(&mut self) -> Result<(), SurfaceError> {
        self.ops()?;
        let restored = self.saved.pop().ok_or(SurfaceError::TransformUnderflow)?;
        self.pen = restored;
        self.push("Q", vec![])
    }

    fn set_opacity(&mut self, alpha: f64) -> Result<(), SurfaceError> {
        self.ops()?;
        let resource = self.opacity_resource(alpha);
        self.push("gs", vec![Object::Name(resource.into_bytes())])
    }

    fn bookmark(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.ops()?;
        self.bookmarks.push(Bookmark {
            title: title.to_string(),
            page_index: self.page_ids.len(),
        });
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), SurfaceError> {
        self.finalize()?;

        let partial = partial_path(path);
        let result = write_document(&mut self.document, &partial)
            .and_then(|()| fs::rename(&partial, path).map_err(SurfaceError::from));
        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_operators(bytes: &[u8]) -> Vec<Vec<String>> {
        let document = Document::load_mem(bytes).expect("parse generated pdf");
        document
            .get_pages()
            .values()
            .map(|page_id| {
                let data = document.get_page_content(*page_id).expect("content");
                Content::decode(&data)
                    .expect("decode content")
                    .operations
                    .into_iter()
                    .map(|operation| operation.operator)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn pages_are_sealed_in_order() {
        let mut surface = PdfSurface::new(432.0, 648.0);
        surface.new_page().unwrap();
        surface.draw_line(0.0, 0.0, 10.0, 10.0).unwrap();
        surface.new_page().unwrap();
        surface.draw_rect(0.0, 0.0, 432.0, 648.0, true).unwrap();
        assert_eq!(surface.page_count(), 2);

        let pages = page_operators(&surface.to_bytes().unwrap());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], vec!["m", "l", "S"]);
        assert_eq!(pages[1], vec!["re", "f"]);
    }

    #[test]
    fn drawing_without_a_page_fails() {
        let mut surface = PdfSurface::new(100.0, 100.0);
        assert!(matches!(
            surface.draw_line(0.0, 0.0, 1.0, 1.0),
            Err(SurfaceError::NoOpenPage)
        ));
    }

    #[test]
    fn text_requires_a_known_font() {
        let mut surface = PdfSurface::new(100.0, 100.0);
        surface.new_page().unwrap();
        assert!(matches!(
            surface.draw_text(1.0, 1.0, "x"),
            Err(SurfaceError::NoFontSelected)
        ));
        assert!(matches!(
            surface.set_font("Papyrus", 12.0),
            Err(SurfaceError::UnknownFont(_))
        ));
        surface.set_font("Helvetica", 12.0).unwrap();
        surface.draw_centered_text(50.0, 50.0, "Hello").unwrap();
    }

    #[test]
    fn circles_are_four_bezier_arcs() {
        let mut surface = PdfSurface::new(100.0, 100.0).with_compression(false);
        surface.new_page().unwrap();
        surface.draw_circle(50.0, 50.0, 1.0, true).unwrap();
        let pages = page_operators(&surface.to_bytes().unwrap());
        assert_eq!(pages[0], vec!["m", "c", "c", "c", "c", "h", "f"]);
    }

    #[test]
    fn opacity_state_is_registered_once() {
        let mut surface = PdfSurface::new(100.0, 100.0);
        surface.new_page().unwrap();
        surface.set_opacity(0.1).unwrap();
        surface.set_opacity(0.1).unwrap();
        surface.set_opacity(1.0).unwrap();
        assert_eq!(surface.opacities.len(), 2);
    }

    #[test]
    fn pop_restores_font_selection() {
        let mut surface = PdfSurface::new(100.0, 100.0);
        surface.new_page().unwrap();
        surface.set_font("Helvetica", 10.0).unwrap();
        surface.push_transform().unwrap();
        surface.set_font("Helvetica-Bold", 50.0).unwrap();
        surface.pop_transform().unwrap();
        assert_eq!(surface.pen.font, Some(("Helvetica".to_string(), 10.0)));
        assert!(matches!(
            surface.pop_transform(),
            Err(SurfaceError::TransformUnderflow)
        ));
    }

    #[test]
    fn save_writes_atomically_and_refuses_reuse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("book.pdf");

        let mut surface = PdfSurface::new(100.0, 100.0).with_info(DocumentInfo {
            title: Some("Book".into()),
            ..DocumentInfo::default()
        });
        surface.new_page().unwrap();
        surface.bookmark("Only page").unwrap();
        surface.save(&path).expect("save");

        assert!(path.is_file());
        assert!(!partial_path(&path).exists());
        assert!(matches!(surface.new_page(), Err(SurfaceError::Finalized)));

        let document = Document::load(&path).expect("load");
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn failed_save_leaves_no_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing-dir").join("book.pdf");
        let mut surface = PdfSurface::new(100.0, 100.0);
        surface.new_page().unwrap();
        assert!(surface.save(&path).is_err());
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn base_font_names_are_sanitized() {
        assert_eq!(base_font_name("My Hand-Font!"), "MyHand-Font");
        assert_eq!(base_font_name("  "), "CustomFont");
    }
}
