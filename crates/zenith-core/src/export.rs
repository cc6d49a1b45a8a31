//! Export collaborator: stamp draw lists into the original PDF
//!
//! Each touched page gets its existing content wrapped in `q ... Q` and one
//! extra content stream appended, so the page's own graphics state cannot
//! leak into the stamped layer. Resources the stamp needs (standard fonts,
//! opacity states, signature images) are added under `Zn*` names.

use crate::document::{inherited, resolve};
use crate::error::EditorError;
use crate::flatten::{DrawCommand, PageDrawList, Rgb, StandardFont};
use crate::geometry::Point;
use flate2::{write::ZlibEncoder, Compression};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::io::{Cursor, Write};

const RESOURCE_CATEGORIES: [&[u8]; 3] = [b"Font", b"ExtGState", b"XObject"];
const WIN_ANSI: &str = "WinAnsiEncoding";

/// Writes flattened draw commands into PDF bytes.
pub trait PdfExporter {
    fn export(&self, original: &[u8], pages: &[PageDrawList]) -> Result<Vec<u8>, EditorError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExporter;

impl PdfExporter for LopdfExporter {
    fn export(&self, original: &[u8], pages: &[PageDrawList]) -> Result<Vec<u8>, EditorError> {
        if pages.iter().all(|p| p.commands.is_empty()) {
            // Nothing to stamp, return original
            return Ok(original.to_vec());
        }

        let mut doc =
            Document::load_mem(original).map_err(|e| EditorError::ParseError(e.to_string()))?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        for list in pages.iter().filter(|p| !p.commands.is_empty()) {
            let page_id = *page_ids
                .get(list.page_index as usize)
                .ok_or(EditorError::PageOutOfRange {
                    page: list.page_index,
                    count: page_ids.len() as u32,
                })?;
            stamp_page(&mut doc, page_id, &list.commands)?;
            tracing::debug!(
                page = list.page_index,
                commands = list.commands.len(),
                "stamped page"
            );
        }

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| EditorError::OperationError(e.to_string()))?;

        Ok(output)
    }
}

/// Download name for the exported file.
pub fn export_file_name(original: Option<&str>) -> String {
    let stem = original
        .map(str::trim)
        .map(|name| {
            let lower = name.to_ascii_lowercase();
            if lower.ends_with(".pdf") {
                &name[..name.len() - 4]
            } else {
                name
            }
        })
        .filter(|stem| !stem.is_empty())
        .unwrap_or("document");
    format!("{}_edited.pdf", stem)
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    commands: &[DrawCommand],
) -> Result<(), EditorError> {
    let mut resources = effective_resources(doc, page_id);
    let mut ops = ContentWriter::default();
    ops.op("Q", vec![]);

    for cmd in commands {
        match cmd {
            DrawCommand::Text {
                text,
                x,
                y,
                size,
                font,
                color,
            } => {
                let name = ensure_font(&mut resources, *font)?;
                ops.text(&name, text, *x, *y, *size, *color);
            }
            DrawCommand::Line {
                start,
                end,
                thickness,
                color,
                opacity,
            } => {
                let gs = ensure_opacity(&mut resources, *opacity)?;
                ops.line(gs.as_deref(), *start, *end, *thickness, *color);
            }
            DrawCommand::Rectangle {
                x,
                y,
                width,
                height,
                color,
            } => ops.rectangle(*x, *y, *width, *height, *color),
            DrawCommand::Image {
                x,
                y,
                width,
                height,
                png,
            } => {
                let image_id = add_image(doc, png)?;
                let name = register_image(&mut resources, image_id)?;
                ops.image(&name, *x, *y, *width, *height);
            }
        }
    }

    let mut contents = existing_contents(doc, page_id);
    let open = encode_operations(vec![Operation::new("q", vec![])])?;
    let open = doc.add_object(Stream::new(Dictionary::new(), open));
    let stamp = doc.add_object(Stream::new(Dictionary::new(), ops.encode()?));
    contents.insert(0, Object::Reference(open));
    contents.push(Object::Reference(stamp));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| EditorError::OperationError(e.to_string()))?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Inherited page resources, copied inline so adding entries never touches
/// a dictionary shared with other pages.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut resources = inherited(doc, page_id, b"Resources")
        .and_then(|obj| resolve(doc, obj).as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);

    for key in RESOURCE_CATEGORIES {
        let inline = resources
            .get(key)
            .ok()
            .and_then(|obj| resolve(doc, obj).as_dict().ok())
            .cloned()
            .unwrap_or_else(Dictionary::new);
        resources.set(key, Object::Dictionary(inline));
    }
    resources
}

fn category<'a>(
    resources: &'a mut Dictionary,
    key: &[u8],
) -> Result<&'a mut Dictionary, EditorError> {
    resources
        .get_mut(key)
        .and_then(Object::as_dict_mut)
        .map_err(|e| EditorError::OperationError(e.to_string()))
}

fn existing_contents(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn ensure_font(resources: &mut Dictionary, font: StandardFont) -> Result<String, EditorError> {
    let name = match font {
        StandardFont::Helvetica => "ZnHelv",
        StandardFont::TimesRoman => "ZnTimes",
        StandardFont::Courier => "ZnCour",
    };
    let fonts = category(resources, b"Font")?;
    if !fonts.has(name.as_bytes()) {
        fonts.set(
            name,
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => WIN_ANSI,
            },
        );
    }
    Ok(name.to_string())
}

/// Opaque strokes need no graphics state.
fn ensure_opacity(resources: &mut Dictionary, opacity: f64) -> Result<Option<String>, EditorError> {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return Ok(None);
    }
    let name = format!("ZnA{}", (opacity * 100.0).round() as u32);
    let states = category(resources, b"ExtGState")?;
    if !states.has(name.as_bytes()) {
        states.set(
            name.as_str(),
            dictionary! {
                "Type" => "ExtGState",
                "CA" => Object::Real(opacity as _),
                "ca" => Object::Real(opacity as _),
            },
        );
    }
    Ok(Some(name))
}

fn register_image(resources: &mut Dictionary, image_id: ObjectId) -> Result<String, EditorError> {
    let xobjects = category(resources, b"XObject")?;
    let name = (0..)
        .map(|k| format!("ZnIm{}", k))
        .find(|name| !xobjects.has(name.as_bytes()))
        .unwrap_or_default();
    xobjects.set(name.as_str(), Object::Reference(image_id));
    Ok(name)
}

struct DecodedImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

fn decode_png(bytes: &[u8]) -> Result<DecodedImage, EditorError> {
    let image_err = |e: png::DecodingError| EditorError::ImageError(e.to_string());

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(image_err)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(image_err)?;
    let data = &buf[..frame.buffer_size()];

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(EditorError::ImageError(format!(
            "unsupported bit depth {:?}",
            frame.bit_depth
        )));
    }

    let (rgb, alpha) = match frame.color_type {
        png::ColorType::Rgb => (data.to_vec(), None),
        png::ColorType::Rgba => {
            let rgb = data.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect();
            let alpha = data.chunks_exact(4).map(|px| px[3]).collect();
            (rgb, Some(alpha))
        }
        png::ColorType::Grayscale => (data.iter().flat_map(|&g| [g, g, g]).collect(), None),
        png::ColorType::GrayscaleAlpha => {
            let rgb = data.chunks_exact(2).flat_map(|px| [px[0], px[0], px[0]]).collect();
            let alpha = data.chunks_exact(2).map(|px| px[1]).collect();
            (rgb, Some(alpha))
        }
        png::ColorType::Indexed => {
            return Err(EditorError::ImageError("indexed PNG was not expanded".into()))
        }
    };

    Ok(DecodedImage {
        width: frame.width,
        height: frame.height,
        rgb,
        alpha,
    })
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, EditorError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| EditorError::ImageError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EditorError::ImageError(e.to_string()))
}

fn add_image(doc: &mut Document, png: &[u8]) -> Result<ObjectId, EditorError> {
    let image = decode_png(png)?;
    let (width, height) = (i64::from(image.width), i64::from(image.height));

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if let Some(alpha) = image.alpha {
        let smask = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        let smask_id = doc.add_object(Stream::new(smask, deflate(&alpha)?));
        dict.set("SMask", Object::Reference(smask_id));
    }

    Ok(doc.add_object(Stream::new(dict, deflate(&image.rgb)?)))
}

/// Collects the operators of the stamped layer.
#[derive(Default)]
struct ContentWriter {
    operations: Vec<Operation>,
}

impl ContentWriter {
    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn text(&mut self, font: &str, text: &str, x: f64, y: f64, size: f64, color: Rgb) {
        self.op("BT", vec![]);
        self.op("Tf", vec![Object::Name(font.as_bytes().to_vec()), real(size)]);
        self.op("Td", vec![real(x), real(y)]);
        self.op("rg", rgb(color));
        self.op(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    fn line(&mut self, gs: Option<&str>, start: Point, end: Point, thickness: f64, color: Rgb) {
        self.op("q", vec![]);
        if let Some(gs) = gs {
            self.op("gs", vec![Object::Name(gs.as_bytes().to_vec())]);
        }
        self.op("RG", rgb(color));
        self.op("w", vec![real(thickness)]);
        self.op("J", vec![Object::Integer(1)]);
        self.op("m", vec![real(start.x), real(start.y)]);
        self.op("l", vec![real(end.x), real(end.y)]);
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.op("q", vec![]);
        self.op("rg", rgb(color));
        self.op("re", vec![real(x), real(y), real(width), real(height)]);
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }

    fn image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) {
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        );
        self.op("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.op("Q", vec![]);
    }

    fn encode(self) -> Result<Vec<u8>, EditorError> {
        encode_operations(self.operations)
    }
}

fn encode_operations(operations: Vec<Operation>) -> Result<Vec<u8>, EditorError> {
    Content { operations }
        .encode()
        .map_err(|e| EditorError::OperationError(format!("Content encode failed: {}", e)))
}

fn real(v: f64) -> Object {
    if v.is_finite() {
        Object::from(v)
    } else {
        Object::Integer(0)
    }
}

fn rgb(c: Rgb) -> Vec<Object> {
    vec![Object::from(c.r), Object::from(c.g), Object::from(c.b)]
}

/// Encode `text` for a WinAnsiEncoding font. Line breaks and other
/// whitespace become spaces; characters the encoding lacks become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut utf8 = [0u8; 4];
    for ch in text.chars() {
        let ch = if ch.is_whitespace() { ' ' } else { ch };
        let bytes = Document::encode_text(Some(WIN_ANSI), ch.encode_utf8(&mut utf8));
        if bytes.is_empty() {
            out.push(b'?');
        } else {
            out.extend(bytes);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, IdAllocator, InkStyle, ToolSettings, HIGHLIGHT_COLOR};
    use crate::document::fixtures::pdf_with_pages;
    use crate::flatten::flatten;
    use crate::geometry::Rect;
    use crate::signature::placeholder_data_uri;
    use lopdf::content::Content;
    use pretty_assertions::assert_eq;

    fn stamped_ops(pdf: &[u8], page: u32) -> Vec<(String, Vec<Object>)> {
        let doc = Document::load_mem(pdf).unwrap();
        let page_id = doc.get_pages()[&page];
        let content = doc.get_page_content(page_id).unwrap();
        Content::decode(&content)
            .unwrap()
            .operations
            .into_iter()
            .map(|op| (op.operator, op.operands))
            .collect()
    }

    fn page_resources(pdf: &[u8], page: u32) -> (Document, Dictionary) {
        let doc = Document::load_mem(pdf).unwrap();
        let page_id = doc.get_pages()[&page];
        let res = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Resources")
            .unwrap()
            .as_dict()
            .unwrap()
            .clone();
        (doc, res)
    }

    fn operand_num(obj: &Object) -> f64 {
        crate::document::number(obj).unwrap()
    }

    #[test]
    fn test_empty_draw_list_returns_original() {
        let pdf = pdf_with_pages(&[(612, 792)]);
        let out = LopdfExporter.export(&pdf, &[]).unwrap();
        assert_eq!(out, pdf);
    }

    #[test]
    fn test_text_round_trip_position() {
        let pdf = pdf_with_pages(&[(612, 800)]);
        let mut ids = IdAllocator::new();
        let set = vec![Annotation::text(
            ids.next(),
            0,
            Point::new(50.0, 100.0),
            "Total (net)",
            &ToolSettings::default(),
        )];
        let lists = flatten(&set, &[800.0]).unwrap();
        let out = LopdfExporter.export(&pdf, &lists).unwrap();

        let ops = stamped_ops(&out, 1);
        let td = ops.iter().find(|(op, _)| op == "Td").unwrap();
        assert_eq!(operand_num(&td.1[0]), 50.0);
        assert_eq!(operand_num(&td.1[1]), 684.0);

        let tj = ops.iter().find(|(op, _)| op == "Tj").unwrap();
        assert_eq!(tj.1[0].as_str().unwrap(), b"Total (net)");

        let tf = ops.iter().find(|(op, _)| op == "Tf").unwrap();
        assert_eq!(tf.1[0].as_name().unwrap(), b"ZnHelv");
        assert_eq!(operand_num(&tf.1[1]), 16.0);

        let (_, res) = page_resources(&out, 1);
        let font = res
            .get(b"Font")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"ZnHelv")
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
    }

    #[test]
    fn test_stamp_is_wrapped_in_saved_state() {
        let pdf = pdf_with_pages(&[(612, 792)]);
        let set = vec![Annotation::rectangle(
            IdAllocator::new().next(),
            0,
            Rect::new(10.0, 10.0, 20.0, 20.0),
            "#ffffff",
        )];
        let lists = flatten(&set, &[792.0]).unwrap();
        let out = LopdfExporter.export(&pdf, &lists).unwrap();

        let operators: Vec<String> = stamped_ops(&out, 1).into_iter().map(|(op, _)| op).collect();
        assert_eq!(operators.first().map(String::as_str), Some("q"));
        assert_eq!(operators.get(1).map(String::as_str), Some("Q"));
        assert!(operators.contains(&"re".to_string()));
        assert!(operators.contains(&"f".to_string()));
    }

    #[test]
    fn test_highlight_uses_opacity_state() {
        let pdf = pdf_with_pages(&[(612, 100)]);
        let set = vec![Annotation::ink(
            IdAllocator::new().next(),
            0,
            InkStyle::Highlight,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            HIGHLIGHT_COLOR.to_string(),
        )];
        let lists = flatten(&set, &[100.0]).unwrap();
        let out = LopdfExporter.export(&pdf, &lists).unwrap();

        let ops = stamped_ops(&out, 1);
        assert_eq!(ops.iter().filter(|(op, _)| op == "S").count(), 2);
        let gs = ops.iter().find(|(op, _)| op == "gs").unwrap();
        assert_eq!(gs.1[0].as_name().unwrap(), b"ZnA40");
        let w = ops.iter().find(|(op, _)| op == "w").unwrap();
        assert_eq!(operand_num(&w.1[0]), 10.0);

        let (_, res) = page_resources(&out, 1);
        let state = res
            .get(b"ExtGState")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"ZnA40")
            .unwrap()
            .as_dict()
            .unwrap();
        assert!((operand_num(state.get(b"CA").unwrap()) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_signature_embeds_image_with_soft_mask() {
        let pdf = pdf_with_pages(&[(612, 792)]);
        let set = vec![Annotation::signature(
            IdAllocator::new().next(),
            0,
            Rect::new(100.0, 100.0, 150.0, 60.0),
            placeholder_data_uri().unwrap(),
        )];
        let lists = flatten(&set, &[792.0]).unwrap();
        let out = LopdfExporter.export(&pdf, &lists).unwrap();

        let ops = stamped_ops(&out, 1);
        let cm = ops.iter().find(|(op, _)| op == "cm").unwrap();
        let cm: Vec<f64> = cm.1.iter().map(operand_num).collect();
        assert_eq!(cm, vec![150.0, 0.0, 0.0, 60.0, 100.0, 632.0]);

        let (doc, res) = page_resources(&out, 1);
        let image_id = res
            .get(b"XObject")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"ZnIm0")
            .unwrap()
            .as_reference()
            .unwrap();
        let image = doc.get_object(image_id).unwrap().as_stream().unwrap();
        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 200);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 80);
        assert!(image.dict.has(b"SMask"));
    }

    #[test]
    fn test_only_touched_pages_change() {
        let pdf = pdf_with_pages(&[(612, 792), (612, 792)]);
        let set = vec![Annotation::rectangle(
            IdAllocator::new().next(),
            1,
            Rect::new(0.0, 0.0, 5.0, 5.0),
            "#000000",
        )];
        let lists = flatten(&set, &[792.0, 792.0]).unwrap();
        let out = LopdfExporter.export(&pdf, &lists).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let pages = doc.get_pages();
        assert!(!doc.get_dictionary(pages[&1]).unwrap().has(b"Contents"));
        assert!(doc.get_dictionary(pages[&2]).unwrap().has(b"Contents"));
    }

    #[test]
    fn test_draw_list_for_missing_page() {
        let pdf = pdf_with_pages(&[(612, 792)]);
        let lists = vec![PageDrawList {
            page_index: 3,
            commands: vec![DrawCommand::Rectangle {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
                color: Rgb::from_hex("#000000"),
            }],
        }];
        assert!(matches!(
            LopdfExporter.export(&pdf, &lists),
            Err(EditorError::PageOutOfRange { page: 3, count: 1 })
        ));
    }

    #[test]
    fn test_win_ansi_text_encoding() {
        assert_eq!(win_ansi("don\u{2019}t \u{2014} \u{20ac}5"), b"don\x92t \x97 \x805");
        assert_eq!(win_ansi("caf\u{e9}\nok"), b"caf\xe9 ok");
        assert_eq!(win_ansi("\u{201c}q\u{201d}"), b"\x93q\x94");
        assert_eq!(win_ansi("\u{6f22}a"), b"?a");
    }

    #[test]
    fn test_text_operands_survive_encoding() {
        let mut w = ContentWriter::default();
        w.text("F", "a\\b(c)\u{2019}", 0.0, 0.0, 12.0, Rgb::from_hex("#000000"));
        let encoded = w.encode().unwrap();

        let content = Content::decode(&encoded).unwrap();
        let tj = content.operations.iter().find(|op| op.operator == "Tj").unwrap();
        assert_eq!(tj.operands[0].as_str().unwrap(), b"a\\b(c)\x92");
    }

    #[test]
    fn test_non_finite_operands_become_zero() {
        assert_eq!(real(f64::NAN), Object::Integer(0));
        assert_eq!(real(f64::INFINITY), Object::Integer(0));
        assert_eq!(operand_num(&real(684.0)), 684.0);
    }

    #[test]
    fn test_export_is_deterministic() {
        let pdf = pdf_with_pages(&[(612, 792), (612, 792)]);
        let mut ids = IdAllocator::new();
        let set = vec![
            Annotation::text(
                ids.next(),
                0,
                Point::new(40.0, 60.0),
                "Net 30",
                &ToolSettings::default(),
            ),
            Annotation::ink(
                ids.next(),
                1,
                InkStyle::Highlight,
                vec![Point::new(0.0, 0.0), Point::new(30.0, 5.0)],
                HIGHLIGHT_COLOR.to_string(),
            ),
            Annotation::rectangle(ids.next(), 1, Rect::new(5.0, 5.0, 20.0, 10.0), "#ffffff"),
            Annotation::signature(
                ids.next(),
                0,
                Rect::new(100.0, 100.0, 150.0, 60.0),
                placeholder_data_uri().unwrap(),
            ),
        ];
        let heights = [792.0, 792.0];

        let first = LopdfExporter
            .export(&pdf, &flatten(&set, &heights).unwrap())
            .unwrap();
        let second = LopdfExporter
            .export(&pdf, &flatten(&set, &heights).unwrap())
            .unwrap();

        for page in [1, 2] {
            assert_eq!(stamped_ops(&first, page), stamped_ops(&second, page));
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(Some("contract.pdf")), "contract_edited.pdf");
        assert_eq!(export_file_name(Some("Scan.PDF")), "Scan_edited.pdf");
        assert_eq!(export_file_name(Some("notes")), "notes_edited.pdf");
        assert_eq!(export_file_name(Some("")), "document_edited.pdf");
        assert_eq!(export_file_name(None), "document_edited.pdf");
    }
}
