//! Reads slide tables straight out of a `.pptx` package.
//!
//! Only the parts needed for status tables are touched: the slide ordering in
//! `ppt/presentation.xml` (through its relationships) and the first slide's
//! top-level shapes. Tables come from
//! `p:graphicFrame/a:graphic/a:graphicData/a:tbl`; run colors come from
//! `a:rPr/a:solidFill/a:srgbClr`. Theme colors are treated as uncolored.

use std::io::{Cursor, Read};

use roxmltree::Node;
use tracing::debug;
use zip::ZipArchive;

use crate::core::errors::{AppError, AppResult};
use crate::core::types::Rgb;
use crate::slides::table::{RawParagraph, RawRun, SlideTable, TableCell, TableRow};

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const SLIDE_REL_TYPE_SUFFIX: &str = "/slide";

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub tables: Vec<SlideTable>,
}

type Package = ZipArchive<Cursor<Vec<u8>>>;

/// Opens a package and parses its first slide, or `None` when it has no slides.
pub fn read_first_slide(bytes: &[u8]) -> AppResult<Option<Slide>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec()))?;
    let slide_paths = slide_order(&mut archive)?;
    debug!(slides = slide_paths.len(), "resolved slide order");

    let Some(first) = slide_paths.first() else {
        return Ok(None);
    };
    let xml = read_part(&mut archive, first)?
        .ok_or_else(|| AppError::Extraction(format!("{first} missing from package")))?;
    parse_slide(&xml).map(Some)
}

/// Parses one slide part (`ppt/slides/slideN.xml`). Only shapes sitting
/// directly in `p:cSld/p:spTree` count; grouped shapes are ignored.
pub fn parse_slide(xml: &str) -> AppResult<Slide> {
    let doc = roxmltree::Document::parse(xml)?;
    let Some(tree) = child(doc.root_element(), "cSld").and_then(|c| child(c, "spTree")) else {
        return Ok(Slide {
            title: UNTITLED.to_string(),
            tables: Vec::new(),
        });
    };

    let title = children(tree, "sp")
        .filter_map(|shape| child(shape, "txBody"))
        .map(text_body_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let tables = children(tree, "graphicFrame")
        .filter_map(|frame| child(child(frame, "graphic")?, "graphicData"))
        .flat_map(|data| children(data, "tbl"))
        .map(parse_table)
        .collect();

    Ok(Slide { title, tables })
}

fn slide_order(archive: &mut Package) -> AppResult<Vec<String>> {
    let presentation = read_part(archive, "ppt/presentation.xml")?;
    let rels = read_part(archive, "ppt/_rels/presentation.xml.rels")?;

    match (presentation, rels) {
        (Some(presentation), Some(rels)) => ordered_slides(&presentation, &rels),
        _ => Ok(slides_by_name(archive)),
    }
}

fn ordered_slides(presentation_xml: &str, rels_xml: &str) -> AppResult<Vec<String>> {
    let rels = roxmltree::Document::parse(rels_xml)?;
    let targets: Vec<(&str, &str)> = rels
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
        .filter(|n| {
            n.attribute("Type")
                .map(|kind| kind.ends_with(SLIDE_REL_TYPE_SUFFIX))
                .unwrap_or(false)
        })
        .filter_map(|n| Some((n.attribute("Id")?, n.attribute("Target")?)))
        .collect();

    let presentation = roxmltree::Document::parse(presentation_xml)?;
    let paths = presentation
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "sldId")
        .filter_map(|n| n.attribute((REL_NS, "id")))
        .filter_map(|rel_id| {
            targets
                .iter()
                .find(|(id, _)| *id == rel_id)
                .map(|(_, target)| resolve_target(target))
        })
        .collect();
    Ok(paths)
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target.trim_start_matches("./")),
    }
}

/// Fallback ordering for packages without presentation parts: `slideN.xml` by N.
fn slides_by_name(archive: &Package) -> Vec<String> {
    let mut numbered: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    numbered.sort();
    numbered.into_iter().map(|(_, name)| name).collect()
}

fn read_part(archive: &mut Package, name: &str) -> AppResult<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Extraction(format!("cannot read {name}: {e}")))?;
    Ok(Some(xml))
}

fn parse_table(tbl: Node<'_, '_>) -> SlideTable {
    let columns = child(tbl, "tblGrid")
        .map(|grid| children(grid, "gridCol").count())
        .unwrap_or(0);
    let rows = children(tbl, "tr")
        .map(|tr| TableRow {
            cells: children(tr, "tc").map(parse_cell).collect(),
        })
        .collect();
    SlideTable { columns, rows }
}

fn parse_cell(tc: Node<'_, '_>) -> TableCell {
    let paragraphs = child(tc, "txBody")
        .map(|body| children(body, "p").map(parse_paragraph).collect())
        .unwrap_or_default();
    TableCell { paragraphs }
}

fn parse_paragraph(p: Node<'_, '_>) -> RawParagraph {
    let runs = children(p, "r")
        .map(|r| RawRun {
            text: run_text(r),
            color: run_color(r),
        })
        .collect();
    RawParagraph { runs }
}

fn run_text(r: Node<'_, '_>) -> String {
    children(r, "t").filter_map(|t| t.text()).collect()
}

fn run_color(r: Node<'_, '_>) -> Option<Rgb> {
    let fill = child(child(r, "rPr")?, "solidFill")?;
    Rgb::from_hex(child(fill, "srgbClr")?.attribute("val")?)
}

/// Plain text of a shape's text body: paragraphs joined with newlines.
fn text_body_text(body: Node<'_, '_>) -> String {
    children(body, "p")
        .map(|p| {
            p.descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "t")
                .filter_map(|t| t.text())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}
