#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;

const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const MASTER_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

pub fn run(text: &str, color: Option<&str>) -> String {
    match color {
        Some(hex) => format!(
            r#"<a:r><a:rPr lang="fr-FR"><a:solidFill><a:srgbClr val="{hex}"/></a:solidFill></a:rPr><a:t>{text}</a:t></a:r>"#
        ),
        None => format!(r#"<a:r><a:rPr lang="fr-FR"/><a:t>{text}</a:t></a:r>"#),
    }
}

/// A cell with one paragraph per entry of `paragraphs`, each a list of runs.
pub fn cell(paragraphs: &[&[String]]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|runs| format!("<a:p>{}</a:p>", runs.concat()))
        .collect();
    format!("<a:tc><a:txBody><a:bodyPr/>{body}</a:txBody></a:tc>")
}

pub fn text_cell(text: &str) -> String {
    if text.is_empty() {
        return cell(&[&[]]);
    }
    cell(&[&[run(text, None)]])
}

pub fn table(columns: usize, rows: &[Vec<String>]) -> String {
    let grid: String = (0..columns).map(|_| r#"<a:gridCol w="3048000"/>"#).collect();
    let body: String = rows
        .iter()
        .map(|cells| format!(r#"<a:tr h="370840">{}</a:tr>"#, cells.concat()))
        .collect();
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="Tableau"/></p:nvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
    )
}

pub fn header_row() -> Vec<String> {
    vec![
        text_cell("Projet"),
        text_cell("Informations"),
        text_cell("Événements"),
    ]
}

pub fn slide(title: &str, shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:spTree>
      <p:sp><p:nvSpPr><p:cNvPr id="2" name="Titre"/></p:nvSpPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>{title}</a:t></a:r></a:p></p:txBody></p:sp>
      {}
    </p:spTree>
  </p:cSld>
</p:sld>"#,
        shapes.concat()
    )
}

/// Package with `slides` stored as `slideN.xml` in order and listed in
/// `presentation.xml` following `order` (indices into `slides`).
pub fn pptx_with_order(slides: &[String], order: &[usize]) -> Vec<u8> {
    let cursor = Cursor::new(Vec::<u8>::new());
    let mut zip = zip::ZipWriter::new(cursor);
    let options: FileOptions<'_, ()> = FileOptions::default();

    let ids: String = order
        .iter()
        .enumerate()
        .map(|(pos, idx)| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + pos, idx + 10))
        .collect();
    zip.start_file("ppt/presentation.xml", options)
        .expect("start presentation");
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#
        )
        .as_bytes(),
    )
    .expect("write presentation");

    let rels: String = (0..slides.len())
        .map(|idx| {
            format!(
                r#"<Relationship Id="rId{}" Type="{SLIDE_REL}" Target="slides/slide{}.xml"/>"#,
                idx + 10,
                idx + 1
            )
        })
        .collect();
    zip.start_file("ppt/_rels/presentation.xml.rels", options)
        .expect("start rels");
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{MASTER_REL}" Target="slideMasters/slideMaster1.xml"/>{rels}</Relationships>"#
        )
        .as_bytes(),
    )
    .expect("write rels");

    for (idx, xml) in slides.iter().enumerate() {
        zip.start_file(format!("ppt/slides/slide{}.xml", idx + 1), options)
            .expect("start slide");
        zip.write_all(xml.as_bytes()).expect("write slide");
    }

    zip.finish().expect("finish zip").into_inner()
}

pub fn pptx(slides: &[String]) -> Vec<u8> {
    let order: Vec<usize> = (0..slides.len()).collect();
    pptx_with_order(slides, &order)
}

/// Single-slide deck with one status table; each row is
/// `(name, information runs, events)`.
pub fn status_deck(title: &str, rows: &[(&str, Vec<String>, &str)]) -> Vec<u8> {
    let mut table_rows = vec![header_row()];
    for (name, info_runs, events) in rows {
        table_rows.push(vec![
            text_cell(name),
            cell(&[info_runs.as_slice()]),
            text_cell(events),
        ]);
    }
    pptx(&[slide(title, &[table(3, &table_rows)])])
}

pub fn write_deck(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write deck");
    path
}
