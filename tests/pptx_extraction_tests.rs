mod common;

use std::io::{Cursor, Write};

use common::{cell, header_row, pptx, pptx_with_order, run, slide, status_deck, table, text_cell};
use statusdeck_lib::core::config::{AppConfig, ExtractOptions};
use statusdeck_lib::core::types::Rgb;
use statusdeck_lib::forest::builder::{
    extract_document, extract_document_file, NO_SLIDES_ERROR, NO_SLIDES_TITLE, NO_TABLE_DATA_ERROR,
};
use statusdeck_lib::forest::node::ProjectNode;
use statusdeck_lib::slides::pptx::{parse_slide, read_first_slide, UNTITLED};
use tempfile::NamedTempFile;
use zip::write::FileOptions;

#[test]
fn first_slide_table_is_read_with_run_colors() {
    let bytes = status_deck(
        "CRA Service Cyber",
        &[(
            "SOC",
            vec![
                run("Déploiement ", None),
                run("terminé", Some("00B050")),
                run(" audit ", None),
                run("en retard", Some("FF0000")),
            ],
            "Comité sécurité prévu le 14",
        )],
    );

    let slide = read_first_slide(&bytes).expect("package").expect("one slide");

    assert_eq!(slide.title, "CRA Service Cyber");
    assert_eq!(slide.tables.len(), 1);
    assert_eq!(slide.tables[0].columns, 3);
    let runs = &slide.tables[0].rows[1].cells[1].paragraphs[0].runs;
    assert_eq!(runs.len(), 4);
    assert_eq!(runs[1].color, Some(Rgb(0, 176, 80)));
    assert_eq!(runs[3].color, Some(Rgb(255, 0, 0)));
    assert_eq!(runs[0].color, None);
}

#[test]
fn extract_document_builds_the_forest_from_the_first_slide() {
    let bytes = status_deck(
        "CRA Service Cyber",
        &[
            (
                "SOC",
                vec![run("Déploiement ", None), run("terminé", Some("00B050"))],
                "Comité sécurité prévu le 14",
            ),
            (
                "SOC Supervision",
                vec![run("à surveiller", Some("FFA500"))],
                "",
            ),
        ],
    );

    let forest = extract_document(&bytes, ExtractOptions::default());

    assert!(forest.metadata.error.is_none(), "{:?}", forest.metadata.error);
    assert_eq!(forest.metadata.title, "CRA Service Cyber");
    assert_eq!(
        forest.metadata.collected_upcoming_events,
        vec!["Comité sécurité prévu le 14"]
    );
    let soc = forest.projects.get("SOC").expect("SOC");
    assert!(matches!(soc, ProjectNode::Mixed { .. }));
    assert_eq!(
        soc.status().map(|s| s.advancements.clone()),
        Some(vec!["terminé".to_string()])
    );
    let supervision = soc.child("Supervision").and_then(ProjectNode::status).expect("child");
    assert_eq!(supervision.small, vec!["à surveiller"]);
}

#[test]
fn slide_order_follows_the_presentation_list() {
    let first_stored = slide("Stored first", &[]);
    let shown_first = slide(
        "Shown first",
        &[table(3, &[header_row(), vec![text_cell("A"), text_cell("a"), text_cell("")]])],
    );

    let bytes = pptx_with_order(&[first_stored, shown_first], &[1, 0]);
    let slide = read_first_slide(&bytes).expect("package").expect("slide");

    assert_eq!(slide.title, "Shown first");
    assert_eq!(slide.tables.len(), 1);
}

#[test]
fn packages_without_presentation_parts_fall_back_to_slide_numbers() {
    let cursor = Cursor::new(Vec::<u8>::new());
    let mut zip = zip::ZipWriter::new(cursor);
    let options: FileOptions<'_, ()> = FileOptions::default();
    for (name, title) in [("slide10.xml", "Ten"), ("slide2.xml", "Two")] {
        zip.start_file(format!("ppt/slides/{name}"), options)
            .expect("start slide");
        zip.write_all(slide(title, &[]).as_bytes()).expect("write slide");
    }
    let bytes = zip.finish().expect("finish zip").into_inner();

    let slide = read_first_slide(&bytes).expect("package").expect("slide");

    assert_eq!(slide.title, "Two");
}

#[test]
fn narrow_tables_are_skipped_next_to_status_tables() {
    let legend = table(2, &[vec![text_cell("Légende"), text_cell("couleurs")]]);
    let status = table(
        3,
        &[
            header_row(),
            vec![
                text_cell("RH"),
                cell(&[&[run("Recrutement bloqué", Some("C00000"))]]),
                text_cell(""),
            ],
        ],
    );
    let bytes = pptx(&[slide("CRA RH", &[legend, status])]);

    let forest = extract_document(&bytes, ExtractOptions::default());

    assert!(forest.metadata.error.is_none());
    let rh = forest.projects.get("RH").and_then(ProjectNode::status).expect("RH");
    assert_eq!(rh.critical, vec!["Recrutement bloqué"]);
}

#[test]
fn slide_without_table_rows_reports_no_table_data() {
    let bytes = pptx(&[slide("Vide", &[table(3, &[header_row()])])]);

    let forest = extract_document(&bytes, ExtractOptions::default());

    assert!(forest.projects.is_empty());
    assert_eq!(forest.metadata.title, "Vide");
    assert_eq!(forest.metadata.error.as_deref(), Some(NO_TABLE_DATA_ERROR));
}

#[test]
fn presentation_without_slides_reports_no_slides() {
    let bytes = pptx(&[]);

    let forest = extract_document(&bytes, ExtractOptions::default());

    assert!(forest.projects.is_empty());
    assert_eq!(forest.metadata.title, NO_SLIDES_TITLE);
    assert_eq!(forest.metadata.error.as_deref(), Some(NO_SLIDES_ERROR));
}

#[test]
fn corrupt_package_is_recorded_not_raised() {
    let forest = extract_document(b"definitely not a zip", ExtractOptions::default());

    assert!(forest.projects.is_empty());
    assert_eq!(forest.metadata.title, "Error");
    assert!(forest
        .metadata
        .error
        .as_deref()
        .unwrap_or_default()
        .starts_with("Error processing presentation"));
}

#[test]
fn slide_without_title_shape_is_untitled() {
    let xml = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree/></p:cSld></p:sld>"#;

    let slide = parse_slide(xml).expect("slide xml");

    assert_eq!(slide.title, UNTITLED);
    assert!(slide.tables.is_empty());
}

#[test]
fn extract_document_file_checks_size_and_presence() {
    let bytes = status_deck("CRA", &[("Cyber", vec![run("ok", Some("00FF00"))], "")]);
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&bytes).expect("write deck");

    let config = AppConfig::default();
    let forest = extract_document_file(file.path(), &config).expect("readable deck");
    let cyber = forest.projects.get("Cyber").and_then(ProjectNode::status).expect("Cyber");
    assert_eq!(cyber.advancements, vec!["ok"]);

    let tiny = AppConfig {
        max_file_size_mb: 0,
        ..AppConfig::default()
    };
    let err = extract_document_file(file.path(), &tiny).expect_err("over the size limit");
    assert_eq!(err.code(), "INVALID_INPUT");

    let missing = file.path().with_extension("missing.pptx");
    let err = extract_document_file(&missing, &config).expect_err("missing file");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn grouped_shapes_are_not_read() {
    let grouped_table = table(4, &[vec![text_cell("Légende"); 4]]);
    let status = table(3, &[header_row()]);
    let xml = format!(
        r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:grpSp><p:sp><p:txBody><a:p><a:r><a:t>Groupe</a:t></a:r></a:p></p:txBody></p:sp>{grouped_table}</p:grpSp><p:sp><p:txBody><a:p><a:r><a:t>CRA Data</a:t></a:r></a:p></p:txBody></p:sp>{status}</p:spTree></p:cSld></p:sld>"#
    );

    let slide = parse_slide(&xml).expect("slide xml");

    assert_eq!(slide.title, "CRA Data");
    assert_eq!(slide.tables.len(), 1);
    assert_eq!(slide.tables[0].columns, 3);
}
