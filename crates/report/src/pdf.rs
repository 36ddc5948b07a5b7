//! PDF layout
//!
//! A4 pages, Helvetica, one heading per page and a fixed-leading line grid.

use crate::{ReportData, ReportError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: i64 = 50;
const TITLE_Y: i64 = 800;
const FIRST_LINE_Y: i64 = 770;
const LEADING: i64 = 16;
const LINES_PER_PAGE: usize = 45;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 10;

/// Render a report to PDF bytes.
///
/// # Errors
///
/// Returns [`ReportError::Pdf`] when content encoding or serialization
/// fails.
pub fn render(data: &ReportData) -> Result<Vec<u8>, ReportError> {
    let (title, lines) = layout_lines(data);

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();

    // At least one page, even for an empty report.
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    for chunk in &chunks {
        let content = page_content(&title, chunk);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(0);
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    Ok(bytes)
}

/// Flatten the report data into a heading plus one line per row
fn layout_lines(data: &ReportData) -> (String, Vec<String>) {
    match data {
        ReportData::Inventory { title, files } => {
            let mut lines = Vec::with_capacity(files.len() + 1);
            lines.push(format!("{} file(s)", files.len()));
            for file in files {
                let modified = file
                    .last_modified
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                lines.push(format!("{}  {} bytes  {}", file.key, file.size, modified));
            }
            (title.clone(), lines)
        }
        ReportData::Operations { entries } => {
            let mut lines = Vec::with_capacity(entries.len() + 1);
            lines.push(format!("{} entries, newest first", entries.len()));
            for entry in entries {
                lines.push(format!(
                    "{}  {} ({})  {}",
                    entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.username,
                    entry.role,
                    entry.action
                ));
            }
            ("Operation Log".to_string(), lines)
        }
    }
}

/// Content stream for one page: heading plus a column of body lines
fn page_content(title: &str, lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), TITLE_SIZE.into()]),
        Operation::new("Td", vec![MARGIN_LEFT.into(), TITLE_Y.into()]),
        Operation::new("Tj", vec![Object::string_literal(title)]),
        Operation::new("ET", vec![]),
    ];

    let mut y = FIRST_LINE_Y;
    for line in lines {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]),
            Operation::new("Td", vec![MARGIN_LEFT.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(line.as_str())]),
            Operation::new("ET", vec![]),
        ]);
        y -= LEADING;
    }

    Content { operations }
}
