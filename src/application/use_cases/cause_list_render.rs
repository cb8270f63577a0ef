use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::domain::cause_list::CauseList;
use crate::domain::error::{AppError, Result};

// US Letter, in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const FONT_SIZE: i64 = 12;
const LEFT_MARGIN: i64 = 100;
const TOP_Y: i64 = 750;
const FIRST_CASE_Y: i64 = 700;
const CASE_SPACING: i64 = 40;
const PARTIES_OFFSET: i64 = 15;
const BOTTOM_Y: i64 = 100;

/// Lays out a cause list as lines of text per page: `(x, y, text)`.
fn layout_pages(list: &CauseList) -> Vec<Vec<(i64, i64, String)>> {
    let mut pages = Vec::new();
    let mut current = vec![
        (LEFT_MARGIN, TOP_Y, format!("{} - Cause List", list.court)),
        (LEFT_MARGIN, TOP_Y - 20, format!("Date: {}", list.date)),
    ];

    let mut y = FIRST_CASE_Y;
    for case in &list.cases {
        current.push((
            LEFT_MARGIN,
            y,
            format!("{} - {}", case.case_number, case.case_type),
        ));
        current.push((
            LEFT_MARGIN,
            y - PARTIES_OFFSET,
            format!("Parties: {}", case.parties),
        ));
        y -= CASE_SPACING;
        if y < BOTTOM_Y {
            pages.push(std::mem::take(&mut current));
            y = TOP_Y;
        }
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

pub fn render_cause_list_pdf(list: &CauseList) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in layout_pages(list) {
        let page_id = add_page(&mut doc, pages_id, &lines)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0i64.into(), 0i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::PdfError(format!("Failed to write PDF: {}", e)))?;
    Ok(buffer)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, lines: &[(i64, i64, String)]) -> Result<ObjectId> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for (x, y, text) in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(text.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| AppError::PdfError(format!("Failed to encode page content: {}", e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

pub fn render_cause_list_html(list: &CauseList) -> String {
    let court = escape_html(&list.court);
    let date = escape_html(&list.date);
    let rows: String = list
        .cases
        .iter()
        .map(|case| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&case.case_number),
                escape_html(&case.case_type),
                escape_html(&case.parties)
            )
        })
        .collect();

    format!(
        r#"<html>
<head>
    <title>Cause List - {court}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        h1 {{ color: #2c3e50; text-align: center; }}
        table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
        th, td {{ border: 1px solid #ddd; padding: 12px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
    </style>
</head>
<body>
    <h1>{court} - Cause List</h1>
    <h2>Date: {date}</h2>
    <table>
        <tr>
            <th>Case Number</th>
            <th>Case Type</th>
            <th>Parties</th>
        </tr>
        {rows}
    </table>
</body>
</html>
"#
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
