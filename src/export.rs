use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::Workbook;
use tracing::debug;

use crate::error::Result;
use crate::models::{ExportArtifact, ExportFormat, StudentRecord};

pub const COLUMN_HEADERS: [&str; 6] = [
    "StudentID",
    "Name",
    "Department",
    "Attendance Percentage",
    "Average Marks",
    "Risk Status",
];

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const ROW_STEP_MM: f32 = 7.0;
const COLUMN_X_MM: [f32; 6] = [14.0, 36.0, 86.0, 116.0, 146.0, 174.0];

/// Builds an export artifact for the current view. The generation step is
/// pure; writing the bytes to disk is the caller's concern.
pub fn export(view: &[StudentRecord], format: ExportFormat) -> Result<ExportArtifact> {
    let rows = project_rows(view);
    let bytes = match format {
        ExportFormat::Csv => csv_bytes(&rows)?,
        ExportFormat::Xlsx => xlsx_bytes(&rows)?,
        ExportFormat::Pdf => pdf_bytes(&rows)?,
    };

    debug!(
        format = format.extension(),
        rows = rows.len(),
        bytes = bytes.len(),
        "built export artifact"
    );

    Ok(ExportArtifact {
        bytes,
        filename: format!("student_risk_data.{}", format.extension()),
        format,
    })
}

/// The one canonical row projection shared by every serializer. Column order
/// and two-decimal formatting must never drift between formats.
pub fn project_rows(view: &[StudentRecord]) -> Vec<[String; 6]> {
    view.iter()
        .map(|record| {
            [
                record.student_id.to_string(),
                record.name.clone(),
                record.department.clone(),
                format!("{:.2}", record.attendance_percentage),
                format!("{:.2}", record.average_marks),
                record.risk_status().to_string(),
            ]
        })
        .collect()
}

fn csv_bytes(rows: &[[String; 6]]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(COLUMN_HEADERS)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Flattened (row, column, text) cell placements for the workbook, header
/// row first. Every cell the worksheet receives comes through here.
fn worksheet_cells(rows: &[[String; 6]]) -> Vec<(u32, u16, &str)> {
    let mut cells = Vec::with_capacity((rows.len() + 1) * 6);
    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        cells.push((0, col as u16, *header));
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            cells.push((i as u32 + 1, col as u16, cell.as_str()));
        }
    }
    cells
}

fn xlsx_bytes(rows: &[[String; 6]]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Students")?;

    for (row, col, text) in worksheet_cells(rows) {
        worksheet.write_string(row, col, text)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Splits the body rows across pages, pairing each row with its baseline y
/// position. Every page additionally repeats the header line at the top
/// margin. An empty view yields one page with no body rows.
fn layout_pages(rows: &[[String; 6]]) -> Vec<Vec<(f32, &[String; 6])>> {
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM - ROW_STEP_MM;

    for row in rows {
        if y < MARGIN_MM {
            pages.push(std::mem::take(&mut current));
            y = PAGE_HEIGHT_MM - MARGIN_MM - ROW_STEP_MM;
        }
        current.push((y, row));
        y -= ROW_STEP_MM;
    }

    pages.push(current);
    pages
}

fn pdf_bytes(rows: &[[String; 6]]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Student Risk Data",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "table",
    );
    let body_font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let head_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    for (index, page_rows) in layout_pages(rows).iter().enumerate() {
        if index > 0 {
            let (page, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "table");
            layer = doc.get_page(page).get_layer(layer_index);
        }

        write_header(&layer, &head_font, PAGE_HEIGHT_MM - MARGIN_MM);
        for (y, row) in page_rows {
            for (cell, x) in row.iter().zip(COLUMN_X_MM) {
                layer.use_text(cell.as_str(), 9.0, Mm(x), Mm(*y), &body_font);
            }
        }
    }

    Ok(doc.save_to_bytes()?)
}

fn write_header(layer: &PdfLayerReference, font: &IndirectFontRef, y: f32) {
    for (header, x) in COLUMN_HEADERS.iter().zip(COLUMN_X_MM) {
        layer.use_text(*header, 9.0, Mm(x), Mm(y), font);
    }
}
