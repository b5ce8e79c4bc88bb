use printpdf::image_crate::{load_from_memory, DynamicImage, GenericImageView};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::models::{ExportArtifact, ExportFormat, StudentId};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const DPI: f32 = 300.0;

/// Decodes a rasterized report region. The bytes come from whatever captured
/// the on-screen report; if they are not a decodable image the export is
/// aborted rather than composing an empty document.
pub fn capture(region: &[u8]) -> Result<DynamicImage> {
    load_from_memory(region).map_err(|e| PipelineError::Rasterization(e.to_string()))
}

/// Embeds a captured report image into a single-page PDF, scaled to the full
/// page width with proportional height, anchored at the top of the page.
pub fn compose(image: &DynamicImage, student_id: &StudentId) -> Result<ExportArtifact> {
    let (width_px, height_px) = image.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(PipelineError::Rasterization(
            "captured region has zero area".to_string(),
        ));
    }

    let (doc, page, layer_index) = PdfDocument::new(
        format!("Student {student_id} Report"),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "snapshot",
    );
    let layer = doc.get_page(page).get_layer(layer_index);

    let natural_width_mm = width_px as f32 * 25.4 / DPI;
    let scale = PAGE_WIDTH_MM / natural_width_mm;
    let scaled_height_mm = height_px as f32 * 25.4 / DPI * scale;

    debug!(width_px, height_px, scale, "composing snapshot page");

    let pdf_image = Image::from_dynamic_image(image);
    pdf_image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - scaled_height_mm)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(DPI),
            ..Default::default()
        },
    );

    Ok(ExportArtifact {
        bytes: doc.save_to_bytes()?,
        filename: format!("{student_id}_report.pdf"),
        format: ExportFormat::Pdf,
    })
}
