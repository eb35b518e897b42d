//! PDF report rendering for medicine exports.
//!
//! Deterministic layout: title block, summary tables (top categories,
//! top manufacturers, full classification distribution), then a page
//! break and the per-medicine detail table. PDF generation via
//! `printpdf` builtin fonts with a manual layout cursor.

use std::io::BufWriter;

use printpdf::*;
use thiserror::Error;

use crate::models::MedicineRecord;
use crate::stats::{DistributionEntry, ReportSummary};

const REPORT_TITLE: &str = "Medicine Data Export Report";

// Detail-table column display widths, in characters.
const NAME_WIDTH: usize = 30;
const CATEGORY_WIDTH: usize = 20;
const MANUFACTURER_WIDTH: usize = 20;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Rendering options for the report endpoint.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Include the per-medicine detail table after the summary pages.
    pub include_details: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_details: true,
        }
    }
}

/// A rendered report: the PDF bytes and the attachment filename.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Layout cursor over a growing PDF document. Starts pages as rows
/// run out of vertical room.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a PdfDocumentReference, page: PdfPageIndex, layer: PdfLayerIndex) -> Self {
        Self {
            doc,
            layer: doc.get_page(page).get_layer(layer),
            y: Mm(280.0),
        }
    }

    fn break_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = Mm(280.0);
    }

    fn ensure_room(&mut self, needed: Mm) {
        if self.y.0 - needed.0 < 20.0 {
            self.break_page();
        }
    }

    fn space(&mut self, dy: Mm) {
        self.y -= dy;
    }

    fn title(&mut self, text: &str, font: &IndirectFontRef) {
        self.layer.use_text(text, 18.0, Mm(20.0), self.y, font);
        self.y -= Mm(10.0);
    }

    fn heading(&mut self, text: &str, font: &IndirectFontRef) {
        self.layer.use_text(text, 13.0, Mm(20.0), self.y, font);
        self.y -= Mm(8.0);
    }

    fn body(&mut self, text: &str, font: &IndirectFontRef) {
        self.layer.use_text(text, 10.0, Mm(20.0), self.y, font);
        self.y -= Mm(5.0);
    }

    fn table_title(&mut self, text: &str, font: &IndirectFontRef) {
        self.layer.use_text(text, 11.0, Mm(20.0), self.y, font);
        self.y -= Mm(6.0);
    }

    fn table_row(&mut self, text: &str, font: &IndirectFontRef) {
        self.layer.use_text(text, 8.0, Mm(25.0), self.y, font);
        self.y -= Mm(4.0);
    }
}

/// Render the full export report. Returns the PDF bytes and a
/// filename derived from the summary's generation timestamp
/// (`medicine_report_<YYYYMMDD>_<HHMMSS>.pdf`).
pub fn render_report(
    records: &[MedicineRecord],
    summary: &ReportSummary,
    options: &ReportOptions,
) -> Result<RenderedReport, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(REPORT_TITLE, Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let mono = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut w = PageWriter::new(&doc, page1, layer1);

    // Title block
    w.title(REPORT_TITLE, &bold);
    w.body(
        &format!(
            "Export Date: {}",
            summary.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        &font,
    );
    w.body(&format!("Total Medicines: {}", summary.total_medicines), &font);
    w.body(
        &format!("Filters Applied: {}", summary.filters_applied.describe()),
        &font,
    );
    w.space(Mm(8.0));

    w.heading("Summary Statistics", &bold);

    if !summary.top_5_categories.is_empty() {
        count_table(
            &mut w,
            "Top 5 Categories",
            "Category",
            &summary.top_5_categories,
            &bold,
            &mono,
        );
    }
    if !summary.top_5_manufacturers.is_empty() {
        count_table(
            &mut w,
            "Top 5 Manufacturers",
            "Manufacturer",
            &summary.top_5_manufacturers,
            &bold,
            &mono,
        );
    }
    let classifications = summary.classification_distribution.sorted_entries();
    if !classifications.is_empty() {
        count_table(
            &mut w,
            "Classification Distribution",
            "Classification",
            &classifications,
            &bold,
            &mono,
        );
    }

    // Detail table on a fresh page; skipped entirely for empty sets.
    if options.include_details && !records.is_empty() {
        w.break_page();
        w.heading("Medicine Data", &bold);
        w.table_row(
            &format!(
                "{:<32}{:<22}{:<22}{}",
                "Name", "Category", "Manufacturer", "Classification"
            ),
            &bold,
        );
        for record in records {
            w.ensure_room(Mm(6.0));
            w.table_row(
                &format!(
                    "{:<32}{:<22}{:<22}{}",
                    clip(&record.name, NAME_WIDTH),
                    clip(display_or_na(record.category.as_deref()), CATEGORY_WIDTH),
                    clip(
                        display_or_na(record.manufacturer.as_deref()),
                        MANUFACTURER_WIDTH
                    ),
                    display_or_na(record.classification.as_deref()),
                ),
                &mono,
            );
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))?;

    let filename = format!(
        "medicine_report_{}.pdf",
        summary.generated_at.format("%Y%m%d_%H%M%S")
    );

    Ok(RenderedReport { bytes, filename })
}

fn count_table(
    w: &mut PageWriter<'_>,
    title: &str,
    label_header: &str,
    rows: &[DistributionEntry],
    bold: &IndirectFontRef,
    mono: &IndirectFontRef,
) {
    w.ensure_room(Mm(24.0));
    w.table_title(title, bold);
    w.table_row(&format!("{:<40}{:>8}", label_header, "Count"), bold);
    for entry in rows {
        w.ensure_room(Mm(6.0));
        w.table_row(&format!("{:<40}{:>8}", clip(&entry.label, 38), entry.count), mono);
    }
    w.space(Mm(6.0));
}

/// Bound a value to `max_chars` display characters. No truncation
/// indicator: the bound is a layout constraint, not data-loss
/// signaling.
fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

fn display_or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "N/A",
    }
}
