//! Draws a [Report] as a PDF document.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::{
    Error,
    report::layout::{Report, ReportTable},
};

/// Turns a laid out [Report] into a downloadable document.
pub trait ReportRenderer {
    /// Render `report` as the bytes of a file.
    ///
    /// # Errors
    /// Returns [Error::ReportRender] if the document could not be created.
    fn render(&self, report: &Report) -> Result<Vec<u8>, Error>;
}

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const HEADING_FONT_SIZE: f32 = 14.0;
const BODY_FONT_SIZE: f32 = 10.0;
/// The approximate width of a character at [BODY_FONT_SIZE] in Helvetica.
const CHARACTER_WIDTH: f32 = 2.0;
const LAYER_NAME: &str = "Layer 1";

/// Renders reports as A4 PDF documents, starting a new page when a table
/// runs past the bottom margin.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, Error> {
        render_pdf(report).map(|(bytes, _)| bytes)
    }
}

/// Render `report` as a PDF, returning the bytes and the number of pages.
fn render_pdf(report: &Report) -> Result<(Vec<u8>, usize), Error> {
    let (document, page, layer) =
        PdfDocument::new(&report.title, PAGE_WIDTH, PAGE_HEIGHT, LAYER_NAME);

    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| Error::ReportRender(error.to_string()))?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|error| Error::ReportRender(error.to_string()))?;

    let mut writer = PageWriter {
        layer: document.get_page(page).get_layer(layer),
        document: &document,
        y: PAGE_HEIGHT.0 - MARGIN,
        page_count: 1,
        regular,
        bold,
    };

    writer.write_line(&report.title, TITLE_FONT_SIZE, true, MARGIN);
    writer.skip_line();

    for table in &report.tables {
        writer.write_table(table);
        writer.skip_line();
    }

    let page_count = writer.page_count;
    drop(writer);

    document
        .save_to_bytes()
        .map(|bytes| (bytes, page_count))
        .map_err(|error| Error::ReportRender(error.to_string()))
}

/// Keeps track of where the next line goes, adding pages as needed.
struct PageWriter<'a> {
    document: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// The distance from the bottom of the page to the next line.
    y: f32,
    page_count: usize,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageWriter<'_> {
    fn new_page_if_full(&mut self) {
        if self.y >= MARGIN {
            return;
        }

        let (page, layer) = self.document.add_page(PAGE_WIDTH, PAGE_HEIGHT, LAYER_NAME);
        self.layer = self.document.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT.0 - MARGIN;
        self.page_count += 1;
    }

    fn skip_line(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn write_line(&mut self, text: &str, font_size: f32, is_bold: bool, x: f32) {
        self.new_page_if_full();

        let font = if is_bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, font_size, Mm(x), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    fn write_row(&mut self, cells: &[String], is_bold: bool, column_width: f32) {
        self.new_page_if_full();

        let max_characters = (column_width / CHARACTER_WIDTH) as usize;
        let font = if is_bold { &self.bold } else { &self.regular };

        for (index, cell) in cells.iter().enumerate() {
            let x = MARGIN + column_width * index as f32;
            self.layer.use_text(
                fit_to_width(cell, max_characters),
                BODY_FONT_SIZE,
                Mm(x),
                Mm(self.y),
                font,
            );
        }

        self.y -= LINE_HEIGHT;
    }

    fn write_table(&mut self, table: &ReportTable) {
        let column_width = (PAGE_WIDTH.0 - 2.0 * MARGIN) / table.columns.len().max(1) as f32;

        self.write_line(&table.heading, HEADING_FONT_SIZE, true, MARGIN);
        self.write_row(&table.columns, true, column_width);

        for row in &table.rows {
            // The column headings are repeated at the top of a new page.
            if self.y < MARGIN {
                self.new_page_if_full();
                self.write_row(&table.columns, true, column_width);
            }

            // A lone cell, e.g. "No transactions", may use the full width.
            let row_width = if row.len() == 1 {
                PAGE_WIDTH.0 - 2.0 * MARGIN
            } else {
                column_width
            };
            self.write_row(row, false, row_width);
        }
    }
}

/// Shorten `text` to at most `max_characters`, marking cut text with an ellipsis.
fn fit_to_width(text: &str, max_characters: usize) -> String {
    if text.chars().count() <= max_characters {
        return text.to_owned();
    }

    let mut shortened = text
        .chars()
        .take(max_characters.saturating_sub(3))
        .collect::<String>();
    shortened.push_str("...");

    shortened
}
