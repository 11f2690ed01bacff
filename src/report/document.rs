//! The paginated PDF export.
//!
//! Laying out the report is kept apart from drawing it: [layout_pages]
//! decides what text goes where on which A4 page, and [write_document] draws
//! those pages with `printpdf`'s built-in Helvetica fonts.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{
    Error,
    config::BusinessConfig,
    report::{
        ReportKind,
        data::ReportData,
        table::{Cell, DOCUMENT_ROW_LIMIT, build_table, format_date_time},
    },
};

/// The PDF MIME type.
pub const DOCUMENT_CONTENT_TYPE: &str = "application/pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

/// Height of one line of body text in millimetres.
const LINE_HEIGHT: f32 = 6.0;

/// A piece of text placed on a page, measured in millimetres from the bottom left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

/// The text on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<PlacedText>,
}

struct PageWriter {
    pages: Vec<Page>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn put(&mut self, text: String, x: f32, size: f32, bold: bool) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(PlacedText {
                text,
                x,
                y: self.y,
                size,
                bold,
            });
        }
    }

    /// Write a single line of text and move down.
    fn line(&mut self, text: impl Into<String>, size: f32, bold: bool) {
        self.put(text.into(), MARGIN, size, bold);
        self.advance(size);
    }

    /// Write one table row across `columns` equal-width columns and move down.
    fn row(&mut self, cells: &[String], bold: bool) {
        let column_width = CONTENT_WIDTH / cells.len().max(1) as f32;

        for (index, cell) in cells.iter().enumerate() {
            let x = MARGIN + index as f32 * column_width;
            self.put(fit_to_width(cell, column_width, BODY_SIZE), x, BODY_SIZE, bold);
        }

        self.advance(BODY_SIZE);
    }

    fn advance(&mut self, size: f32) {
        self.y -= LINE_HEIGHT * size / BODY_SIZE;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }
}

/// Shorten `text` so that it roughly fits in `width` millimetres.
///
/// Helvetica glyphs average about half the font size in width.
fn fit_to_width(text: &str, width: f32, size: f32) -> String {
    let average_glyph_width = size * 0.5 * 0.3528;
    let max_chars = ((width - 2.0) / average_glyph_width).floor().max(4.0) as usize;

    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut shortened: String = text.chars().take(max_chars - 3).collect();
    shortened.push_str("...");
    shortened
}

/// Lay out the report for `kind` over as many A4 pages as it needs.
///
/// The table header is repeated at the top of every page the table
/// continues onto. Recent Transactions is limited to the newest
/// [DOCUMENT_ROW_LIMIT] rows.
pub fn layout_pages(kind: ReportKind, data: &ReportData, business: &BusinessConfig) -> Vec<Page> {
    let currency = business.currency_code.as_str();
    let mut writer = PageWriter::new();

    writer.line(format!("{} - Business Report", business.name), TITLE_SIZE, true);
    writer.line(format!("Report Period: {}", data.period.label()), BODY_SIZE, false);
    writer.line(
        format!("Generated: {}", format_date_time(data.generated_at)),
        BODY_SIZE,
        false,
    );
    writer.gap();

    writer.line("Summary Statistics", HEADING_SIZE, true);
    writer.row(&["Metric".to_owned(), "Value".to_owned()], true);
    for (label, value) in data.summary.metrics() {
        writer.row(&[label.to_owned(), Cell::from(value).display(currency)], false);
    }
    writer.gap();

    writer.line(kind.title(), HEADING_SIZE, true);

    let Some(table) = build_table(kind, data, DOCUMENT_ROW_LIMIT) else {
        writer.line(kind.no_data_message(), BODY_SIZE, false);
        return writer.pages;
    };

    let header = table
        .columns
        .iter()
        .map(|column| column.header.to_owned())
        .collect::<Vec<_>>();
    writer.row(&header, true);

    for row in &table.rows {
        if writer.remaining() < LINE_HEIGHT {
            writer.new_page();
            writer.row(&header, true);
        }

        let cells = row
            .iter()
            .map(|cell| cell.display(currency))
            .collect::<Vec<_>>();
        writer.row(&cells, false);
    }

    writer.pages
}

/// Draw the report for `kind` as a PDF document.
///
/// # Errors
/// Returns an [Error::DocumentError] if a font could not be loaded or the
/// document could not be written.
pub fn write_document(
    kind: ReportKind,
    data: &ReportData,
    business: &BusinessConfig,
) -> Result<Vec<u8>, Error> {
    let pages = layout_pages(kind, data, business);
    let title = format!("{} Report - {}", business.name, kind.title());

    let (document, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| Error::DocumentError(error.to_string()))?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|error| Error::DocumentError(error.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = document.get_page(page_index).get_layer(layer_index);

        for item in &page.items {
            let font = if item.bold { &bold } else { &regular };
            layer.use_text(item.text.as_str(), item.size, Mm(item.x), Mm(item.y), font);
        }
    }

    document
        .save_to_bytes()
        .inspect_err(|error| tracing::error!("could not write PDF document: {error}"))
        .map_err(|error| Error::DocumentError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{
        config::BusinessConfig,
        report::{
            ReportKind,
            table::{
                DOCUMENT_ROW_LIMIT,
                test_data::{empty_report_data, sample_report_data},
            },
        },
    };

    use super::{MARGIN, Page, fit_to_width, layout_pages, write_document};

    fn texts(page: &Page) -> Vec<&str> {
        page.items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn long_table_spans_pages_with_repeated_header() {
        let data = sample_report_data(DOCUMENT_ROW_LIMIT + 20);

        let pages = layout_pages(
            ReportKind::RecentTransactions,
            &data,
            &BusinessConfig::default(),
        );

        assert!(pages.len() > 1, "want several pages, got {}", pages.len());
        for page in &pages[1..] {
            assert_eq!(&texts(page)[..2], &["Date", "Customer"]);
        }

        let data_rows: usize = pages
            .iter()
            .map(|page| {
                page.items
                    .iter()
                    .filter(|item| !item.bold && item.text.ends_with(" kg"))
                    .count()
            })
            .sum();
        assert_eq!(data_rows, DOCUMENT_ROW_LIMIT);
    }

    #[test]
    fn text_stays_inside_margins() {
        let data = sample_report_data(DOCUMENT_ROW_LIMIT);

        let pages = layout_pages(
            ReportKind::RecentTransactions,
            &data,
            &BusinessConfig::default(),
        );

        for item in pages.iter().flat_map(|page| &page.items) {
            assert!(item.y >= MARGIN, "{item:?} is below the bottom margin");
        }
    }

    #[test]
    fn empty_list_shows_no_data_message() {
        let data = empty_report_data();

        for kind in ReportKind::ALL {
            let pages = layout_pages(kind, &data, &BusinessConfig::default());

            assert_eq!(pages.len(), 1);
            assert_eq!(texts(&pages[0]).last(), Some(&kind.no_data_message()));
        }
    }

    #[test]
    fn uses_currency_code() {
        let data = sample_report_data(1);

        let pages = layout_pages(
            ReportKind::CustomerSpending,
            &data,
            &BusinessConfig::default(),
        );

        assert!(texts(&pages[0]).contains(&"NGN 150.00"));
    }

    #[test]
    fn shortens_long_text() {
        let text = "a".repeat(200);

        let shortened = fit_to_width(&text, 30.0, 10.0);

        assert!(shortened.len() < text.len());
        assert!(shortened.ends_with("..."));
        assert_eq!(fit_to_width("Copper", 30.0, 10.0), "Copper");
    }

    #[test]
    fn writes_pdf() {
        let data = sample_report_data(3);

        let bytes = write_document(
            ReportKind::ProductPurchases,
            &data,
            &BusinessConfig::default(),
        )
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
