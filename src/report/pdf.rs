use std::fmt::Write as _;

use crate::core::{SimulationInput, SimulationResult};

use super::{RenderError, RenderedReport, ReportRenderer, input_rows, result_rows};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN_LEFT: u32 = 56;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 60;

pub const REPORT_FILENAME: &str = "roi-report.pdf";
pub const REPORT_MIME: &str = "application/pdf";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Style {
    Title,
    Heading,
    Body,
}

impl Style {
    fn font(self) -> &'static str {
        match self {
            Style::Title | Style::Heading => "F2",
            Style::Body => "F1",
        }
    }

    fn size(self) -> u32 {
        match self {
            Style::Title => 18,
            Style::Heading => 13,
            Style::Body => 11,
        }
    }

    /// Vertical space consumed by a line in this style.
    fn advance(self) -> u32 {
        match self {
            Style::Title => 30,
            Style::Heading => 24,
            Style::Body => 16,
        }
    }
}

/// Single-page text layout, encoded as PDF 1.4 with the standard Helvetica fonts.
#[derive(Debug, Default)]
struct TextPage {
    lines: Vec<(Style, String)>,
}

impl TextPage {
    fn push(&mut self, style: Style, text: impl Into<String>) {
        self.lines.push((style, text.into()));
    }

    fn content_stream(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut y = PAGE_HEIGHT - MARGIN_TOP;
        for (style, text) in &self.lines {
            if y < MARGIN_BOTTOM {
                return Err(RenderError::Render(format!(
                    "{} lines do not fit on one page",
                    self.lines.len()
                )));
            }
            let _ = writeln!(
                out,
                "BT /{} {} Tf {} {} Td ({}) Tj ET",
                style.font(),
                style.size(),
                MARGIN_LEFT,
                y,
                escape_text(text)
            );
            y = y.saturating_sub(style.advance());
        }
        Ok(out)
    }

    fn encode(&self) -> Result<Vec<u8>, RenderError> {
        let content = self.content_stream()?;
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}endstream",
                content.len()
            ),
        ];

        let mut doc = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (idx, body) in objects.iter().enumerate() {
            offsets.push(doc.len());
            let _ = write!(doc, "{} 0 obj\n{body}\nendobj\n", idx + 1);
        }

        let xref_offset = doc.len();
        let _ = write!(doc, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = write!(doc, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            doc,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        );
        Ok(doc.into_bytes())
    }
}

/// Escapes a string for a PDF literal. Anything outside printable ASCII
/// becomes `?` since the base-14 fonts are used without an encoding map.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl ReportRenderer for PdfReportRenderer {
    fn render(
        &self,
        email: &str,
        inputs: &SimulationInput,
        results: &SimulationResult,
    ) -> Result<RenderedReport, RenderError> {
        let mut page = TextPage::default();
        page.push(Style::Title, "Invoice Automation ROI Report");
        page.push(Style::Body, format!("Prepared for: {email}"));

        page.push(Style::Heading, "Inputs");
        for (label, value) in input_rows(inputs) {
            page.push(Style::Body, format!("{label}: {value}"));
        }

        page.push(Style::Heading, "Results");
        for (label, value) in result_rows(results) {
            page.push(Style::Body, format!("{label}: {value}"));
        }

        Ok(RenderedReport {
            bytes: page.encode()?,
            filename: REPORT_FILENAME.to_string(),
            mime: REPORT_MIME,
        })
    }
}
