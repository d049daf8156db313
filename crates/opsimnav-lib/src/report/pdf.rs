//! Minimal single-page PDF 1.4 writer and text reader.
//!
//! Only what the fixed report layout needs: one A4 page, the two standard
//! Helvetica faces, and one uncompressed content stream of `Tj` text runs.
//! The reader understands exactly the documents the writer produces.

use std::fmt::Write;

use crate::error::{Error, Result};

/// A4 in PDF points.
const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
/// 20 mm.
const MARGIN: f64 = 56.69;
/// 10 mm, one report cell.
const LINE_HEIGHT: f64 = 28.35;
const TITLE_FONT_SIZE: f64 = 14.0;
const BODY_FONT_SIZE: f64 = 12.0;
/// Average Helvetica glyph advance in em, used to centre the title.
const AVERAGE_GLYPH_WIDTH_EM: f64 = 0.55;

/// One row of the page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageLine {
    Title(String),
    Text(String),
    Blank,
}

/// Render `lines` top to bottom onto a single page.
pub(crate) fn render(lines: &[PageLine], document_title: &str) -> Vec<u8> {
    let content = content_stream(lines);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
        format!(
            "<< /Title ({}) /Producer (opsimnav) >>",
            escape(document_title)
        ),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = writeln!(out, "{} 0 obj\n{}\nendobj", index + 1, body);
    }

    let xref_offset = out.len();
    let _ = writeln!(out, "xref\n0 {}", objects.len() + 1);
    let _ = writeln!(out, "0000000000 65535 f ");
    for offset in offsets {
        let _ = writeln!(out, "{offset:010} 00000 n ");
    }
    let _ = writeln!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 7 0 R >>\nstartxref\n{}\n%%EOF",
        objects.len() + 1,
        xref_offset
    );

    out.into_bytes()
}

fn content_stream(lines: &[PageLine]) -> String {
    let mut stream = String::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        match line {
            PageLine::Title(text) => {
                let width = text.chars().count() as f64 * TITLE_FONT_SIZE * AVERAGE_GLYPH_WIDTH_EM;
                let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
                let _ = writeln!(
                    stream,
                    "BT /F2 {TITLE_FONT_SIZE} Tf {x:.2} {y:.2} Td ({}) Tj ET",
                    escape(text)
                );
            }
            PageLine::Text(text) => {
                let _ = writeln!(
                    stream,
                    "BT /F1 {BODY_FONT_SIZE} Tf {MARGIN:.2} {y:.2} Td ({}) Tj ET",
                    escape(text)
                );
            }
            PageLine::Blank => {}
        }
        y -= LINE_HEIGHT;
    }

    // Drop the trailing newline; the object wrapper adds its own.
    stream.pop();
    stream
}

/// Escape a PDF literal string. Characters outside printable ASCII become `?`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Extract the `Tj` text runs of a document produced by [`render`], in page order.
pub(crate) fn extract_text(bytes: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(bytes).map_err(|_| parse_error("document is not ASCII"))?;

    if !text.starts_with("%PDF-") {
        return Err(parse_error("missing %PDF header"));
    }
    if !text.trim_end().ends_with("%%EOF") {
        return Err(parse_error("missing %%EOF trailer"));
    }

    let start = text
        .find("stream\n")
        .map(|i| i + "stream\n".len())
        .ok_or_else(|| parse_error("no content stream"))?;
    let end = text[start..]
        .find("\nendstream")
        .map(|i| start + i)
        .ok_or_else(|| parse_error("unterminated content stream"))?;

    text_runs(&text[start..end])
}

fn text_runs(content: &str) -> Result<Vec<String>> {
    let mut runs = Vec::new();
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '(' {
            continue;
        }

        let mut literal = String::new();
        let mut depth = 1usize;
        loop {
            let Some(c) = chars.next() else {
                return Err(parse_error("unterminated string literal"));
            };
            match c {
                '\\' => {
                    let Some(escaped) = chars.next() else {
                        return Err(parse_error("dangling escape in string literal"));
                    };
                    match escaped {
                        'n' => literal.push('\n'),
                        'r' => literal.push('\r'),
                        't' => literal.push('\t'),
                        'b' => literal.push('\u{8}'),
                        'f' => literal.push('\u{c}'),
                        '0'..='7' => {
                            let mut code = escaped.to_digit(8).unwrap_or(0);
                            for _ in 0..2 {
                                match chars.peek().and_then(|d| d.to_digit(8)) {
                                    Some(d) => {
                                        code = code * 8 + d;
                                        chars.next();
                                    }
                                    None => break,
                                }
                            }
                            literal.push(char::from_u32(code).unwrap_or('?'));
                        }
                        other => literal.push(other),
                    }
                }
                '(' => {
                    depth += 1;
                    literal.push(c);
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    literal.push(c);
                }
                _ => literal.push(c),
            }
        }

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let op: String = chars.by_ref().take(2).collect();
        if op == "Tj" {
            runs.push(literal);
        }
    }

    Ok(runs)
}

fn parse_error(message: &str) -> Error {
    Error::ReportParse {
        message: message.to_string(),
    }
}
