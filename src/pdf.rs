//! Renders the full recap as a paginated PDF. The layout is deliberately
//! plain: monospaced body text wrapped at a fixed column count, with a bold
//! title line on the first page.

#[cfg(feature = "pdf")]
use lopdf::content::{Content, Operation};
#[cfg(feature = "pdf")]
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::record::DailyRecord;
#[cfg(feature = "pdf")]
use crate::report;

#[cfg(feature = "pdf")]
const PAGE_WIDTH: f32 = 612.0;
#[cfg(feature = "pdf")]
const PAGE_HEIGHT: f32 = 792.0;
#[cfg(feature = "pdf")]
const MARGIN: f32 = 54.0;
#[cfg(feature = "pdf")]
const BODY_SIZE: f32 = 10.0;
#[cfg(feature = "pdf")]
const TITLE_SIZE: f32 = 14.0;
#[cfg(feature = "pdf")]
const LEADING: f32 = 13.0;
#[cfg(feature = "pdf")]
const WRAP_COLUMNS: usize = 84;
// Title line plus the gap under it, in body-line units.
#[cfg(feature = "pdf")]
const TITLE_LINES: usize = 3;

#[cfg(feature = "pdf")]
pub fn pdf_title(record: &DailyRecord) -> String {
    let label = report::day_date_label(record);
    if label.is_empty() {
        "Daily Operations Recap".to_string()
    } else {
        format!("Daily Operations Recap – {label}")
    }
}

#[cfg(feature = "pdf")]
pub fn pdf_bytes(record: &DailyRecord) -> anyhow::Result<Vec<u8>> {
    let title = pdf_title(record);
    let body: Vec<String> = report::full_recap(record)
        .lines()
        .flat_map(|line| wrap_text(line, WRAP_COLUMNS))
        .collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let body_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let title_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => body_font_id,
            "F2" => title_font_id,
        },
    });

    let max_lines = (((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize).max(TITLE_LINES + 1);
    let mut page_bodies: Vec<&[String]> = Vec::new();
    let mut start = 0;
    loop {
        let capacity = if page_bodies.is_empty() {
            max_lines - TITLE_LINES
        } else {
            max_lines
        };
        let end = (start + capacity).min(body.len());
        page_bodies.push(&body[start..end]);
        start = end;
        if start >= body.len() {
            break;
        }
    }

    let mut kids: Vec<Object> = Vec::new();
    for (page_index, lines) in page_bodies.iter().enumerate() {
        let mut operations = vec![Operation::new("BT", vec![])];
        if page_index == 0 {
            operations.push(Operation::new("Tf", vec!["F2".into(), TITLE_SIZE.into()]));
            operations.push(Operation::new(
                "Td",
                vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()],
            ));
            operations.push(Operation::new("Tj", vec![text_object(&title)]));
            operations.push(Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]));
            operations.push(Operation::new("TL", vec![LEADING.into()]));
            operations.push(Operation::new(
                "Td",
                vec![0.0f32.into(), (-2.0 * LEADING).into()],
            ));
        } else {
            operations.push(Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]));
            operations.push(Operation::new("TL", vec![LEADING.into()]));
            operations.push(Operation::new(
                "Td",
                vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()],
            ));
        }
        for (line_index, line) in lines.iter().enumerate() {
            if line_index > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("Tj", vec![text_object(line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

#[cfg(not(feature = "pdf"))]
pub fn pdf_bytes(_record: &DailyRecord) -> anyhow::Result<Vec<u8>> {
    anyhow::bail!("pdf export is not available in this build")
}

#[cfg(feature = "pdf")]
fn text_object(text: &str) -> Object {
    Object::String(winansi_bytes(text), StringFormat::Literal)
}

/// Maps text to WinAnsi bytes so the title's en dash and common punctuation
/// survive the Type1 fonts. Anything unmappable becomes '?'.
#[cfg(feature = "pdf")]
fn winansi_bytes(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

#[cfg(feature = "pdf")]
fn winansi_byte(c: char) -> u8 {
    match c {
        '\u{20AC}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        c if (c as u32) < 0x80 => c as u8,
        c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
        _ => b'?',
    }
}

/// Splits a line into pieces at most `width` characters wide, breaking at the
/// last whitespace that fits and hard-splitting tokens longer than a line.
/// Interior whitespace is preserved; only the break character is consumed.
#[cfg(feature = "pdf")]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        if chars.len() - start <= width {
            lines.push(chars[start..].iter().collect());
            break;
        }
        let window_end = start + width;
        match (start + 1..=window_end)
            .rev()
            .find(|&i| chars[i].is_whitespace())
        {
            Some(break_at) => {
                lines.push(chars[start..break_at].iter().collect());
                start = break_at + 1;
            }
            None => {
                lines.push(chars[start..window_end].iter().collect());
                start = window_end;
            }
        }
    }
    lines
}
