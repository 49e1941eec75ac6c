//! Chart part rewriting.
//!
//! A DrawingML chart caches its plotted values inside the chart part
//! (`c:ser` > `c:cat`/`c:val` > cached points). Replacing those cached
//! points is what makes the rendered chart show the new tally; the
//! embedded source workbook is left untouched.

use crate::rewrite::{local_name, write_event};
use confidence_core::{Error, Result};
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Which cached block of a series the cursor is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    /// `c:tx` — the series name.
    SeriesName,
    /// `c:cat` — the category labels.
    Categories,
    /// `c:val` — the plotted values.
    Values,
}

/// Rewrite every series of a chart part with the given name, category
/// labels, and values.
///
/// Cached points are replaced by index; points beyond the supplied
/// slices keep their old text. The chart structure itself (point counts,
/// format codes, references) is preserved.
pub fn replace_chart_data(
    xml: &str,
    series_name: &str,
    categories: &[&str],
    values: &[usize],
) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut in_series = false;
    let mut section = Section::None;
    let mut point_idx: Option<usize> = None;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                match local_name(e.name().as_ref()) {
                    b"ser" => in_series = true,
                    b"tx" if in_series => section = Section::SeriesName,
                    b"cat" if in_series => section = Section::Categories,
                    b"val" if in_series => section = Section::Values,
                    b"pt" if section != Section::None => point_idx = parse_idx(&e),
                    b"v" => in_value = true,
                    _ => {}
                }
                write_event(&mut writer, Event::Start(e))?;
            }
            Ok(Event::End(e)) => {
                match local_name(e.name().as_ref()) {
                    b"ser" => in_series = false,
                    b"tx" | b"cat" | b"val" if in_series => section = Section::None,
                    b"pt" => point_idx = None,
                    b"v" => in_value = false,
                    _ => {}
                }
                write_event(&mut writer, Event::End(e))?;
            }
            Ok(Event::Text(e)) if in_series && in_value && point_idx.is_some() => {
                let idx = point_idx.unwrap_or_default();
                let replacement = match section {
                    Section::SeriesName => Some(series_name.to_string()),
                    Section::Categories => categories.get(idx).map(|c| (*c).to_string()),
                    Section::Values => values.get(idx).map(|v| v.to_string()),
                    Section::None => None,
                };
                match replacement {
                    Some(new_text) => {
                        write_event(&mut writer, Event::Text(BytesText::new(&new_text)))?;
                    }
                    None => write_event(&mut writer, Event::Text(e))?,
                }
            }
            Ok(Event::Eof) => break,
            Ok(event) => write_event(&mut writer, event)?,
            Err(err) => return Err(Error::Xml(err.to_string())),
        }
    }

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| Error::Xml(e.to_string()))
}

/// Parse the `idx` attribute of a cached point.
fn parse_idx(e: &quick_xml::events::BytesStart<'_>) -> Option<usize> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"idx" {
            return String::from_utf8_lossy(&attr.value).parse().ok();
        }
    }
    None
}
