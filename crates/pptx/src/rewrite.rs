//! Streaming rewrites of slide XML.
//!
//! All three operations copy the event stream through unchanged and only
//! touch text inside `a:t` run elements, so shape properties, formatting,
//! and nested group shapes survive a rewrite byte-for-byte.

use crate::replace::Replacements;
use confidence_core::{Error, Result, VoteCounts};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

pub(crate) fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(e.to_string()))
}

fn into_xml_string(writer: Writer<Cursor<Vec<u8>>>) -> Result<String> {
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| Error::Xml(e.to_string()))
}

/// Copy the slide XML, rewriting each text run through `rewrite`.
///
/// The closure returns `None` to keep a run's text untouched.
fn rewrite_runs<F>(xml: &str, mut rewrite: F) -> Result<String>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if local_name(e.name().as_ref()) == b"t" {
                    in_run_text = true;
                }
                write_event(&mut writer, Event::Start(e))?;
            }
            Ok(Event::End(e)) => {
                if local_name(e.name().as_ref()) == b"t" {
                    in_run_text = false;
                }
                write_event(&mut writer, Event::End(e))?;
            }
            Ok(Event::Text(e)) if in_run_text => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::Xml(err.to_string()))?
                    .into_owned();
                match rewrite(&text) {
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

    into_xml_string(writer)
}

/// Replace every occurrence of every mapped token in every text run.
///
/// Runs without any token are copied through untouched; an unmatched
/// token is a silent no-op.
pub fn replace_token_runs(xml: &str, replacements: &Replacements) -> Result<String> {
    rewrite_runs(xml, |text| {
        let replaced = replacements.apply(text);
        (replaced != text).then_some(replaced)
    })
}

/// Replace count placeholder runs with the tally values.
///
/// A run whose trimmed lowercased text is exactly `<high>`, `<medium>`,
/// or `<low>` becomes the matching count; a run exactly `#` or `<#>`
/// becomes the total response count.
pub fn replace_count_runs(xml: &str, counts: &VoteCounts, total_rows: usize) -> Result<String> {
    rewrite_runs(xml, |text| match text.trim().to_lowercase().as_str() {
        "<high>" => Some(counts.high.to_string()),
        "<medium>" => Some(counts.medium.to_string()),
        "<low>" => Some(counts.low.to_string()),
        "#" | "<#>" => Some(total_rows.to_string()),
        _ => None,
    })
}

/// Replace the paragraphs of every shape whose text contains
/// `placeholder` with one paragraph per supplied bullet line.
///
/// Like the manual clear-and-refill it models, the text body keeps a
/// single leading empty paragraph before the bullet paragraphs. Shapes
/// not containing the placeholder are copied through untouched.
pub fn fill_bullet_shapes(xml: &str, placeholder: &str, points: &[String]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if local_name(e.name().as_ref()) == b"sp" => {
                // Buffer the whole shape so the placeholder check can see
                // all of its run text before anything is written out.
                let mut events: Vec<Event<'static>> = vec![Event::Start(e.into_owned())];
                let mut depth = 1usize;
                let mut text = String::new();
                let mut in_run_text = false;

                while depth > 0 {
                    match reader.read_event() {
                        Ok(Event::Start(e)) => {
                            let is_sp = local_name(e.name().as_ref()) == b"sp";
                            let is_t = local_name(e.name().as_ref()) == b"t";
                            let is_p = local_name(e.name().as_ref()) == b"p";
                            if is_sp {
                                depth += 1;
                            } else if is_t {
                                in_run_text = true;
                            } else if is_p && !text.is_empty() {
                                // Paragraph boundary, mirrors joining a
                                // shape's paragraphs with newlines.
                                text.push('\n');
                            }
                            events.push(Event::Start(e.into_owned()));
                        }
                        Ok(Event::End(e)) => {
                            let is_sp = local_name(e.name().as_ref()) == b"sp";
                            let is_t = local_name(e.name().as_ref()) == b"t";
                            if is_sp {
                                depth -= 1;
                            } else if is_t {
                                in_run_text = false;
                            }
                            events.push(Event::End(e.into_owned()));
                        }
                        Ok(Event::Text(e)) => {
                            if in_run_text {
                                let run =
                                    e.unescape().map_err(|err| Error::Xml(err.to_string()))?;
                                text.push_str(&run);
                            }
                            events.push(Event::Text(e.into_owned()));
                        }
                        Ok(Event::Eof) => {
                            return Err(Error::Xml(
                                "unexpected end of slide XML inside shape".to_string(),
                            ));
                        }
                        Ok(event) => events.push(event.into_owned()),
                        Err(err) => return Err(Error::Xml(err.to_string())),
                    }
                }

                if text.contains(placeholder) {
                    log::debug!("Filling {} bullet lines into shape", points.len());
                    write_shape_with_points(&mut writer, &events, points)?;
                } else {
                    for event in events {
                        write_event(&mut writer, event)?;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(event) => write_event(&mut writer, event)?,
            Err(err) => return Err(Error::Xml(err.to_string())),
        }
    }

    into_xml_string(writer)
}

/// Replay a buffered shape, dropping its existing paragraphs and emitting
/// the bullet paragraphs just before the text body closes.
fn write_shape_with_points<W: std::io::Write>(
    writer: &mut Writer<W>,
    events: &[Event<'static>],
    points: &[String],
) -> Result<()> {
    let mut in_tx_body = false;
    let mut skip_depth = 0usize;

    for event in events {
        match event {
            Event::Start(e) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                    continue;
                }
                let qname = e.name();
                let name = local_name(qname.as_ref());
                if in_tx_body && name == b"p" {
                    skip_depth = 1;
                    continue;
                }
                if name == b"txBody" {
                    in_tx_body = true;
                }
                write_event(writer, event.clone())?;
            }
            Event::Empty(e) => {
                if skip_depth > 0 {
                    continue;
                }
                if in_tx_body && local_name(e.name().as_ref()) == b"p" {
                    continue;
                }
                write_event(writer, event.clone())?;
            }
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                if local_name(e.name().as_ref()) == b"txBody" {
                    write_bullet_paragraphs(writer, points)?;
                    in_tx_body = false;
                }
                write_event(writer, event.clone())?;
            }
            other => {
                if skip_depth == 0 {
                    write_event(writer, other.clone())?;
                }
            }
        }
    }

    Ok(())
}

fn write_bullet_paragraphs<W: std::io::Write>(
    writer: &mut Writer<W>,
    points: &[String],
) -> Result<()> {
    // Clearing a text frame leaves one empty paragraph behind; the bullet
    // paragraphs are appended after it.
    write_event(writer, Event::Empty(BytesStart::new("a:p")))?;
    for point in points {
        write_event(writer, Event::Start(BytesStart::new("a:p")))?;
        write_event(writer, Event::Start(BytesStart::new("a:r")))?;
        write_event(writer, Event::Start(BytesStart::new("a:t")))?;
        write_event(writer, Event::Text(BytesText::new(point)))?;
        write_event(writer, Event::End(BytesEnd::new("a:t")))?;
        write_event(writer, Event::End(BytesEnd::new("a:r")))?;
        write_event(writer, Event::End(BytesEnd::new("a:p")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<p:sld><p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>Solution: &lt;SOLUTION&gt;</a:t></a:r></a:p></p:txBody></p:sp><p:grpSp><p:sp><p:txBody><a:p><a:r><a:t>&lt;Release&gt;</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp></p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn replaces_tokens_in_runs() {
        let reps = Replacements::new().with("<SOLUTION>", "Alpha Product");
        let out = replace_token_runs(SLIDE, &reps).unwrap();
        assert!(out.contains("<a:t>Solution: Alpha Product</a:t>"));
    }

    #[test]
    fn reaches_runs_inside_nested_groups() {
        let reps = Replacements::new().with("<Release>", "v1.2");
        let out = replace_token_runs(SLIDE, &reps).unwrap();
        assert!(out.contains("<a:t>v1.2</a:t>"));
    }

    #[test]
    fn unmatched_tokens_leave_runs_unchanged() {
        let reps = Replacements::new().with("<Due Date>", "2025-08-01");
        let out = replace_token_runs(SLIDE, &reps).unwrap();
        assert!(out.contains("Solution: &lt;SOLUTION&gt;"));
    }

    #[test]
    fn text_outside_runs_is_untouched() {
        let xml = r#"<root><note>keep &lt;SOLUTION&gt; as-is</note></root>"#;
        let reps = Replacements::new().with("<SOLUTION>", "Alpha");
        // The token only counts inside a:t run elements.
        let out = replace_token_runs(xml, &reps).unwrap();
        assert!(out.contains("keep &lt;SOLUTION&gt; as-is"));
    }

    #[test]
    fn count_runs_match_exactly_after_trim_and_lowercase() {
        let xml = r#"<p:sld><p:sp><p:txBody><a:p><a:r><a:t> &lt;HIGH&gt; </a:t></a:r><a:r><a:t>#</a:t></a:r><a:r><a:t>high</a:t></a:r></a:p></p:txBody></p:sp></p:sld>"#;
        let counts = VoteCounts::new(2, 0, 1);
        let out = replace_count_runs(xml, &counts, 3).unwrap();
        assert!(out.contains("<a:t>2</a:t>"));
        assert!(out.contains("<a:t>3</a:t>"));
        // A run that merely says "high" is not a placeholder.
        assert!(out.contains("<a:t>high</a:t>"));
    }

    #[test]
    fn fills_bullets_into_matching_shape_only() {
        let xml = r#"<p:sld><p:spTree><p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>&lt;&lt;Factors&gt;&gt;</a:t></a:r></a:p></p:txBody></p:sp><p:sp><p:txBody><a:p><a:r><a:t>Other shape</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:sld>"#;
        let points = vec![
            "Scope creep — Avery".to_string(),
            " — Blake".to_string(),
        ];
        let out = fill_bullet_shapes(xml, "<<Factors>>", &points).unwrap();

        assert!(!out.contains("Factors"));
        assert!(out.contains("<a:t>Scope creep — Avery</a:t>"));
        assert!(out.contains("<a:t> — Blake</a:t>"));
        // The body properties and the untouched shape survive.
        assert!(out.contains("<a:bodyPr/>"));
        assert!(out.contains("<a:t>Other shape</a:t>"));
    }

    #[test]
    fn fill_without_matching_shape_is_a_no_op() {
        let xml = r#"<p:sld><p:sp><p:txBody><a:p><a:r><a:t>Nothing here</a:t></a:r></a:p></p:txBody></p:sp></p:sld>"#;
        let out = fill_bullet_shapes(xml, "<<Missing>>", &[]).unwrap();
        assert!(out.contains("<a:t>Nothing here</a:t>"));
    }

    #[test]
    fn local_name_strips_prefix() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }
}
