//! In-memory PPTX template document.
//!
//! A template is loaded from its ZIP container into an ordered part list,
//! mutated in place by the substitution operations, and serialized back
//! out with the original entry order preserved.

use crate::chart;
use crate::replace::Replacements;
use crate::rewrite;
use confidence_core::{Error, Result, VoteCounts};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Relationship file describing the presentation's slide parts.
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Category labels for the confidence chart, fixed by the report layout.
const CHART_CATEGORIES: [&str; 3] = ["High", "Medium", "Low"];

/// Series name written into the confidence chart.
const CHART_SERIES_NAME: &str = "Confidence Levels";

/// A slide-deck template held fully in memory.
pub struct Template {
    /// All archive parts in original entry order.
    parts: Vec<(String, Vec<u8>)>,

    /// Slide part paths in presentation order.
    slide_paths: Vec<String>,
}

impl Template {
    /// Load a template from any seekable reader holding PPTX bytes.
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open template archive: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::Zip(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push((file.name().to_string(), data));
        }

        let slide_paths = slide_order(&parts)?;
        log::debug!(
            "Loaded template with {} parts, {} slides",
            parts.len(),
            slide_paths.len()
        );

        Ok(Self { parts, slide_paths })
    }

    /// Load a template from a file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(BufReader::new(File::open(path.as_ref())?))
    }

    /// Number of slides in the template.
    pub fn slide_count(&self) -> usize {
        self.slide_paths.len()
    }

    /// Replace every mapped token in every text run on the slide,
    /// including runs inside nested group shapes.
    pub fn replace_tokens(&mut self, slide: usize, replacements: &Replacements) -> Result<()> {
        if replacements.is_empty() {
            return Ok(());
        }
        let path = self.slide_path(slide)?.to_string();
        let xml = self.part_string(&path)?;
        let rewritten = rewrite::replace_token_runs(&xml, replacements)?;
        self.set_part(&path, rewritten.into_bytes());
        Ok(())
    }

    /// Push the vote tally into the slide: every related chart gets the
    /// three category counts as its cached series data, and count
    /// placeholder runs on the slide become the matching numbers.
    pub fn update_counts(
        &mut self,
        slide: usize,
        counts: &VoteCounts,
        total_rows: usize,
    ) -> Result<()> {
        let path = self.slide_path(slide)?.to_string();

        for chart_path in self.chart_paths_for(&path)? {
            let xml = self.part_string(&chart_path)?;
            let rewritten = chart::replace_chart_data(
                &xml,
                CHART_SERIES_NAME,
                &CHART_CATEGORIES,
                &[counts.high, counts.medium, counts.low],
            )?;
            self.set_part(&chart_path, rewritten.into_bytes());
        }

        let xml = self.part_string(&path)?;
        let rewritten = rewrite::replace_count_runs(&xml, counts, total_rows)?;
        self.set_part(&path, rewritten.into_bytes());
        Ok(())
    }

    /// Replace the text body of every shape on the slide containing the
    /// placeholder phrase with the supplied bullet lines, one paragraph
    /// per line. A slide without a matching shape is left unchanged.
    pub fn fill_bullets(
        &mut self,
        slide: usize,
        placeholder: &str,
        points: &[String],
    ) -> Result<()> {
        let path = self.slide_path(slide)?.to_string();
        let xml = self.part_string(&path)?;
        let rewritten = rewrite::fill_bullet_shapes(&xml, placeholder, points)?;
        self.set_part(&path, rewritten.into_bytes());
        Ok(())
    }

    /// Serialize the template back to a PPTX archive.
    pub fn save<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::Zip(e.to_string()))?;
            zip.write_all(data)?;
        }
        zip.finish().map_err(|e| Error::Zip(e.to_string()))?;
        Ok(())
    }

    /// Raw bytes of a part, mainly useful for inspecting results in tests.
    pub fn part_bytes(&self, name: &str) -> Result<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
            .ok_or_else(|| Error::PartNotFound(name.to_string()))
    }

    /// Part path of a slide by 0-based index.
    pub fn slide_path(&self, slide: usize) -> Result<&str> {
        self.slide_paths
            .get(slide)
            .map(String::as_str)
            .ok_or(Error::SlideOutOfRange {
                index: slide,
                count: self.slide_paths.len(),
            })
    }

    fn part_string(&self, name: &str) -> Result<String> {
        let bytes = self.part_bytes(name)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Xml(format!("Part {} is not valid UTF-8: {}", name, e)))
    }

    fn set_part(&mut self, name: &str, data: Vec<u8>) {
        if let Some(part) = self.parts.iter_mut().find(|(n, _)| n == name) {
            part.1 = data;
        } else {
            self.parts.push((name.to_string(), data));
        }
    }

    /// Chart parts related to a slide, resolved through the slide's
    /// relationship file. A slide without relationships has no charts.
    fn chart_paths_for(&self, slide_path: &str) -> Result<Vec<String>> {
        let rels_path = rels_path_for(slide_path);
        let rels_xml = match self.part_string(&rels_path) {
            Ok(xml) => xml,
            Err(Error::PartNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let base_dir = parent_dir(slide_path);
        let charts = parse_relationships(&rels_xml)?
            .into_iter()
            .filter(|(rel_type, _)| rel_type.contains("/chart"))
            .map(|(_, target)| resolve_target(base_dir, &target))
            .collect();
        Ok(charts)
    }
}

/// Resolve the ordered slide part list from the presentation relationships.
fn slide_order(parts: &[(String, Vec<u8>)]) -> Result<Vec<String>> {
    let rels_xml = parts
        .iter()
        .find(|(n, _)| n == PRESENTATION_RELS)
        .map(|(_, d)| String::from_utf8_lossy(d).into_owned())
        .ok_or_else(|| Error::PartNotFound(PRESENTATION_RELS.to_string()))?;

    let mut slides: Vec<(String, Option<usize>)> = parse_relationships(&rels_xml)?
        .into_iter()
        .filter(|(rel_type, _)| {
            rel_type.contains("/slide")
                && !rel_type.contains("slideLayout")
                && !rel_type.contains("slideMaster")
        })
        .map(|(_, target)| {
            let path = resolve_target("ppt", &target);
            let order = trailing_number(&path);
            (path, order)
        })
        .collect();

    // Sort by the number in the part name (slide1.xml, slide2.xml, ...);
    // unnumbered parts sort last by name.
    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    Ok(slides.into_iter().map(|(path, _)| path).collect())
}

/// Parse `(Type, Target)` pairs out of a relationships part.
fn parse_relationships(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut relationships = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }
                relationships.push((rel_type, target));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Relationship part path for a given part
/// (`ppt/slides/slide2.xml` -> `ppt/slides/_rels/slide2.xml.rels`).
fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Directory of a part path, without trailing slash.
fn parent_dir(part_path: &str) -> &str {
    part_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut stack: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                stack.pop();
            }
            "." | "" => {}
            s => stack.push(s),
        }
    }
    stack.join("/")
}

/// Extract a trailing number from a part name like "slide3.xml".
fn trailing_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}
