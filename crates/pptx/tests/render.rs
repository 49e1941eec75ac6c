//! End-to-end render test against an in-memory six-slide template.

use confidence_core::{ReportData, SurveyRow, SurveyTable, VoteCounts};
use confidence_pptx::{render_report, Template, INCREASING_PLACEHOLDER, LOWERING_PLACEHOLDER};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

fn slide(body: &str) -> String {
    format!(
        r#"<p:sld><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
        body
    )
}

fn text_shape(runs: &str) -> String {
    format!(
        r#"<p:sp><p:txBody><a:bodyPr/><a:p>{}</a:p></p:txBody></p:sp>"#,
        runs
    )
}

fn run(text: &str) -> String {
    format!("<a:r><a:t>{}</a:t></a:r>", text)
}

fn chart_xml() -> &'static str {
    r#"<c:chartSpace><c:chart><c:plotArea><c:barChart><c:ser><c:tx><c:strRef><c:strCache><c:pt idx="0"><c:v>Series 1</c:v></c:pt></c:strCache></c:strRef></c:tx><c:cat><c:strRef><c:strCache><c:ptCount val="3"/><c:pt idx="0"><c:v>A</c:v></c:pt><c:pt idx="1"><c:v>B</c:v></c:pt><c:pt idx="2"><c:v>C</c:v></c:pt></c:strCache></c:strRef></c:cat><c:val><c:numRef><c:numCache><c:ptCount val="3"/><c:pt idx="0"><c:v>9</c:v></c:pt><c:pt idx="1"><c:v>9</c:v></c:pt><c:pt idx="2"><c:v>9</c:v></c:pt></c:numCache></c:numRef></c:val></c:ser></c:barChart></c:plotArea></c:chart></c:chartSpace>"#
}

fn chart_rels(chart: &str) -> String {
    format!(
        r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/{}"/></Relationships>"#,
        chart
    )
}

/// Build a six-slide template matching the fixed report layout.
fn build_template() -> Vec<u8> {
    let mut rels = String::from("<Relationships>");
    for i in 1..=6 {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i, i
        ));
    }
    rels.push_str("</Relationships>");

    let slide1 = slide(&text_shape(&(run("&lt;SOLUTION&gt;") + &run("&lt;Release&gt;"))));
    let slide2 = slide(&text_shape(
        &(run("&lt;Release&gt; due &lt;Due Date&gt;")
            + &run("&lt;Overall Confidence&gt;")
            + &run("&lt;high&gt;")
            + &run("&lt;medium&gt;")
            + &run("&lt;low&gt;")
            + &run("&lt;#&gt;")),
    ));
    let slide3 = slide(
        &(text_shape(&run(
            "&lt;&lt;What factors lower your confidence level?&gt;&gt;",
        )) + &text_shape(&run(
            "&lt;&lt;What resources, support, or actions would help increase your confidence level?&gt;&gt;",
        ))),
    );
    let slide4 = slide(&text_shape(
        &(run("&lt;Release&gt;") + &run("&lt;KEY&gt;") + &run("&lt;high&gt;")),
    ));
    let slide5 = slide(
        &(text_shape(&run(
            "&lt;&lt;What factors lower your confidence level?&gt;&gt;",
        )) + &text_shape(&run(
            "&lt;&lt;What resources, support, or actions would help increase your confidence level?&gt;&gt;",
        ))),
    );
    let slide6 = slide(&text_shape(
        &(run("&lt;SOLUTION&gt;") + &run("&lt;PRODDELs&gt;") + &run("&lt;#&gt;")),
    ));

    let parts: Vec<(String, String)> = vec![
        ("ppt/_rels/presentation.xml.rels".to_string(), rels),
        ("ppt/slides/slide1.xml".to_string(), slide1),
        ("ppt/slides/slide2.xml".to_string(), slide2),
        ("ppt/slides/slide3.xml".to_string(), slide3),
        ("ppt/slides/slide4.xml".to_string(), slide4),
        ("ppt/slides/slide5.xml".to_string(), slide5),
        ("ppt/slides/slide6.xml".to_string(), slide6),
        (
            "ppt/slides/_rels/slide2.xml.rels".to_string(),
            chart_rels("chart1.xml"),
        ),
        (
            "ppt/slides/_rels/slide4.xml.rels".to_string(),
            chart_rels("chart2.xml"),
        ),
        ("ppt/charts/chart1.xml".to_string(), chart_xml().to_string()),
        ("ppt/charts/chart2.xml".to_string(), chart_xml().to_string()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    for (name, content) in &parts {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn survey_table() -> SurveyTable {
    let rows = [("Avery", "high"), ("Blake", "high"), ("Carol", "low")]
        .into_iter()
        .map(|(name, conf)| SurveyRow {
            release_info_1: "v1.2, 2025-08-01, extra, Summary 45".to_string(),
            release_info_2: "v2.0, 2025-12-01, Next summary 7".to_string(),
            confidence_1: conf.to_string(),
            confidence_2: "medium".to_string(),
            lowering_1: if name == "Blake" {
                String::new()
            } else {
                "Scope creep".to_string()
            },
            increasing_1: "More QA".to_string(),
            lowering_2: "Staffing".to_string(),
            increasing_2: "Budget".to_string(),
            respondent: name.to_string(),
        })
        .collect();
    SurveyTable::new(rows)
}

fn part_text(template: &Template, name: &str) -> String {
    String::from_utf8(template.part_bytes(name).unwrap().to_vec()).unwrap()
}

#[test]
fn renders_full_report() {
    let table = survey_table();
    let report = ReportData::derive(&table, "Alpha Product_1st July 2025.xlsx").unwrap();

    assert_eq!(report.release_1.counts, VoteCounts::new(2, 0, 1));
    assert_eq!(report.release_1.overall.to_string(), "HIGH");

    let mut template = Template::open(Cursor::new(build_template())).unwrap();
    assert_eq!(template.slide_count(), 6);
    render_report(&mut template, &report).unwrap();

    // Title slide: solution name and first release version.
    let slide1 = part_text(&template, "ppt/slides/slide1.xml");
    assert!(slide1.contains("<a:t>Alpha Product</a:t>"));
    assert!(slide1.contains("<a:t>v1.2</a:t>"));

    // Release 1 overview: token map, classification, exact count runs.
    let slide2 = part_text(&template, "ppt/slides/slide2.xml");
    assert!(slide2.contains("<a:t>v1.2 due 2025-08-01</a:t>"));
    assert!(slide2.contains("<a:t>HIGH</a:t>"));
    assert!(slide2.contains("<a:t>2</a:t>")); // <high>
    assert!(slide2.contains("<a:t>0</a:t>")); // <medium>
    assert!(slide2.contains("<a:t>1</a:t>")); // <low>
    assert!(slide2.contains("<a:t>3</a:t>")); // <#>

    // Release 1 chart cache equals the tally (2, 0, 1).
    let chart1 = part_text(&template, "ppt/charts/chart1.xml");
    assert!(chart1.contains("<c:v>Confidence Levels</c:v>"));
    assert!(chart1.contains("<c:pt idx=\"0\"><c:v>High</c:v></c:pt>"));
    assert!(chart1.contains("<c:pt idx=\"0\"><c:v>2</c:v></c:pt>"));
    assert!(chart1.contains("<c:pt idx=\"1\"><c:v>0</c:v></c:pt>"));
    assert!(chart1.contains("<c:pt idx=\"2\"><c:v>1</c:v></c:pt>"));

    // Release 1 factors: both bullet lists, separator kept for the row
    // with no lowering factor.
    let slide3 = part_text(&template, "ppt/slides/slide3.xml");
    assert!(!slide3.contains("What factors lower"));
    assert!(slide3.contains("<a:t>Scope creep — Avery</a:t>"));
    assert!(slide3.contains("<a:t> — Blake</a:t>"));
    assert!(slide3.contains("<a:t>More QA — Carol</a:t>"));

    // Release 2 overview and chart.
    let slide4 = part_text(&template, "ppt/slides/slide4.xml");
    assert!(slide4.contains("<a:t>v2.0</a:t>"));
    assert!(slide4.contains("<a:t>7</a:t>")); // <KEY>
    assert!(slide4.contains("<a:t>0</a:t>")); // <high> for release 2

    let chart2 = part_text(&template, "ppt/charts/chart2.xml");
    assert!(chart2.contains("<c:pt idx=\"1\"><c:v>3</c:v></c:pt>")); // medium = 3

    let slide5 = part_text(&template, "ppt/slides/slide5.xml");
    assert!(slide5.contains("<a:t>Staffing — Avery</a:t>"));
    assert!(slide5.contains("<a:t>Budget — Carol</a:t>"));

    // Summary slide combines both keys.
    let slide6 = part_text(&template, "ppt/slides/slide6.xml");
    assert!(slide6.contains("<a:t>45,7</a:t>"));
    assert!(slide6.contains("<a:t>Alpha Product</a:t>"));
    assert!(slide6.contains("<a:t>3</a:t>"));
}

#[test]
fn render_then_save_round_trips() {
    let table = survey_table();
    let report = ReportData::derive(&table, "survey.xlsx").unwrap();

    let mut template = Template::open(Cursor::new(build_template())).unwrap();
    render_report(&mut template, &report).unwrap();

    let mut buffer = Cursor::new(Vec::new());
    template.save(&mut buffer).unwrap();

    let reopened = Template::open(Cursor::new(buffer.into_inner())).unwrap();
    assert_eq!(reopened.slide_count(), 6);

    // No date pattern in the filename, so the default solution literal.
    let slide1 = part_text(&reopened, "ppt/slides/slide1.xml");
    assert!(slide1.contains("<a:t>SOLUTION</a:t>"));
}
