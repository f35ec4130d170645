use chrono::{Local, TimeZone};
use stride_report::colours;
use stride_report::report::*;
use stride_report::{Document, Page, Pt};

fn threat(title: &str, severity: &str) -> Threat {
    Threat {
        title: title.to_string(),
        category: "Tampering".to_string(),
        severity: Severity::parse(severity),
        description: "Requests can be modified in transit.".to_string(),
        ..Threat::default()
    }
}

fn pages(document: &Document) -> Vec<&Page> {
    document.pages_in_order().collect()
}

fn page_with<'a>(document: &'a Document, text: &str) -> Option<(usize, &'a Page)> {
    document
        .pages_in_order()
        .enumerate()
        .find(|(_, page)| page.has_text(text))
}

#[test]
fn reports_without_threats_have_no_threat_pages() {
    let model = ReportModel {
        system_name: "Inventory".to_string(),
        summary: "Nothing of note.".to_string(),
        ..ReportModel::default()
    };
    let document = ReportRenderer::default()
        .compose(&model, Local::now())
        .expect("composes");

    assert_eq!(document.page_count(), 1);
    assert!(page_with(&document, "Identified Security Threats").is_none());
    assert!(page_with(&document, "Mitigation Recommendations").is_none());
    assert!(page_with(&document, "Page 1 of 1").is_some());
}

#[test]
fn appendix_numbering_matches_the_threat_boxes() {
    let mut threats = vec![
        threat("Session fixation", "high"),
        threat("Log tampering", "medium"),
        threat("Privilege escalation", "critical"),
    ];
    threats[0].mitigation = Some("Rotate session ids on login.".to_string());
    threats[2].mitigation = Some("Enforce least privilege.".to_string());
    let model = ReportModel {
        threats,
        ..ReportModel::default()
    };
    let document = ReportRenderer::default()
        .compose(&model, Local::now())
        .expect("composes");

    let (threat_page, _) = page_with(&document, "Identified Security Threats").expect("threats");
    let (appendix_page, appendix) =
        page_with(&document, "Mitigation Recommendations").expect("appendix");
    assert!(appendix_page > threat_page);

    for (index, threat) in model.threats.iter().enumerate() {
        let heading = threat_heading(index, threat);
        let (boxed_on, _) = page_with(&document, &heading).expect("threat box");
        assert!(boxed_on >= threat_page && boxed_on < appendix_page);
        assert_eq!(appendix.has_text(&heading), threat.mitigation().is_some());
    }
    assert!(appendix.has_text("3. Privilege escalation"));
    assert!(!appendix.has_text("2. Log tampering"));
}

#[test]
fn threats_without_mitigations_skip_the_appendix() {
    let model = ReportModel {
        threats: vec![threat("Replay", "low")],
        ..ReportModel::default()
    };
    let document = ReportRenderer::default()
        .compose(&model, Local::now())
        .expect("composes");
    assert_eq!(document.page_count(), 2);
    assert!(page_with(&document, "Mitigation Recommendations").is_none());
}

#[test]
fn overflowing_text_breaks_once_at_the_overflowing_line() {
    let mut canvas = Canvas::new(&ReportConfig::default()).expect("canvas");
    // leave room for a single line
    canvas.space(Pt::from(stride_report::Mm(250.0)));
    canvas.paragraph("first\nsecond\nthird", 11.0);

    assert_eq!(canvas.state().page_count(), 2);
    let pages = canvas.state().pages();
    let on = |page: &Page| -> Vec<String> { page.spans().map(|s| s.text.clone()).collect() };
    assert_eq!(on(&pages[0]), vec!["first"]);
    assert_eq!(on(&pages[1]), vec!["second", "third"]);
}

#[test]
fn long_summaries_flow_without_losing_lines() {
    let summary = lipsum::lipsum(2000);
    let model = ReportModel {
        summary: summary.clone(),
        ..ReportModel::default()
    };
    let renderer = ReportRenderer::default();
    let at = Local::now();
    let generated = at.format("%Y-%m-%d %H:%M:%S").to_string();
    let document = renderer.compose(&model, at).expect("composes");
    assert!(document.page_count() > 1);

    let canvas = Canvas::new(renderer.config()).expect("canvas");
    let style = TextStyle::regular(11.0, colours::BODY);
    let expected = canvas.wrap(&summary, style, renderer.config().geometry.content_width());
    let placed: Vec<String> = pages(&document)
        .into_iter()
        .flat_map(|page| page.spans())
        .filter(|span| span.font.size == Pt(11.0) && span.colour == colours::BODY)
        .filter(|span| span.text != UNKNOWN_SYSTEM && span.text != generated)
        .map(|span| span.text.clone())
        .collect();
    assert_eq!(placed, expected);
}

#[test]
fn component_tables_repeat_their_header() {
    let components = (0..70)
        .map(|i| Component {
            name: format!("component-{i}"),
            kind: "service".to_string(),
            description: "Handles a slice of the traffic.".to_string(),
            technologies: vec!["rust".to_string()],
        })
        .collect();
    let model = ReportModel {
        architecture: Architecture {
            components,
            ..Architecture::default()
        },
        ..ReportModel::default()
    };
    let document = ReportRenderer::default()
        .compose(&model, Local::now())
        .expect("composes");

    let table_pages: Vec<&Page> = pages(&document)
        .into_iter()
        .filter(|page| page.spans().any(|s| s.text.starts_with("component-")))
        .collect();
    assert!(table_pages.len() > 1);
    for page in table_pages {
        let header: Vec<&str> = page
            .spans()
            .filter(|s| s.font.size == Pt(10.0) && s.colour == colours::WHITE)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(header, vec!["Component", "Type", "Description"]);
    }
}

#[test]
fn severity_colours_are_pinned() {
    for label in ["critical", "CRITICAL", "Critical"] {
        assert_eq!(Severity::parse(label).colour().to_rgb_bytes(), (211, 47, 47));
    }
    assert_eq!(Severity::parse("high").colour().to_rgb_bytes(), (245, 124, 0));
    assert_eq!(Severity::parse("medium").colour().to_rgb_bytes(), (251, 192, 45));
    assert_eq!(Severity::parse("low").colour().to_rgb_bytes(), (56, 142, 60));
    assert_eq!(Severity::parse("catastrophic").colour(), Severity::Medium.colour());
    assert_eq!(Severity::default().colour(), Severity::Medium.colour());
}

#[test]
fn file_names_differ_only_in_the_system_name() {
    let at = Local
        .timestamp_millis_opt(1_717_171_717_171)
        .single()
        .expect("valid timestamp");
    let renderer = ReportRenderer::default();
    let a = renderer
        .render_at(
            &ReportModel {
                system_name: "Payments API".to_string(),
                ..ReportModel::default()
            },
            at,
        )
        .expect("renders");
    let b = renderer
        .render_at(
            &ReportModel {
                system_name: "Auth/Service 2".to_string(),
                ..ReportModel::default()
            },
            at,
        )
        .expect("renders");
    assert_eq!(a.file_name, "stride_analysis_payments_api_1717171717171.pdf");
    assert_eq!(b.file_name, "stride_analysis_auth_service_2_1717171717171.pdf");
}

#[test]
fn full_and_bare_threats_render_together() {
    let critical = Threat {
        title: "SQL injection in search".to_string(),
        category: "Tampering".to_string(),
        severity: Severity::parse("CRITICAL"),
        description: lipsum::lipsum(120),
        affected_components: vec!["search-api".to_string(), "postgres".to_string()],
        attack_scenario: Some("An attacker crafts a search term.".to_string()),
        mitigation: Some("Use parameterised queries.".to_string()),
        references: vec!["CWE-89".to_string()],
    };
    let low = Threat {
        severity: Severity::parse("LOW"),
        ..Threat::default()
    };
    let model = ReportModel {
        system_name: "Search".to_string(),
        threats: vec![critical, low],
        ..ReportModel::default()
    };

    let renderer = ReportRenderer::default();
    let document = renderer.compose(&model, Local::now()).expect("composes");
    let (_, threat_page) = page_with(&document, "1. SQL injection in search").expect("box");
    assert!(threat_page.has_text("2. Untitled Threat"));
    assert!(threat_page.has_text("No description"));
    assert!(threat_page.has_text("CRITICAL"));
    assert!(threat_page.has_text("LOW"));
    let affected_lines = pages(&document)
        .into_iter()
        .flat_map(|page| page.spans())
        .filter(|span| span.text == "Affected: ")
        .count();
    assert_eq!(affected_lines, 1);

    let rendered = renderer.render(&model).expect("renders");
    assert!(rendered.bytes.starts_with(b"%PDF-"));
    assert_eq!(rendered.page_count, 3);
}

#[test]
fn job_results_render_end_to_end() {
    let json = r#"{
        "status": "completed",
        "error": null,
        "data": {
            "system_name": "Ledger",
            "summary": "A small ledger service.",
            "diagram_image": "data:image/png;base64,bm90IGFuIGltYWdl",
            "architecture": {
                "description": "One API in front of one database.",
                "components": [
                    { "name": "api", "type": "service", "description": "Public API", "technologies": ["rust"] },
                    { "name": "db", "type": null, "description": null }
                ],
                "data_flows": ["client -> api", "api -> db"],
                "trust_boundaries": ["internet / dmz"]
            },
            "threats": [
                {
                    "title": "Spoofed client",
                    "category": "Spoofing",
                    "severity": "High",
                    "description": "Clients are not authenticated.",
                    "affected_components": ["api"],
                    "mitigation": "Require mutual TLS."
                }
            ]
        }
    }"#;
    let model = JobResult::from_json(json)
        .expect("valid json")
        .into_report()
        .expect("completed job");

    let mut config = ReportConfig::default();
    config.compress(false);
    let renderer = ReportRenderer::new(config);
    let document = renderer.compose(&model, Local::now()).expect("composes");
    assert!(page_with(&document, IMAGE_PLACEHOLDER).is_some());
    assert!(page_with(&document, "client -> api").is_some());
    assert!(page_with(&document, "N/A").is_some());
    assert_eq!(document.outline.entries.len(), 5);

    let rendered = renderer.render(&model).expect("renders");
    let text = String::from_utf8_lossy(&rendered.bytes);
    assert!(text.contains("(Page 3 of 3)"));
    assert!(text.contains("/Outlines"));
}

#[test]
fn unfinished_jobs_are_not_rendered() {
    let job = JobResult::from_json(r#"{"status": "pending", "data": null}"#).expect("valid json");
    let error = job.into_report().expect_err("not completed");
    assert!(matches!(error, ReportError::JobNotReady(JobStatus::Pending)));
    assert_eq!(error.to_string(), "job is still pending");
}

#[test]
fn broken_fonts_fail_the_render() {
    let mut config = ReportConfig::default();
    config.truetype_fonts(vec![1, 2, 3], vec![4, 5, 6]);
    let result = ReportRenderer::new(config).render(&ReportModel::default());
    assert!(matches!(result, Err(ReportError::Font(_))));
}
