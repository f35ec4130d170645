//! Walks a [ReportModel] section by section, in a fixed order, and lays each
//! one out on a [Canvas]. Sections without data are left out entirely.

use crate::colour::colours;
use crate::page::{Paint, Shape};
use crate::report::canvas::{Canvas, TextStyle};
use crate::report::table::{Column, Table};
use crate::report::{mm, ReportConfig, ReportModel, Severity, Threat};
use chrono::{DateTime, Local};

pub const UNKNOWN_SYSTEM: &str = "Unrecognized system";
pub const NO_SUMMARY: &str = "No summary available.";
pub const UNTITLED_THREAT: &str = "Untitled Threat";

/// Height reserved for every threat box; boxes are never split across pages
const THREAT_BOX_HEIGHT: f32 = 45.0;
/// How far the cursor moves past each threat box
const THREAT_BOX_ADVANCE: f32 = 50.0;
/// Only this many wrapped description lines fit in a threat box
const THREAT_DESCRIPTION_LINES: usize = 3;

/// `fallback` if `text` is blank
fn or_fallback<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() {
        fallback
    } else {
        text
    }
}

/// The numbered heading used for a threat both in its box and in the
/// mitigation appendix. `index` is 0-based.
pub fn threat_heading(index: usize, threat: &Threat) -> String {
    format!("{}. {}", index + 1, or_fallback(&threat.title, UNTITLED_THREAT))
}

/// The one line summary of how many threats there are of each severity.
/// Unrecognized severities only count towards the total.
pub fn threat_overview(model: &ReportModel) -> String {
    format!(
        "Total threats: {} | Critical: {} | High: {} | Medium: {} | Low: {}",
        model.threats.len(),
        model.count_severity(&Severity::Critical),
        model.count_severity(&Severity::High),
        model.count_severity(&Severity::Medium),
        model.count_severity(&Severity::Low),
    )
}

pub(crate) fn compose(
    canvas: &mut Canvas,
    model: &ReportModel,
    config: &ReportConfig,
    generated_at: DateTime<Local>,
) {
    header(canvas, model, config, generated_at);
    summary(canvas, model);
    diagram(canvas, model);
    architecture(canvas, model);
    threats(canvas, model);
    mitigations(canvas, model);
}

fn header(
    canvas: &mut Canvas,
    model: &ReportModel,
    config: &ReportConfig,
    generated_at: DateTime<Local>,
) {
    canvas.title(&config.title, 22.0);
    canvas.space(mm(3.0));
    canvas.key_value("System: ", or_fallback(&model.system_name, UNKNOWN_SYSTEM), 11.0);
    canvas.key_value(
        "Generated: ",
        &generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        11.0,
    );
    canvas.rule();
    canvas.space(mm(3.0));
}

fn summary(canvas: &mut Canvas, model: &ReportModel) {
    canvas.subtitle("Summary", 16.0);
    canvas.bookmark("Summary");
    canvas.paragraph(or_fallback(&model.summary, NO_SUMMARY), 11.0);
    canvas.space(mm(5.0));
}

fn diagram(canvas: &mut Canvas, model: &ReportModel) {
    let Some(image) = &model.diagram_image else {
        return;
    };
    canvas.subtitle("Architecture Diagram", 16.0);
    canvas.bookmark("Architecture Diagram");
    canvas.image(image);
    canvas.space(mm(5.0));
}

fn architecture(canvas: &mut Canvas, model: &ReportModel) {
    let architecture = &model.architecture;
    if architecture.is_empty() {
        log::debug!("no architecture details, skipping the architecture sections");
        return;
    }
    let mut bookmarked = false;
    let mut section = |canvas: &mut Canvas, title: &str| {
        canvas.subtitle(title, 16.0);
        if !bookmarked {
            canvas.bookmark("Architecture");
            bookmarked = true;
        }
    };

    if !architecture.description.trim().is_empty() {
        section(canvas, "Architecture Overview");
        canvas.paragraph(&architecture.description, 11.0);
        canvas.space(mm(5.0));
    }

    if !architecture.components.is_empty() {
        section(canvas, "System Components");
        let mut table = Table::new(vec![
            Column::new("Component", mm(40.0)),
            Column::new("Type", mm(30.0)),
            Column::new("Description", mm(90.0)),
        ]);
        for component in architecture.components.iter() {
            table.push_row(vec![
                or_fallback(&component.name, "Unknown").to_string(),
                or_fallback(&component.kind, "N/A").to_string(),
                or_fallback(&component.description, "No description").to_string(),
            ]);
        }
        canvas.table(&table);
        canvas.space(mm(15.0));
    }

    if !architecture.data_flows.is_empty() {
        section(canvas, "Data Flows");
        canvas.bullet_list(&architecture.data_flows, 11.0);
        canvas.space(mm(5.0));
    }

    if !architecture.trust_boundaries.is_empty() {
        section(canvas, "Trust Boundaries");
        canvas.bullet_list(&architecture.trust_boundaries, 11.0);
        canvas.space(mm(5.0));
    }
}

fn threats(canvas: &mut Canvas, model: &ReportModel) {
    if model.threats.is_empty() {
        return;
    }

    canvas.break_page();
    canvas.title("Identified Security Threats", 18.0);
    canvas.bookmark("Threats");
    canvas.space(mm(5.0));

    canvas.paragraph(&threat_overview(model), 10.0);
    canvas.rule();
    canvas.space(mm(5.0));

    for (index, threat) in model.threats.iter().enumerate() {
        threat_box(canvas, index, threat);
    }
    log::debug!("laid out {} threat boxes", model.threats.len());
}

/// A fixed-size bordered box: the numbered title and severity badge, the
/// category, the start of the description and the affected components
fn threat_box(canvas: &mut Canvas, index: usize, threat: &Threat) {
    canvas.state_mut().ensure_space(mm(THREAT_BOX_HEIGHT));

    let geometry = canvas.geometry();
    let left = geometry.left();
    let text_x = left + mm(3.0);
    let badge_right = left + mm(160.0);
    let top = canvas.state().cursor_y();
    let colour = threat.severity.colour();

    let border = canvas.page_rect(left, top - mm(5.0), mm(170.0), mm(THREAT_BOX_HEIGHT));
    canvas.place_shape(
        Shape::Rect(border),
        Paint::Stroke {
            colour,
            width: mm(0.5),
        },
    );

    let title_style = TextStyle::bold(12.0, colours::LABEL);
    let title_width = badge_right - mm(30.0) - text_x - mm(2.0);
    let title = canvas.truncate(&threat_heading(index, threat), title_style, title_width);
    canvas.place_text(&title, text_x, top, title_style);
    canvas.badge(&threat.severity.label(), colour, badge_right, top - mm(8.0));

    let mut y = top + mm(7.0);
    let label_style = TextStyle::bold(9.0, colours::MUTED);
    let category_label = "Category: ";
    canvas.place_text(category_label, text_x, y, label_style);
    canvas.place_text(
        or_fallback(&threat.category, "N/A"),
        text_x + canvas.measure(category_label, label_style),
        y,
        TextStyle::regular(9.0, colours::MUTED),
    );
    y += mm(6.0);

    let description_style = TextStyle::regular(9.0, colours::BODY);
    let description = canvas.wrap(
        or_fallback(&threat.description, "No description"),
        description_style,
        mm(160.0),
    );
    for line in description.iter().take(THREAT_DESCRIPTION_LINES) {
        canvas.place_text(line, text_x, y, description_style);
        y += mm(5.0);
    }

    if !threat.affected_components.is_empty() {
        y += mm(2.0);
        let label_style = TextStyle::bold(8.0, colours::BODY);
        let value_style = TextStyle::regular(8.0, colours::BODY);
        let affected_label = "Affected: ";
        let label_width = canvas.measure(affected_label, label_style);
        canvas.place_text(affected_label, text_x, y, label_style);
        let affected = canvas.wrap(
            &threat.affected_components.join(", "),
            value_style,
            mm(150.0) - label_width,
        );
        if let Some(first) = affected.first() {
            canvas.place_text(first, text_x + label_width, y, value_style);
        }
    }

    canvas.space(mm(THREAT_BOX_ADVANCE));
}

fn mitigations(canvas: &mut Canvas, model: &ReportModel) {
    if !model.has_mitigations() {
        return;
    }

    canvas.break_page();
    canvas.title("Mitigation Recommendations", 18.0);
    canvas.bookmark("Mitigations");
    canvas.space(mm(5.0));

    for (index, threat) in model.threats.iter().enumerate() {
        let Some(mitigation) = threat.mitigation() else {
            continue;
        };
        canvas.state_mut().ensure_space(mm(25.0));
        let heading = canvas.truncate(
            &threat_heading(index, threat),
            TextStyle::bold(12.0, colours::SUBTITLE),
            canvas.geometry().content_width(),
        );
        canvas.subtitle(&heading, 12.0);
        canvas.paragraph(mitigation, 10.0);
        canvas.space(mm(5.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::layout::PageGeometry;
    use crate::units::Pt;

    fn threat(title: &str, severity: &str) -> Threat {
        Threat {
            title: title.to_string(),
            severity: Severity::parse(severity),
            ..Threat::default()
        }
    }

    fn compose_document(model: &ReportModel) -> Document {
        let config = ReportConfig::default();
        let mut canvas = Canvas::new(&config).expect("helvetica always loads");
        compose(&mut canvas, model, &config, Local::now());
        canvas.finish().0
    }

    #[test]
    fn overview_counts_recognised_severities() {
        let model = ReportModel {
            threats: vec![
                threat("a", "critical"),
                threat("b", "HIGH"),
                threat("c", "High"),
                threat("d", "bogus"),
                threat("e", ""),
            ],
            ..ReportModel::default()
        };
        assert_eq!(
            threat_overview(&model),
            "Total threats: 5 | Critical: 1 | High: 2 | Medium: 0 | Low: 0"
        );
    }

    #[test]
    fn long_mitigation_headings_stay_inside_the_margins() {
        let mut long = threat(&"Unvalidated redirect ".repeat(12), "high");
        long.mitigation = Some("Allow-list redirect targets.".to_string());
        let model = ReportModel {
            threats: vec![long],
            ..ReportModel::default()
        };
        let document = compose_document(&model);
        let geometry = PageGeometry::default();
        let appendix = document.page(2).expect("appendix page");
        let heading = appendix
            .spans()
            .find(|span| span.text.starts_with("1. "))
            .expect("numbered heading");
        assert!(heading.text.ends_with("..."));
        let font = crate::font::Font::standard(crate::font::StandardFont::HelveticaBold);
        let right = heading.coords.0 + font.width_of_text(&heading.text, heading.font.size);
        assert!(right.0 <= geometry.right().0 + 1e-3);
    }

    #[test]
    fn blank_architectures_add_no_sections() {
        let mut model = ReportModel::default();
        model.architecture.description = "   ".to_string();
        let document = compose_document(&model);
        assert!(document
            .outline
            .entries
            .iter()
            .all(|entry| entry.title != "Architecture"));
        assert!(!document.page(0).expect("page").has_text("Architecture Overview"));
    }

    #[test]
    fn headings_fall_back_for_missing_titles() {
        assert_eq!(threat_heading(0, &threat("", "low")), "1. Untitled Threat");
        assert_eq!(threat_heading(4, &threat("Replay", "low")), "5. Replay");
    }

    #[test]
    fn empty_models_are_a_single_page_with_fallbacks() {
        let document = compose_document(&ReportModel::default());
        assert_eq!(document.page_count(), 1);
        let page = document.page(0).expect("first page");
        assert!(page.has_text(UNKNOWN_SYSTEM));
        assert!(page.has_text(NO_SUMMARY));
        assert!(!page.has_text("System Components"));
    }

    #[test]
    fn threat_boxes_never_straddle_pages() {
        let model = ReportModel {
            threats: (0..12).map(|i| threat(&format!("t{i}"), "low")).collect(),
            ..ReportModel::default()
        };
        let document = compose_document(&model);
        // summary page, then the threats
        assert!(document.page_count() >= 3);
        let geometry = PageGeometry::default();
        let page_height = geometry.page_height();
        for page in document.pages_in_order() {
            for shape in page.shapes() {
                if let Shape::Rect(rect) = shape.shape {
                    assert!(rect.y2 <= page_height);
                    assert!(rect.y1 >= geometry.to_page_y(geometry.content_bottom) - mm(1.0));
                }
            }
        }
    }

    #[test]
    fn descriptions_are_clipped_to_three_lines() {
        let mut long = threat("Long", "medium");
        long.description = lipsum::lipsum(200);
        let model = ReportModel {
            threats: vec![long],
            ..ReportModel::default()
        };
        let document = compose_document(&model);
        let threat_page = document.page(1).expect("threat page");
        let description_lines = threat_page
            .spans()
            .filter(|span| span.font.size == Pt(9.0))
            .filter(|span| span.colour == colours::BODY)
            .count();
        assert_eq!(description_lines, THREAT_DESCRIPTION_LINES);
    }
}
