use sentinel_anchor::AnchorOutcome;
use sentinel_protocol::{ResultPayload, RiskItem};

use crate::render::risk_band;

/// Stylesheet carried over from the web report.
const STYLE: &str = "\
html { scroll-behavior: smooth; }
body { font-family: sans-serif; max-width: 960px; margin: 2em auto; color: #222; }
.highlight { background-color: #ffff00; color: black; padding: 2px 4px; border-radius: 4px; font-weight: bold; border: 1px solid #e6b800; }
.evidence-link { font-size: 0.8em; color: #d9534f; text-decoration: none; margin-left: 8px; cursor: pointer; background: #fdf2f2; padding: 2px 6px; border-radius: 4px; border: 1px solid #ebccd1; }
.evidence-link:hover { background: #f2dede; }
.badge-high { background-color: #d9534f; color: white; padding: 2px 6px; border-radius: 4px; font-size: 0.8em; margin-right: 5px; }
.badge-medium { background-color: #f0ad4e; color: white; padding: 2px 6px; border-radius: 4px; font-size: 0.8em; margin-right: 5px; }
.badge-low { background-color: #5bc0de; color: white; padding: 2px 6px; border-radius: 4px; font-size: 0.8em; margin-right: 5px; }
.source-badge { font-size: 0.75em; background-color: #e0e0e0; color: #333; padding: 2px 6px; border-radius: 10px; margin-left: 8px; border: 1px solid #ccc; }
.mismatch { color: gray; font-size: 0.8em; margin-left: 5px; }
.evidence-panel { border: 1px solid #ccc; border-radius: 5px; padding: 1em; max-height: 600px; overflow-y: scroll; background: #fafafa; }
";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders the evidence panel from the raw source text and the accepted
/// spans, escaping the text segments and re-applying the anchor wrappers so
/// the markup stays well-formed regardless of what the document contains.
fn render_evidence_panel(source: &str, risks: &[RiskItem], outcome: &AnchorOutcome) -> String {
    let mut spans: Vec<(usize, usize, usize)> = outcome
        .records
        .iter()
        .filter_map(|record| record.span.map(|(s, e)| (s, e, record.item_index)))
        .collect();
    spans.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (start, end, item_index) in spans {
        let n = item_index + 1;
        let severity = risks[item_index].severity;
        out.push_str(&escape_html(&source[cursor..start]));
        out.push_str(&format!(
            "<span id='evidence-{n}' class='highlight'><b>[{n}-{severity}]</b> {}</span>",
            escape_html(&source[start..end])
        ));
        cursor = end;
    }
    out.push_str(&escape_html(&source[cursor..]));
    out.replace('\n', "<br>")
}

fn render_risk_list(risks: &[RiskItem], outcome: &AnchorOutcome) -> String {
    if risks.is_empty() {
        return "<p>No significant risks found.</p>\n".to_string();
    }
    let mut out = String::from("<ul style='padding-left: 20px; list-style: none;'>\n");
    for (idx, item) in risks.iter().enumerate() {
        let n = idx + 1;
        let link = if outcome.is_matched(idx) {
            format!("<a href='#evidence-{n}' class='evidence-link'>Evidence #{n}</a>")
        } else {
            "<span class='mismatch'>(Quote mismatch)</span>".to_string()
        };
        let source = if item.from_main_document() {
            String::new()
        } else {
            format!(
                "<span class='source-badge'>{}</span>",
                escape_html(&item.source_name)
            )
        };
        out.push_str(&format!(
            "<li style='margin-bottom: 15px;'><span class='{}'>{}</span><b>{}</b>{source}{link}</li>\n",
            item.severity.badge_class(),
            item.severity,
            escape_html(&item.point),
        ));
    }
    out.push_str("</ul>\n");
    out
}

/// Builds the standalone HTML report.
pub fn render_html(payload: &ResultPayload, outcome: &AnchorOutcome) -> String {
    let result = &payload.result;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n");
    out.push_str("<title>ToS Sentinel report</title>\n");
    out.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));

    out.push_str("<h1>ToS Sentinel report</h1>\n");
    out.push_str(&format!(
        "<p><b>Risk score:</b> {:.0}/100 ({})",
        result.risk_score,
        risk_band(result.risk_score)
    ));
    out.push_str(&format!(
        " &middot; <b>Total tokens:</b> {}",
        payload.token_usage.total_token
    ));
    if let Some(engine) = &payload.debug_info.engine {
        out.push_str(&format!(" &middot; <b>Engine:</b> {}", escape_html(engine)));
    }
    out.push_str("</p>\n");

    if !result.overview.is_empty() {
        out.push_str(&format!(
            "<p><b>Overview:</b> {}</p>\n",
            escape_html(&result.overview)
        ));
    }

    out.push_str("<h2>Risks &amp; violations</h2>\n");
    out.push_str(&render_risk_list(&result.risks, outcome));

    out.push_str("<h2>Suggestions</h2>\n");
    if result.suggestions.is_empty() {
        out.push_str("<p>No suggestions.</p>\n");
    } else {
        out.push_str("<ul>\n");
        for suggestion in &result.suggestions {
            out.push_str(&format!("<li>{}</li>\n", escape_html(suggestion)));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("<h2>Evidence context</h2>\n<div class='evidence-panel'>\n");
    out.push_str(&render_evidence_panel(
        &payload.scraped_content,
        &result.risks,
        outcome,
    ));
    out.push_str("\n</div>\n");

    let debug = &payload.debug_info;
    if !debug.knowledge_base.is_empty() {
        out.push_str("<h2>Knowledge base</h2>\n<ul>\n");
        for source in &debug.knowledge_base {
            out.push_str(&format!("<li><code>{}</code></li>\n", escape_html(source)));
        }
        out.push_str("</ul>\n");
    }
    if !debug.retrieved_sources.is_empty() {
        out.push_str("<h2>Retrieved sources</h2>\n<ul>\n");
        for source in &debug.retrieved_sources {
            out.push_str(&format!("<li><code>{}</code></li>\n", escape_html(source)));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sentinel_anchor::anchor;
    use sentinel_protocol::{AnalysisResult, RiskItem, Severity};

    fn payload_with_risks(scraped: &str, risks: Vec<RiskItem>) -> ResultPayload {
        ResultPayload {
            result: AnalysisResult {
                risks,
                suggestions: vec![],
                overview: String::new(),
                risk_score: 10.0,
            },
            scraped_content: scraped.to_string(),
            ..ResultPayload::default()
        }
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>&"'"#),
            "&lt;b&gt;&amp;&quot;&#39;"
        );
    }

    #[test]
    fn evidence_panel_escapes_source_but_keeps_anchor_markup() {
        let scraped = "a <script> tag and the offending clause here";
        let risks = vec![RiskItem {
            point: "Bad clause".to_string(),
            quote: "offending clause here".to_string(),
            severity: Severity::High,
            source_name: "Main ToS".to_string(),
        }];
        let payload = payload_with_risks(scraped, risks);
        let outcome = anchor(&payload.scraped_content, &payload.result.risks);
        let html = render_html(&payload, &outcome);

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<span id='evidence-1' class='highlight'><b>[1-High]</b> offending clause here</span>"));
        assert!(html.contains("<a href='#evidence-1' class='evidence-link'>Evidence #1</a>"));
    }

    #[test]
    fn mismatched_risk_gets_gray_marker_not_link() {
        let payload = payload_with_risks(
            "nothing matches here",
            vec![RiskItem {
                point: "Unfounded claim".to_string(),
                quote: "completely absent quote".to_string(),
                severity: Severity::Low,
                source_name: "Privacy Policy".to_string(),
            }],
        );
        let outcome = anchor(&payload.scraped_content, &payload.result.risks);
        let html = render_html(&payload, &outcome);

        assert!(html.contains("(Quote mismatch)"));
        assert!(!html.contains("evidence-link'>Evidence #1"));
        assert!(html.contains("<span class='source-badge'>Privacy Policy</span>"));
    }

    #[test]
    fn newlines_become_breaks_in_evidence_panel() {
        let payload = payload_with_risks("line one\nline two", vec![]);
        let outcome = anchor(&payload.scraped_content, &payload.result.risks);
        let html = render_html(&payload, &outcome);
        assert!(html.contains("line one<br>line two"));
    }
}
