use sentinel_anchor::AnchorOutcome;
use sentinel_protocol::ResultPayload;

/// Risk band for a 0-100 score, matching the gauge thresholds of the web
/// report (green / orange / red).
pub fn risk_band(score: f64) -> &'static str {
    if score > 75.0 {
        "High"
    } else if score > 35.0 {
        "Moderate"
    } else {
        "Low"
    }
}

/// Formats an integer with thousands separators.
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders the terminal report: score, overview, risks with their evidence
/// links, suggestions, debug trace, and the annotated evidence context.
/// Unanchored risks are still listed in full, marked as a quote mismatch.
pub fn render_report(payload: &ResultPayload, outcome: &AnchorOutcome) -> String {
    let result = &payload.result;
    let mut out = String::new();

    out.push_str("ToS Sentinel report\n");
    out.push_str("===================\n\n");
    out.push_str(&format!(
        "Risk score: {:.0}/100 ({})\n",
        result.risk_score,
        risk_band(result.risk_score)
    ));
    out.push_str(&format!(
        "Total tokens: {}\n",
        group_digits(payload.token_usage.total_token)
    ));
    if let Some(engine) = &payload.debug_info.engine {
        out.push_str(&format!("Engine: {engine}\n"));
    }
    out.push('\n');

    if !result.overview.is_empty() {
        out.push_str(&format!("Overview: {}\n\n", result.overview));
    }

    out.push_str("Risks & violations\n");
    out.push_str("------------------\n");
    if result.risks.is_empty() {
        out.push_str("No significant risks found.\n");
    } else {
        for (idx, item) in result.risks.iter().enumerate() {
            let evidence = if outcome.is_matched(idx) {
                format!("evidence #{}", idx + 1)
            } else {
                "quote mismatch".to_string()
            };
            let source = if item.from_main_document() {
                String::new()
            } else {
                format!(" [{}]", item.source_name)
            };
            out.push_str(&format!(
                "{:>3}. [{}] {}{source} ({evidence})\n",
                idx + 1,
                item.severity,
                item.point,
            ));
        }
    }
    out.push('\n');

    out.push_str("Suggestions\n");
    out.push_str("-----------\n");
    if result.suggestions.is_empty() {
        out.push_str("No suggestions.\n");
    } else {
        for suggestion in &result.suggestions {
            out.push_str(&format!("- {suggestion}\n"));
        }
    }
    out.push('\n');

    let debug = &payload.debug_info;
    if !debug.knowledge_base.is_empty() {
        out.push_str("Knowledge base\n");
        out.push_str("--------------\n");
        for source in &debug.knowledge_base {
            out.push_str(&format!("- {source}\n"));
        }
        out.push('\n');
    }
    if !debug.retrieved_sources.is_empty() {
        out.push_str("Retrieved sources\n");
        out.push_str("-----------------\n");
        for source in &debug.retrieved_sources {
            out.push_str(&format!("- {source}\n"));
        }
        out.push('\n');
    }

    out.push_str("Evidence context\n");
    out.push_str("----------------\n");
    out.push_str(&outcome.annotated_text);
    if !outcome.annotated_text.ends_with('\n') {
        out.push('\n');
    }
    out
}
