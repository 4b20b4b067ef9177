use crate::error::Result;
use crate::pattern::{build_pattern, tokenize};
use sentinel_protocol::{RiskItem, Severity};

/// Quotes at or below this many characters (after trimming) are too short to
/// anchor reliably and are skipped.
const MIN_QUOTE_CHARS: usize = 3;

/// Anchoring verdict for one risk item. Records come back in input order,
/// exactly one per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub item_index: usize,
    pub matched: bool,
    /// `evidence-{n}` with a 1-based n; present iff `matched`.
    pub anchor_id: Option<String>,
    /// Byte span into the original source text; present iff `matched`.
    pub span: Option<(usize, usize)>,
}

impl MatchRecord {
    fn unmatched(item_index: usize) -> Self {
        Self {
            item_index,
            matched: false,
            anchor_id: None,
            span: None,
        }
    }
}

/// Result of anchoring a batch of risk items against one source text.
#[derive(Debug, Clone)]
pub struct AnchorOutcome {
    /// Source text with each confirmed match wrapped in an anchor span.
    pub annotated_text: String,
    pub records: Vec<MatchRecord>,
}

impl AnchorOutcome {
    pub fn is_matched(&self, item_index: usize) -> bool {
        self.records
            .get(item_index)
            .is_some_and(|record| record.matched)
    }
}

struct Accepted {
    span: (usize, usize),
    item_index: usize,
    severity: Severity,
}

/// Anchors each risk item's quote into `source_text`.
///
/// Items are processed in input order. Each confirmed match consumes its
/// span: a later item can never claim text an earlier one already annotated,
/// so it either matches a distinct remaining occurrence or reports
/// unmatched. Failures during pattern construction or search downgrade the
/// item to `matched = false`; one bad quote never aborts the batch.
pub fn anchor(source_text: &str, risks: &[RiskItem]) -> AnchorOutcome {
    let mut accepted: Vec<Accepted> = Vec::new();
    let mut records = Vec::with_capacity(risks.len());

    for (idx, item) in risks.iter().enumerate() {
        match anchor_item(source_text, item, &accepted) {
            Ok(Some(span)) => {
                records.push(MatchRecord {
                    item_index: idx,
                    matched: true,
                    anchor_id: Some(format!("evidence-{}", idx + 1)),
                    span: Some(span),
                });
                accepted.push(Accepted {
                    span,
                    item_index: idx,
                    severity: item.severity,
                });
            }
            Ok(None) => records.push(MatchRecord::unmatched(idx)),
            Err(err) => {
                log::debug!("risk #{} not anchored: {err}", idx + 1);
                records.push(MatchRecord::unmatched(idx));
            }
        }
    }

    AnchorOutcome {
        annotated_text: render(source_text, &accepted),
        records,
    }
}

fn anchor_item(
    source_text: &str,
    item: &RiskItem,
    accepted: &[Accepted],
) -> Result<Option<(usize, usize)>> {
    let quote = item.quote.trim();
    if quote.chars().count() <= MIN_QUOTE_CHARS {
        return Ok(None);
    }
    let tokens = tokenize(quote);
    let pattern = build_pattern(&tokens)?;
    for found in pattern.find_iter(source_text) {
        let span = (found.start(), found.end());
        if accepted.iter().all(|prior| !overlaps(prior.span, span)) {
            return Ok(Some(span));
        }
    }
    Ok(None)
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Splices the accepted spans into the source text, left to right. The
/// matched text is embedded unmodified inside the wrapper.
fn render(source_text: &str, accepted: &[Accepted]) -> String {
    let mut ordered: Vec<&Accepted> = accepted.iter().collect();
    ordered.sort_by_key(|a| a.span.0);

    let mut out = String::with_capacity(source_text.len() + ordered.len() * 80);
    let mut cursor = 0;
    for a in ordered {
        let (start, end) = a.span;
        let n = a.item_index + 1;
        out.push_str(&source_text[cursor..start]);
        out.push_str(&format!(
            "<span id='evidence-{n}' class='highlight'><b>[{n}-{}]</b> {}</span>",
            a.severity,
            &source_text[start..end],
        ));
        cursor = end;
    }
    out.push_str(&source_text[cursor..]);
    out
}
