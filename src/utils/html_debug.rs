// src/utils/html_debug.rs
use std::path::Path;

use regex::Regex;

use crate::extractors::table::STATEMENT_HEADING_RE;
use crate::utils::error::AppError;

const DEBUG_STYLE: &str = "<style>\n\
    mark.statement-heading { background-color: #90EE90; outline: 2px solid #2E8B57; }\n\
    </style>\n";

/// Wraps every regex match in `html` with a `<mark>` so the candidate
/// headings stand out when the filing is opened in a browser.
/// Matches overlapping an earlier one, or sitting inside a tag (an attribute
/// value), are skipped.
pub fn annotate_matches(html: &str, patterns: &[Regex]) -> String {
    let mut spans: Vec<(usize, usize)> = patterns
        .iter()
        .flat_map(|re| re.find_iter(html).map(|m| (m.start(), m.end())))
        .filter(|&(start, _)| !inside_tag(html, start))
        .collect();
    spans.sort_unstable();

    let mut out = String::with_capacity(html.len() + DEBUG_STYLE.len() + spans.len() * 48);
    out.push_str(DEBUG_STYLE);

    let mut last = 0;
    for (index, (start, end)) in spans.into_iter().enumerate() {
        if start < last {
            continue;
        }
        out.push_str(&html[last..start]);
        out.push_str(&format!(
            "<mark class=\"statement-heading\" title=\"match {} @ {}-{}\">",
            index, start, end
        ));
        out.push_str(&html[start..end]);
        out.push_str("</mark>");
        last = end;
    }
    out.push_str(&html[last..]);
    out
}

// An unclosed '<' before `pos` means we are between a tag's angle brackets.
fn inside_tag(html: &str, pos: usize) -> bool {
    let before = &html[..pos];
    match (before.rfind('<'), before.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Writes a copy of the filing with income statement headings highlighted.
pub fn write_annotated_filing(html: &str, path: &Path) -> Result<(), AppError> {
    let annotated = annotate_matches(html, &STATEMENT_HEADING_RE);
    std::fs::write(path, annotated)?;
    tracing::info!("Saved annotated filing to {}", path.display());
    Ok(())
}
