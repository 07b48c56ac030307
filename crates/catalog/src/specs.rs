//! Product description as a list of spec lines (`Label: value`).

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Lines shown in the detail view before "show more".
pub const SPEC_PREVIEW_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecLine {
    /// Text before the first colon; empty for plain lines.
    pub label: String,
    pub value: String,
    /// Line after bullet stripping.
    pub raw: String,
}

/// Split a description into spec lines.
///
/// Blank lines are dropped; a leading `•`, `-` or `*` bullet is stripped. The
/// label ends at the first colon, later colons stay in the value.
pub fn parse_spec_lines(description: &str) -> Vec<SpecLine> {
    description
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(':') {
            Some((label, value)) => SpecLine {
                label: label.trim().to_string(),
                value: value.trim().to_string(),
                raw: line.to_string(),
            },
            None => SpecLine {
                label: String::new(),
                value: line.to_string(),
                raw: line.to_string(),
            },
        })
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix(['•', '-', '*']).unwrap_or(line).trim()
}

/// Lines to render, honoring the preview limit unless expanded.
pub fn visible_specs(lines: &[SpecLine], show_all: bool) -> &[SpecLine] {
    if show_all {
        lines
    } else {
        &lines[..lines.len().min(SPEC_PREVIEW_LIMIT)]
    }
}

/// "Ver 3 detalles más", or `None` when everything fits in the preview.
pub fn show_more_label(lines: &[SpecLine], locale: Locale) -> Option<String> {
    let hidden = lines.len().checked_sub(SPEC_PREVIEW_LIMIT).filter(|n| *n > 0)?;
    let verb = match locale {
        Locale::EsAr => "Ver",
        Locale::En => "Show",
    };
    Some(format!("{verb} {hidden} {}", locale.words().more_details))
}
