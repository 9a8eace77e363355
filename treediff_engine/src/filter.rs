//! Path-pattern filtering of a [`Report`] (engine-public surface).

use regex::Regex;
use treediff_model::{PathStyle, Report};

/// Retain only diffs whose path matches at least one of `patterns`.
pub fn filter(report: &Report, patterns: &[Regex]) -> Report {
    select(report, patterns, true)
}

/// Retain only diffs whose path matches none of `patterns`.
pub fn exclude(report: &Report, patterns: &[Regex]) -> Report {
    select(report, patterns, false)
}

fn select(report: &Report, patterns: &[Regex], keep_on_match: bool) -> Report {
    let diffs = report
        .diffs
        .iter()
        .filter(|diff| {
            let path_str = diff.path.to_string(PathStyle::Dot);
            let matched = patterns.iter().any(|re| re.is_match(&path_str));
            matched == keep_on_match
        })
        .cloned()
        .collect();
    Report {
        from_name: report.from_name.clone(),
        to_name: report.to_name.clone(),
        diffs,
    }
}
