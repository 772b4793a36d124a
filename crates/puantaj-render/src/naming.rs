//! Deterministic artifact names
//!
//! File names depend only on the scope, the organization filter and the
//! effective window, so the same request always produces the same name:
//!
//! ```text
//! puantaj_acme-corp_2024-01-01_2024-01-31.xlsx
//! puantaj_all_acme_2024-01-01_2024-01-31.csv
//! puantaj_individual_empty.csv
//! ```

use puantaj_core::{AttendanceReport, Scope};

/// Excel's hard limit on worksheet name length
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const SHEET_NAME_FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// File name for a report export with the given extension.
pub fn file_name(report: &AttendanceReport, extension: &str) -> String {
    let mut scope = scope_slug(&report.scope);
    if let Some(filter) = filter_slug(report) {
        scope.push('_');
        scope.push_str(&filter);
    }
    match &report.window {
        Some(w) => format!(
            "puantaj_{scope}_{}_{}.{extension}",
            w.start.format("%Y-%m-%d"),
            w.end.format("%Y-%m-%d")
        ),
        None => format!("puantaj_{scope}_empty.{extension}"),
    }
}

/// Worksheet title: `Puantaj` or `Puantaj - <scope>`, with the
/// organization filter in parentheses when one was applied, made valid for
/// Excel.
pub fn sheet_name(report: &AttendanceReport) -> String {
    let mut title = match &report.scope {
        Scope::All => "Puantaj".to_string(),
        other => format!("Puantaj - {}", other.label()),
    };
    if let Some(filter) = report.organization_filter.as_deref().map(str::trim) {
        if !filter.is_empty() {
            title.push_str(&format!(" ({filter})"));
        }
    }
    sanitize_sheet_name(&title)
}

/// Replace characters Excel rejects and cut to the 31-character limit on a
/// char boundary.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if SHEET_NAME_FORBIDDEN.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    if cleaned.is_empty() {
        "Puantaj".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Scope part of a file name
pub fn scope_slug(scope: &Scope) -> String {
    match scope {
        Scope::All => "all".to_string(),
        Scope::Unaffiliated => "individual".to_string(),
        Scope::ByOrganization { id, name } => [slug(name), slug(id)]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "organization".to_string()),
    }
}

fn filter_slug(report: &AttendanceReport) -> Option<String> {
    report
        .organization_filter
        .as_deref()
        .map(slug)
        .filter(|s| !s.is_empty())
}

/// Lowercase ASCII slug; Turkish letters are transliterated and any other
/// run of non-alphanumerics becomes a single `-`.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().map(transliterate) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

fn transliterate(c: char) -> char {
    match c {
        'ç' | 'Ç' => 'c',
        'ğ' | 'Ğ' => 'g',
        'ı' | 'İ' => 'i',
        'ö' | 'Ö' => 'o',
        'ş' | 'Ş' => 's',
        'ü' | 'Ü' => 'u',
        'â' | 'Â' => 'a',
        'î' | 'Î' => 'i',
        'û' | 'Û' => 'u',
        other => other,
    }
}
