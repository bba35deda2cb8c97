use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const NAME_SUFFIXES: &[&str] = &["JR", "SR", "II", "III", "IV", "V"];
const PLACEHOLDER_VALUES: &[&str] = &["", "unknown", "null", "none", "undefined"];

/// Identity key for a person or team name: diacritics stripped, upper-cased,
/// punctuation removed, whitespace collapsed. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in fold_diacritics(raw).chars() {
        if ch.is_alphanumeric() {
            cleaned.extend(ch.to_uppercase());
        } else if ch.is_whitespace() || matches!(ch, '-' | '_' | '/' | ',') {
            cleaned.push(' ');
        }
        // apostrophes, periods and other punctuation are dropped outright
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Registry key for a team name. Season tokens ("2025", "2024-25") are dropped
/// so "Kings 2025" and "KINGS" land on the same key.
pub fn team_key(raw: &str) -> String {
    let kept: Vec<String> = raw
        .split_whitespace()
        .filter(|token| !is_season_token(token))
        .map(normalize_name)
        .filter(|t| !t.is_empty())
        .collect();
    if kept.is_empty() {
        return normalize_name(raw);
    }
    kept.join(" ")
}

fn is_season_token(token: &str) -> bool {
    let t = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    let is_year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
    match t.split_once(['-', '/']) {
        Some((start, end)) => {
            is_year(start) && matches!(end.len(), 2 | 4) && end.bytes().all(|b| b.is_ascii_digit())
        }
        None => is_year(t),
    }
}

/// Last surname token, skipping generational suffixes ("JR", "III").
pub fn last_name_key(raw: &str) -> Option<String> {
    let normalized = normalize_name(raw);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() < 2 {
        return None;
    }
    tokens[1..]
        .iter()
        .rev()
        .find(|t| !NAME_SUFFIXES.contains(t))
        .map(|t| t.to_string())
}

pub fn first_initial(raw: &str) -> Option<char> {
    normalize_name(raw).chars().next()
}

/// Broadcast-safe display name: ASCII upper-case letters, digits, spaces and
/// hyphens only.
pub fn to_safe_name(raw: &str) -> String {
    let upper: String = fold_diacritics(raw)
        .chars()
        .flat_map(|c| c.to_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();
    upper.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Jersey/bib numbers render with at least two digits. Missing values become
/// "00"; values that are not numeric stay as the trimmed literal.
pub fn format_jersey_number(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "00".to_string();
    };
    let digits = raw.trim_start_matches('#').trim();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return format!("{digits:0>2}");
    }
    raw.to_string()
}

pub fn is_placeholder(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    PLACEHOLDER_VALUES.contains(&t.as_str())
}

/// Placeholder-free owned copy of an optional string.
pub fn clean_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !is_placeholder(s))
        .map(|s| s.to_string())
}

fn fold_diacritics(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        // letters NFD leaves intact
        match ch {
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ß' => out.push_str("ss"),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            'ı' => out.push('i'),
            'þ' => out.push_str("th"),
            'Þ' => out.push_str("TH"),
            _ => out.push(ch),
        }
    }
    out
}
