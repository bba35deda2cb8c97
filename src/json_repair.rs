use serde_json::Value;

use crate::error::ExtractionError;

/// Which step of the lenient parse chain produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Strict,
    Cleaned,
    LargestObject,
}

/// Parses text that is supposed to be JSON but comes from a generator:
/// strict first, then with fences/comments/trailing commas removed, then the
/// largest balanced `{...}` block. Never yields an empty default on failure.
pub fn parse_lenient(raw: &str) -> Result<(Value, ParseStrategy), ExtractionError> {
    let trimmed = raw.trim();
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return Ok((v, ParseStrategy::Strict));
    }

    let cleaned = clean_artifacts(trimmed);
    if let Ok(v) = serde_json::from_str::<Value>(&cleaned) {
        return Ok((v, ParseStrategy::Cleaned));
    }

    if let Some(block) = largest_balanced_object(&cleaned)
        && let Ok(v) = serde_json::from_str::<Value>(block)
    {
        return Ok((v, ParseStrategy::LargestObject));
    }

    Err(ExtractionError::parse(raw))
}

/// Removes markdown fences, `//` and `/* */` comments and trailing commas,
/// leaving string literals untouched.
pub fn clean_artifacts(raw: &str) -> String {
    let unfenced: String = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");
    strip_trailing_commas(&strip_comments(&unfenced))
}

fn strip_comments(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut in_str = false;
    let mut escaped = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_str {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_str = false;
            }
            i += 1;
            continue;
        }
        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_str = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn strip_trailing_commas(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut in_str = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_str {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_str = false;
            }
            continue;
        }
        if c == '"' {
            in_str = true;
        }
        if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Longest brace-balanced `{...}` span, tracking string literals so braces
/// inside names do not count. One pass: every `}` closes the innermost open
/// `{`, and unmatched braces on either side are skipped.
pub fn largest_balanced_object(raw: &str) -> Option<&str> {
    let mut open: Vec<usize> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_str = false;
    let mut escaped = false;
    for (idx, &b) in raw.as_bytes().iter().enumerate() {
        if in_str {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_str = false;
            }
            continue;
        }
        match b {
            b'"' => in_str = true,
            b'{' => open.push(idx),
            b'}' => {
                if let Some(start) = open.pop()
                    && best.is_none_or(|(s, e)| idx - start > e - s)
                {
                    best = Some((start, idx));
                }
            }
            _ => {}
        }
    }
    best.map(|(s, e)| &raw[s..=e])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_json_parses_directly() {
        let (v, strategy) = parse_lenient(r#" {"teamName":"Duke"} "#).expect("valid");
        assert_eq!(strategy, ParseStrategy::Strict);
        assert_eq!(v["teamName"], "Duke");
    }

    #[test]
    fn comments_and_trailing_commas_are_removed() {
        let raw = r#"```json
{
  // team guess
  "teamName": "Duke", /* inline */
  "athletes": [{"fullName": "A // not a comment",},],
}
```"#;
        let (v, strategy) = parse_lenient(raw).expect("repairable");
        assert_eq!(strategy, ParseStrategy::Cleaned);
        assert_eq!(v["athletes"][0]["fullName"], "A // not a comment");
    }

    #[test]
    fn largest_object_is_extracted_from_prose() {
        let raw = r#"Sure! Here is {"a":1} and the roster: {"athletes":[{"fullName":"B {x}"}]} hope it helps"#;
        let (v, strategy) = parse_lenient(raw).expect("object present");
        assert_eq!(strategy, ParseStrategy::LargestObject);
        assert_eq!(v["athletes"][0]["fullName"], "B {x}");
    }

    #[test]
    fn hopeless_text_is_a_parse_error() {
        let err = parse_lenient("the model refused {").expect_err("no json");
        match err {
            ExtractionError::Parse { preview } => assert!(preview.contains("refused")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unbalanced_prefix_does_not_hide_later_object() {
        assert_eq!(largest_balanced_object(r#"{ oops {"k":1}"#), Some(r#"{"k":1}"#));
    }

    #[test]
    fn runaway_open_braces_are_scanned_once() {
        let raw = format!("{}{}", "{".repeat(50_000), r#"{"k":1} trailing }"#);
        assert_eq!(largest_balanced_object(&raw), Some(r#"{{"k":1} trailing }"#));
        let (v, _) = parse_lenient(&format!("{}{}", "{".repeat(50_000), r#" {"k":1}"#))
            .expect("inner object survives");
        assert_eq!(v["k"], 1);
    }
}
