use thiserror::Error;

pub const PREVIEW_CHARS: usize = 200;

/// Failures that reach the caller. Feed, cache and accounting problems are
/// absorbed inside the pipeline and never show up here.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("generative extraction is not configured: {0}")]
    NotConfigured(String),

    #[error("extraction service failed: {0}")]
    Service(String),

    #[error("could not parse extraction response (preview: {preview})")]
    Parse { preview: String },

    #[error("extraction returned no athletes for {input_chars} characters of input")]
    Empty { input_chars: usize },
}

impl ExtractionError {
    pub fn parse(raw: &str) -> Self {
        ExtractionError::Parse {
            preview: preview(raw),
        }
    }
}

/// Single-line, truncated view of a response body for error messages.
pub fn preview(raw: &str) -> String {
    let flat = raw.trim().replace(['\n', '\r'], " ");
    let mut out: String = flat.chars().take(PREVIEW_CHARS).collect();
    if flat.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_and_flattens() {
        let raw = format!("line one\nline two {}", "x".repeat(400));
        let p = preview(&raw);
        assert!(p.starts_with("line one line two"));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
    }
}
