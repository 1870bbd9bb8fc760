//! Lenient frontmatter parser
//!
//! Notes start with an optional block bounded by `---` lines:
//!
//! ```text
//! ---
//! created_at: 2024-01-01T10:00:00.000Z
//! updated_at: "2024-01-02T08:30:00.000Z"
//! private: false
//! tags: [intro, demo]
//! ---
//!
//! # Hello
//! ```
//!
//! Parsing never fails. Anything that does not fit degrades to defaults and
//! is reported through [`ParsedNote::diagnostics`] instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::types::Frontmatter;

/// Frontmatter block delimiter
pub const DELIMITER: &str = "---";

/// Number of body characters kept in a preview
pub const PREVIEW_CHARS: usize = 200;

const PREVIEW_SUFFIX: &str = "...";

/// Something in the frontmatter that was ignored or defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterDiagnostic {
    /// An opening delimiter without a closing one; the whole text became body
    UnclosedBlock,
    /// A line inside the block without a `key: value` shape
    MalformedLine { line: usize, text: String },
    /// A key the parser does not know about
    UnrecognizedKey { line: usize, key: String },
    /// `private` with a value other than `true`/`false`
    InvalidBoolean { line: usize, value: String },
    /// A date field that is neither RFC 3339 nor a plain date
    InvalidTimestamp {
        line: usize,
        key: String,
        value: String,
    },
}

/// Result of parsing a raw note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub frontmatter: Frontmatter,
    /// Everything after the block, trimmed
    pub body: String,
    pub body_preview: String,
    pub diagnostics: Vec<FrontmatterDiagnostic>,
}

/// Parse raw note text into frontmatter, body and preview.
pub fn parse(raw: &str) -> ParsedNote {
    let mut diagnostics = Vec::new();
    let lines: Vec<&str> = raw.trim_start().lines().collect();

    let closing = if lines.first().map(|l| l.trim()) == Some(DELIMITER) {
        let closing = lines
            .iter()
            .skip(1)
            .position(|l| l.trim() == DELIMITER)
            .map(|i| i + 1);
        if closing.is_none() {
            diagnostics.push(FrontmatterDiagnostic::UnclosedBlock);
        }
        closing
    } else {
        None
    };

    let (frontmatter, body) = match closing {
        Some(end) => {
            let frontmatter = parse_block(&lines[1..end], &mut diagnostics);
            (frontmatter, lines[end + 1..].join("\n").trim().to_string())
        }
        None => (Frontmatter::default(), raw.trim().to_string()),
    };

    let body_preview = preview(&body);

    ParsedNote {
        frontmatter,
        body,
        body_preview,
        diagnostics,
    }
}

/// First [`PREVIEW_CHARS`] characters of `body`, with `...` only when truncated
pub fn preview(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &body[..cut], PREVIEW_SUFFIX),
        None => body.to_string(),
    }
}

fn parse_block(lines: &[&str], diagnostics: &mut Vec<FrontmatterDiagnostic>) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();

    for (offset, raw_line) in lines.iter().enumerate() {
        // 1-based, counting the opening delimiter as line 1
        let line = offset + 2;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            diagnostics.push(FrontmatterDiagnostic::MalformedLine {
                line,
                text: trimmed.to_string(),
            });
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "created_at" | "updated_at" => {
                let value = strip_quotes(value);
                if value.is_empty() {
                    continue;
                }
                if !is_timestamp(value) {
                    diagnostics.push(FrontmatterDiagnostic::InvalidTimestamp {
                        line,
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                if key == "created_at" {
                    frontmatter.created_at = Some(value.to_string());
                } else {
                    frontmatter.updated_at = Some(value.to_string());
                }
            }
            "private" => {
                frontmatter.is_private = value == "true";
                if value != "true" && value != "false" {
                    diagnostics.push(FrontmatterDiagnostic::InvalidBoolean {
                        line,
                        value: value.to_string(),
                    });
                }
            }
            "tags" => frontmatter.tags = parse_tags(value),
            other => diagnostics.push(FrontmatterDiagnostic::UnrecognizedKey {
                line,
                key: other.to_string(),
            }),
        }
    }

    frontmatter
}

/// Accepts `[a, b]`, `a, b` and `a`
fn parse_tags(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(|tag| strip_quotes(tag.trim()).trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn is_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Serialize frontmatter and body back into note text.
pub fn render(frontmatter: &Frontmatter, body: &str) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    if let Some(created) = &frontmatter.created_at {
        out.push_str(&format!("created_at: {}\n", created));
    }
    if let Some(updated) = &frontmatter.updated_at {
        out.push_str(&format!("updated_at: {}\n", updated));
    }
    out.push_str(&format!("private: {}\n", frontmatter.is_private));
    out.push_str(&format!("tags: [{}]\n", frontmatter.tags.join(", ")));
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(body.trim());
    out.push('\n');
    out
}
