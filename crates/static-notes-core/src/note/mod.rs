//! Note model: source records, frontmatter, compiled artifacts

pub mod frontmatter;
mod types;

use std::sync::OnceLock;

use chrono::{NaiveDate, SecondsFormat};
use regex::Regex;

pub use frontmatter::{parse, render, FrontmatterDiagnostic, ParsedNote};
pub use types::{artifact_file_name, CompiledNote, Frontmatter, Locator, NoteSourceRecord};

/// Level-one heading at the start of a line
static HEADING: OnceLock<Option<Regex>> = OnceLock::new();

/// `YYYY-MM-DD-HH-MM-SS` at the start of a file name
static FILENAME_TIMESTAMP: OnceLock<Option<Regex>> = OnceLock::new();

fn heading_re() -> Option<&'static Regex> {
    HEADING
        .get_or_init(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").ok())
        .as_ref()
}

fn filename_timestamp_re() -> Option<&'static Regex> {
    FILENAME_TIMESTAMP
        .get_or_init(|| {
            Regex::new(r"^(\d{4})-(\d{2})-(\d{2})[-_T](\d{2})-(\d{2})-(\d{2})").ok()
        })
        .as_ref()
}

/// Title of a note: its first `# ` heading, else the file name without `.md`.
pub fn derive_title(body: &str, filename: &str) -> String {
    if let Some(caps) = heading_re().and_then(|re| re.captures(body)) {
        let title = caps[1].trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }
    filename
        .strip_suffix(".md")
        .unwrap_or(filename)
        .to_string()
}

/// RFC 3339 timestamp encoded in a file name such as `2024-01-01-10-00-00.md`.
pub fn filename_timestamp(filename: &str) -> Option<String> {
    let caps = filename_timestamp_re()?.captures(filename)?;
    let num = |i: usize| caps[i].parse::<u32>().ok();

    let year = caps[1].parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;
    let datetime = date.and_hms_opt(num(4)?, num(5)?, num(6)?)?;
    Some(
        datetime
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Leading digits of a file name, ignoring separators: `2024-01-01-x.md` -> `20240101`.
///
/// Used to order listings newest-first when names encode timestamps.
pub fn numeric_prefix(filename: &str) -> String {
    filename
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '-' | '_' | 'T'))
        .filter(char::is_ascii_digit)
        .collect()
}

/// Order records newest-first: numeric prefix descending, then full name descending.
pub fn sort_records(records: &mut [NoteSourceRecord]) {
    records.sort_by(|a, b| {
        let (pa, pb) = (numeric_prefix(&a.name), numeric_prefix(&b.name));
        pb.len()
            .cmp(&pa.len())
            .then_with(|| pb.cmp(&pa))
            .then_with(|| b.name.cmp(&a.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> NoteSourceRecord {
        NoteSourceRecord {
            name: name.to_string(),
            path: format!("notes/{}", name),
            content_hash: String::new(),
            size_bytes: 0,
            locator: Locator::Remote(String::new()),
        }
    }

    #[test]
    fn test_derive_title_prefers_heading() {
        assert_eq!(derive_title("intro\n# Hello  \nWorld", "a.md"), "Hello");
        assert_eq!(derive_title("## Not level one\nbody", "note.md"), "note");
        assert_eq!(derive_title("", "2024-01-01-10-00-00.md"), "2024-01-01-10-00-00");
    }

    #[test]
    fn test_filename_timestamp() {
        assert_eq!(
            filename_timestamp("2024-01-01-10-00-00.md").as_deref(),
            Some("2024-01-01T10:00:00.000Z")
        );
        assert_eq!(filename_timestamp("2024-13-01-10-00-00.md"), None);
        assert_eq!(filename_timestamp("hello.md"), None);
    }

    #[test]
    fn test_sort_records_newest_first() {
        let mut records = vec![
            record("2023-12-31-23-59-59.md"),
            record("readme.md"),
            record("2024-01-01-10-00-00.md"),
            record("2024-01-01-09-00-00.md"),
        ];
        sort_records(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "2024-01-01-10-00-00.md",
                "2024-01-01-09-00-00.md",
                "2023-12-31-23-59-59.md",
                "readme.md",
            ]
        );
    }
}
