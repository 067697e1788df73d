use crate::error::{ExtractError, ExtractResult};
use crate::line::LineRecord;
use regex::Regex;

/// Title class for section headings: alphanumerics, spaces, ampersands and
/// periods, so numbered headings such as `1. About Ranna` are accepted.
pub const DEFAULT_TITLE_PATTERN: &str = r"^[0-9A-Za-z .&]+$";

/// Title class without periods. Numbered headings are rejected under it.
pub const STRICT_TITLE_PATTERN: &str = r"^[0-9A-Za-z &]+$";

pub const DEFAULT_SECTION_LEVEL: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxHeading {
    pub depth: usize,
    pub title: String,
    /// Zero-based index of the heading line.
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// Decides which headings open a section.
#[derive(Debug, Clone)]
pub struct HeadingPolicy {
    level: usize,
    title_pattern: Regex,
}

impl HeadingPolicy {
    pub fn new(level: usize, title_pattern: &str) -> ExtractResult<Self> {
        if !(1..=6).contains(&level) {
            return Err(ExtractError::InvalidHeadingLevel(level));
        }

        let title_pattern =
            Regex::new(title_pattern).map_err(|source| ExtractError::InvalidTitlePattern {
                pattern: title_pattern.to_string(),
                source,
            })?;

        Ok(Self {
            level,
            title_pattern,
        })
    }

    /// Level-2 headings with the period-free title class.
    pub fn strict() -> Self {
        Self::builtin(STRICT_TITLE_PATTERN)
    }

    fn builtin(pattern: &str) -> Self {
        Self {
            level: DEFAULT_SECTION_LEVEL,
            title_pattern: Regex::new(pattern).expect("built-in title pattern is valid"),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn title_pattern(&self) -> &str {
        self.title_pattern.as_str()
    }

    pub fn accepts(&self, title: &str) -> bool {
        !title.is_empty() && self.title_pattern.is_match(title)
    }
}

impl Default for HeadingPolicy {
    fn default() -> Self {
        Self::builtin(DEFAULT_TITLE_PATTERN)
    }
}

pub fn detect_atx_heading(line: &LineRecord, index: usize) -> Option<AtxHeading> {
    if leading_indent_width(&line.text) > 3 {
        return None;
    }

    let trimmed_start = line.text.trim_start();
    let pound_count = trimmed_start.chars().take_while(|ch| *ch == '#').count();

    if pound_count == 0 || pound_count > 6 {
        return None;
    }

    let after_hashes = &trimmed_start[pound_count..];
    if !after_hashes.is_empty() && !after_hashes.starts_with(char::is_whitespace) {
        return None;
    }

    let mut content = after_hashes.trim();
    let stripped_hashes = content.trim_end_matches('#');
    if stripped_hashes.len() < content.len() {
        if stripped_hashes.is_empty() {
            content = stripped_hashes;
        } else if stripped_hashes.ends_with(char::is_whitespace) {
            content = stripped_hashes.trim_end();
        }
    }

    Some(AtxHeading {
        depth: pound_count,
        title: content.to_string(),
        line: index,
        start: line.start,
        end: line.end,
    })
}

fn leading_indent_width(line: &str) -> usize {
    let mut width = 0usize;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> LineRecord {
        LineRecord {
            text: text.to_string(),
            start: 0,
            end: text.len() + 1,
        }
    }

    #[test]
    fn parses_level_two_heading() {
        let parsed = detect_atx_heading(&line("## 2. Cuisine & Menu  "), 4).unwrap();
        assert_eq!(parsed.depth, 2);
        assert_eq!(parsed.title, "2. Cuisine & Menu");
        assert_eq!(parsed.line, 4);
    }

    #[test]
    fn strips_closing_hash_run() {
        let parsed = detect_atx_heading(&line("## Hours ##"), 0).unwrap();
        assert_eq!(parsed.title, "Hours");

        let parsed = detect_atx_heading(&line("## C#"), 0).unwrap();
        assert_eq!(parsed.title, "C#");
    }

    #[test]
    fn requires_space_after_hashes() {
        assert!(detect_atx_heading(&line("##Hours"), 0).is_none());
        assert!(detect_atx_heading(&line("####### Too deep"), 0).is_none());
        assert!(detect_atx_heading(&line("    ## Indented code"), 0).is_none());
    }

    #[test]
    fn default_policy_accepts_numbered_titles() {
        let policy = HeadingPolicy::default();
        assert_eq!(policy.level(), 2);
        assert!(policy.accepts("1. About Ranna"));
        assert!(policy.accepts("Dining & Reservations"));
        assert!(!policy.accepts("Take-away"));
        assert!(!policy.accepts(""));
    }

    #[test]
    fn strict_policy_rejects_periods() {
        let policy = HeadingPolicy::strict();
        assert!(!policy.accepts("1. About Ranna"));
        assert!(policy.accepts("About Ranna"));
    }

    #[test]
    fn rejects_invalid_policies() {
        assert!(matches!(
            HeadingPolicy::new(0, DEFAULT_TITLE_PATTERN),
            Err(ExtractError::InvalidHeadingLevel(0))
        ));
        assert!(matches!(
            HeadingPolicy::new(2, "[unclosed"),
            Err(ExtractError::InvalidTitlePattern { .. })
        ));
    }
}
