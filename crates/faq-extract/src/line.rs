#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split `contents` into lines, keeping byte offsets into the original text.
///
/// `text` excludes the line terminator (`\n` or `\r\n`); `end` includes it.
pub fn split_lines(contents: &str) -> Vec<LineRecord> {
    let mut lines = Vec::new();
    let mut offset = 0usize;

    for raw in contents.split_inclusive('\n') {
        let mut line = raw;

        if let Some(stripped) = line.strip_suffix('\n') {
            line = stripped.strip_suffix('\r').unwrap_or(stripped);
        }

        lines.push(LineRecord {
            text: line.to_string(),
            start: offset,
            end: offset + raw.len(),
        });

        offset += raw.len();
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_offsets_for_each_line() {
        let lines = split_lines("## One\r\nbody\nlast");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "## One");
        assert_eq!((lines[0].start, lines[0].end), (0, 8));
        assert_eq!(lines[1].text, "body");
        assert_eq!((lines[1].start, lines[1].end), (8, 13));
        assert_eq!(lines[2].text, "last");
        assert_eq!((lines[2].start, lines[2].end), (13, 17));
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(split_lines("").is_empty());
    }
}
