//! Splits a section body into question/answer pairs on bold (`**`) spans.
//!
//! A question is the text between an opening `**` and the first `*` after it,
//! which must begin the closing `**`. Spans that are empty or contain a lone
//! `*` are not questions; scanning resumes one byte after the rejected
//! opener. Nested markers are not balanced, so `**Outer **inner** rest**`
//! yields the question `Outer`. The answer runs from the closing marker (minus
//! one optional newline) to the next `**` or the end of the body.

const MARKER: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaSpan {
    pub question: String,
    pub answer: String,
}

pub fn extract_qa_pairs(body: &str) -> Vec<QaSpan> {
    let bytes = body.as_bytes();
    let mut pairs = Vec::new();
    let mut cursor = 0usize;

    while let Some(open) = find_marker(body, cursor) {
        let Some(close) = find_closing_marker(bytes, open) else {
            cursor = open + 1;
            continue;
        };

        let mut answer_start = close + MARKER.len();
        if bytes.get(answer_start) == Some(&b'\n') {
            answer_start += 1;
        }
        let answer_end = find_marker(body, answer_start).unwrap_or(body.len());

        pairs.push(QaSpan {
            question: body[open + MARKER.len()..close].trim().to_string(),
            answer: body[answer_start..answer_end].trim().to_string(),
        });

        cursor = answer_end;
    }

    pairs
}

// Offsets handed to this function always sit on a char boundary: they are
// either 0, the end of the body, or one byte past an ASCII `*`.
fn find_marker(body: &str, from: usize) -> Option<usize> {
    body.get(from..)?.find(MARKER).map(|idx| idx + from)
}

fn find_closing_marker(bytes: &[u8], open: usize) -> Option<usize> {
    let span_start = open + MARKER.len();
    let star = bytes
        .get(span_start..)?
        .iter()
        .position(|byte| *byte == b'*')
        .map(|idx| idx + span_start)?;

    if star == span_start || bytes.get(star + 1) != Some(&b'*') {
        return None;
    }

    Some(star)
}
