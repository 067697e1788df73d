//! Turn a markdown FAQ into ordered sections of question/answer pairs.
//!
//! Parsing is a two-level grammar. The outer splitter walks lines and cuts the
//! document on section headings (level 2 by default) accepted by a
//! [`HeadingPolicy`]. The inner splitter cuts each section body on bold
//! (`**`) spans, which hold the questions. An [`OverrideTable`] then replaces
//! selected answers, and the result is written as JSON.

mod emphasis;
mod error;
mod fixture;
mod heading;
mod line;
mod model;
mod output;
mod overrides;
mod source;
mod state;

pub use emphasis::{extract_qa_pairs, QaSpan};
pub use error::{ExtractError, ExtractResult};
pub use fixture::RANNA_FAQ;
pub use heading::{
    detect_atx_heading, AtxHeading, HeadingPolicy, DEFAULT_SECTION_LEVEL, DEFAULT_TITLE_PATTERN,
    STRICT_TITLE_PATTERN,
};
pub use line::{split_lines, LineRecord};
pub use model::{Answer, QaPair, Section};
pub use output::{render_json, write_atomic, write_json, DEFAULT_OUTPUT_FILE};
pub use overrides::{normalize_question_key, OverrideRule, OverrideTable, CORE_VALUES_PREFIX};
pub use source::{load_document, DocumentSource};

use state::State;
use tracing::{debug, trace};

/// A section cut from the document, before its body is split into pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub title: String,
    /// One-based line number of the heading.
    pub line: usize,
    pub body: String,
    /// Byte offset of the heading line.
    pub start: usize,
    /// Byte offset one past the last body byte.
    pub end: usize,
}

/// A heading at the section level whose title the policy rejected. Its body
/// is left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedHeading {
    pub title: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionScan {
    pub sections: Vec<SectionSpan>,
    pub skipped: Vec<SkippedHeading>,
}

/// Cut `contents` into sections.
///
/// A heading of the policy level opens a section when its title is accepted.
/// Any heading at or above that level closes the open section; deeper
/// headings stay in the body. Text before the first accepted heading, and the
/// bodies of rejected headings, are dropped.
pub fn extract_sections(contents: &str, policy: &HeadingPolicy) -> SectionScan {
    let lines = split_lines(contents);
    let mut state = State::new();
    let mut skipped = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let heading = detect_atx_heading(line, idx).filter(|h| h.depth <= policy.level());

        let Some(heading) = heading else {
            state.append_line(line);
            continue;
        };

        state.exit_section(contents, heading.start);

        if heading.depth < policy.level() {
            continue;
        }

        if policy.accepts(&heading.title) {
            trace!(line = idx + 1, title = %heading.title, "section heading");
            state.enter_section(heading);
        } else {
            debug!(line = idx + 1, title = %heading.title, "heading rejected by title pattern");
            skipped.push(SkippedHeading {
                title: heading.title,
                line: idx + 1,
            });
        }
    }

    SectionScan {
        sections: state.finalize(contents),
        skipped,
    }
}

/// Result of a full parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFaq {
    pub sections: Vec<Section>,
    pub skipped: Vec<SkippedHeading>,
    /// Number of answers replaced by the override table.
    pub overridden: usize,
}

#[derive(Debug, Clone)]
pub struct FaqParser {
    policy: HeadingPolicy,
    overrides: OverrideTable,
}

impl FaqParser {
    pub fn new(policy: HeadingPolicy, overrides: OverrideTable) -> Self {
        Self { policy, overrides }
    }

    pub fn policy(&self) -> &HeadingPolicy {
        &self.policy
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub fn parse(&self, contents: &str) -> ParsedFaq {
        let SectionScan { sections, skipped } = extract_sections(contents, &self.policy);

        let mut sections: Vec<Section> = sections
            .into_iter()
            .map(|span| {
                let questions: Vec<QaPair> = extract_qa_pairs(&span.body)
                    .into_iter()
                    .map(|pair| QaPair {
                        question: pair.question,
                        answer: Answer::Text(pair.answer),
                    })
                    .collect();
                debug!(title = %span.title, questions = questions.len(), "parsed section");
                Section {
                    title: span.title,
                    questions,
                }
            })
            .collect();

        let overridden = self.overrides.apply(&mut sections);

        ParsedFaq {
            sections,
            skipped,
            overridden,
        }
    }
}

impl Default for FaqParser {
    fn default() -> Self {
        Self::new(HeadingPolicy::default(), OverrideTable::builtin())
    }
}

/// Parse with the default heading policy and the built-in overrides.
pub fn parse_document(contents: &str) -> ParsedFaq {
    FaqParser::default().parse(contents)
}
