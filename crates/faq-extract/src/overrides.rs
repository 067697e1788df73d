//! Declarative answer overrides applied after parsing.
//!
//! Each rule maps a normalized question prefix to a replacement list. A
//! question matches when its trimmed, lower-cased text starts with the prefix;
//! the first matching rule wins.

use crate::model::{Answer, Section};

pub const CORE_VALUES_PREFIX: &str = "what are the core values of ranna";

const CORE_VALUES: [&str; 4] = [
    "Quality — Every dish is made with fresh, carefully sourced ingredients and precise cooking methods to ensure excellence.",
    "Customer Service — We go the extra mile to make every interaction warm, respectful, and memorable.",
    "Cleanliness — Our kitchens undergo strict daily checks to maintain top hygiene and safety standards.",
    "Time — We value your time, preparing and delivering food promptly without compromising quality.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    key: String,
    answer: Vec<String>,
}

impl OverrideRule {
    pub fn new(question_prefix: &str, answer: Vec<String>) -> Self {
        Self {
            key: normalize_question_key(question_prefix),
            answer,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn answer(&self) -> &[String] {
        &self.answer
    }

    pub fn matches(&self, question: &str) -> bool {
        normalize_question_key(question).starts_with(&self.key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Ranna core-values rule.
    pub fn builtin() -> Self {
        let answer = CORE_VALUES.iter().map(|value| value.to_string()).collect();
        Self::new().with_rule(OverrideRule::new(CORE_VALUES_PREFIX, answer))
    }

    pub fn with_rule(mut self, rule: OverrideRule) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: OverrideRule) {
        self.rules.push(rule);
    }

    pub fn extend(&mut self, other: OverrideTable) {
        self.rules.extend(other.rules);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn lookup(&self, question: &str) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.matches(question))
    }

    /// Replace matching answers in place. Returns the number of replacements.
    pub fn apply(&self, sections: &mut [Section]) -> usize {
        let mut replaced = 0usize;
        for qa in sections.iter_mut().flat_map(|section| section.questions.iter_mut()) {
            if let Some(rule) = self.lookup(&qa.question) {
                qa.answer = Answer::List(rule.answer.clone());
                replaced += 1;
            }
        }
        replaced
    }
}

pub fn normalize_question_key(text: &str) -> String {
    text.trim().to_lowercase()
}
