use crate::heading::AtxHeading;
use crate::line::LineRecord;
use crate::SectionSpan;

#[derive(Default)]
pub struct State {
    matches: Vec<SectionSpan>,
    current: Option<SectionBuilder>,
}

impl State {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            current: None,
        }
    }

    pub fn enter_section(&mut self, heading: AtxHeading) {
        self.current = Some(SectionBuilder::new(heading));
    }

    pub fn append_line(&mut self, line: &LineRecord) {
        if let Some(current) = &mut self.current {
            current.push_line(line);
        }
    }

    pub fn exit_section(&mut self, source: &str, end_offset: usize) {
        if let Some(mut current) = self.current.take() {
            current.set_end(end_offset);
            self.matches.push(current.into_section(source));
        }
    }

    pub fn finalize(mut self, source: &str) -> Vec<SectionSpan> {
        if self.current.is_some() {
            self.exit_section(source, source.len());
        }
        self.matches
    }
}

struct SectionBuilder {
    heading: AtxHeading,
    end: usize,
}

impl SectionBuilder {
    fn new(heading: AtxHeading) -> Self {
        Self {
            end: heading.end,
            heading,
        }
    }

    fn push_line(&mut self, line: &LineRecord) {
        self.end = line.end;
    }

    fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    fn into_section(self, source: &str) -> SectionSpan {
        let body_start = self.heading.end;
        SectionSpan {
            title: self.heading.title,
            line: self.heading.line + 1,
            body: source[body_start..self.end].to_string(),
            start: self.heading.start,
            end: self.end,
        }
    }
}
