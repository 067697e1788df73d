use faq_extract::{
    extract_sections, parse_document, render_json, write_json, Answer, FaqParser, HeadingPolicy,
    OverrideTable, Section, RANNA_FAQ,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn read_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/markdown")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

fn section<'a>(sections: &'a [Section], title: &str) -> &'a Section {
    sections
        .iter()
        .find(|section| section.title == title)
        .unwrap_or_else(|| panic!("missing section {title}"))
}

#[test]
fn should_extract_the_four_ranna_sections_in_order() {
    // When
    let parsed = parse_document(RANNA_FAQ);

    // Then
    let titles: Vec<_> = parsed.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "1. About Ranna",
            "2. Cuisine & Menu",
            "3. Dining & Reservations",
            "4. Ordering & Delivery",
        ]
    );
    assert!(parsed.skipped.is_empty());
}

#[test]
fn should_count_questions_per_section() {
    // When
    let parsed = parse_document(RANNA_FAQ);

    // Then
    let counts: Vec<_> = parsed.sections.iter().map(|s| s.questions.len()).collect();
    assert_eq!(counts, vec![2, 14, 5, 1]);
}

#[test]
fn should_replace_core_values_answer_with_list() {
    // When
    let parsed = parse_document(RANNA_FAQ);

    // Then
    assert_eq!(parsed.overridden, 1);
    let about = section(&parsed.sections, "1. About Ranna");
    let core_values = &about.questions[1];
    assert_eq!(core_values.question, "What are the Core Values of Ranna?");

    let values = core_values.answer.as_list().expect("list answer");
    assert_eq!(values.len(), 4);
    for (value, label) in values
        .iter()
        .zip(["Quality", "Customer Service", "Cleanliness", "Time"])
    {
        assert!(value.starts_with(&format!("{label} — ")), "{value}");
    }
}

#[test]
fn should_keep_every_other_answer_as_trimmed_text() {
    // When
    let parsed = parse_document(RANNA_FAQ);

    // Then
    let mut text_answers = 0;
    for qa in parsed.sections.iter().flat_map(|s| s.questions.iter()) {
        if qa.question.starts_with("What are the Core Values") {
            continue;
        }
        let answer = qa.answer.as_text().expect("text answer");
        assert_eq!(answer, answer.trim());
        assert!(!answer.is_empty(), "{}", qa.question);
        text_answers += 1;
    }
    assert_eq!(text_answers, 21);

    let about = section(&parsed.sections, "1. About Ranna");
    assert_eq!(about.questions[0].question, "What does Ranna mean?");
    assert!(about.questions[0]
        .answer
        .as_text()
        .unwrap()
        .starts_with("The word Ranna originated from Bangladesh"));

    let combi = parsed
        .sections
        .iter()
        .flat_map(|s| s.questions.iter())
        .find(|qa| qa.question == "What is a Combi Meal?")
        .expect("combi meal question");
    assert_eq!(
        combi.answer,
        Answer::Text(
            "A Combi Meal combines multiple dishes into one set, offering better value and variety. \
             Ideal for sharing or trying different items without ordering full portions."
                .to_string()
        )
    );
}

#[test]
fn should_render_identical_output_on_repeated_runs() {
    // When
    let first = render_json(&parse_document(RANNA_FAQ).sections).unwrap();
    let second = render_json(&parse_document(RANNA_FAQ).sections).unwrap();

    // Then
    assert_eq!(first, second);
    assert!(first.starts_with("[\n  {\n    \"Title\": \"1. About Ranna\","));
    assert!(first.contains("Quality — Every dish"));
    assert!(!first.contains("\\u2014"));
}

#[test]
fn should_round_trip_written_file() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Ranna_FAQ_complete.json");
    let parsed = parse_document(RANNA_FAQ);

    // When
    write_json(&path, &parsed.sections).unwrap();

    // Then
    let written = std::fs::read_to_string(&path).unwrap();
    let decoded: Vec<Section> = serde_json::from_str(&written).unwrap();
    assert_eq!(decoded, parsed.sections);
}

#[test]
fn should_exclude_headings_with_punctuation_under_both_policies() {
    // Given
    let contents = read_fixture("punctuated_headings.md");

    for policy in [HeadingPolicy::default(), HeadingPolicy::strict()] {
        // When
        let scan = extract_sections(&contents, &policy);

        // Then
        let titles: Vec<_> = scan.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Weekdays", "Weekends & Holidays"]);
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].title, "Bank-Holidays");
        assert_eq!(scan.skipped[0].line, 7);
    }
}

#[test]
fn should_drop_numbered_headings_under_strict_policy() {
    // Given
    let parser = FaqParser::new(HeadingPolicy::strict(), OverrideTable::builtin());

    // When
    let parsed = parser.parse(RANNA_FAQ);

    // Then
    assert!(parsed.sections.is_empty());
    assert_eq!(parsed.skipped.len(), 4);
    assert_eq!(parsed.skipped[0].title, "1. About Ranna");
}

#[test]
fn should_preserve_internal_newlines_in_answers() {
    // Given
    let contents = read_fixture("multiline_answers.md");

    // When
    let parsed = parse_document(&contents);

    // Then
    let delivery = section(&parsed.sections, "Delivery");
    assert_eq!(
        delivery.questions[0].answer,
        Answer::Text(
            "Central districts only.\nOuter districts on request.\n\n  Ask in branch for details."
                .to_string()
        )
    );
    assert_eq!(
        delivery.questions[1].answer,
        Answer::Text("No minimum.".to_string())
    );
}
