use formfill::{
    ai::orchestrator::FallbackOutcome,
    document::{adapter::InputHandle, page_model::PageElement, static_page::{DocumentEvent, StaticDocument}},
    engine::FillEngine,
    matching::{keywords::KeywordDictionary, scorer::Scorer},
    match_and_fill,
    report::{console::format_console_report, report_model::FillSource},
    trace::logger::TraceLogger,
};

use crate::common::fixtures::{StaticMapper, named, profile, text_input, typed, with_id};

mod common;

fn signup_page() -> StaticDocument {
    StaticDocument::from_elements(vec![
        PageElement {
            label: Some("Given Name".into()),
            ..text_input()
        },
        named("user_email"),
        typed("hidden"),
        with_id("field7"),
        PageElement {
            value: Some("Create account".into()),
            ..typed("submit")
        },
    ])
}

fn signup_profile() -> formfill::profile::profile_model::Profile {
    profile(&[("firstName", "Jane"), ("email", "jane@example.com"), ("company", "Acme")])
}

#[test]
fn heuristics_only_pass_reports_disabled_fallback() {
    let mut doc = signup_page();

    let report = match_and_fill(&mut doc, &signup_profile(), None);

    assert_eq!(report.inputs_scanned, 3);
    assert_eq!(report.heuristic.len(), 2);
    assert_eq!(report.unresolved, 1);
    assert_eq!(report.fallback, FallbackOutcome::Disabled { unresolved: 1 });
    assert_eq!(report.left_unfilled(), 1);

    assert_eq!(doc.value(InputHandle(0)), Some("Jane"));
    assert_eq!(doc.value(InputHandle(1)), Some("jane@example.com"));
    assert_eq!(doc.value(InputHandle(2)), None);
    assert_eq!(doc.value(InputHandle(3)), None);
}

#[test]
fn configured_collaborator_fills_the_rest() {
    let mut doc = signup_page();
    let engine = FillEngine::default()
        .with_collaborator(Box::new(StaticMapper::new(&[("input_0", Some("company"))])));

    let report = engine.match_and_fill(&mut doc, &signup_profile());

    assert_eq!(doc.value(InputHandle(3)), Some("Acme"));
    assert_eq!(report.filled_count(), 3);
    assert_eq!(report.left_unfilled(), 0);

    let sources: Vec<_> = report.filled().map(|f| f.source).collect();
    assert_eq!(
        sources,
        vec![FillSource::Heuristic, FillSource::Heuristic, FillSource::Ai]
    );

    // Heuristic writes hit the page before the AI-mapped one.
    assert_eq!(
        doc.events(),
        &[
            DocumentEvent::Input(InputHandle(0)),
            DocumentEvent::Change(InputHandle(0)),
            DocumentEvent::Input(InputHandle(1)),
            DocumentEvent::Change(InputHandle(1)),
            DocumentEvent::Input(InputHandle(3)),
            DocumentEvent::Change(InputHandle(3)),
        ]
    );
}

#[test]
fn custom_dictionary_replaces_builtin_synonyms() {
    let dictionary = KeywordDictionary::new([("email".to_string(), vec!["courriel".to_string()])]);
    let engine = FillEngine::new(Scorer::new(dictionary));
    let mut doc = StaticDocument::from_elements(vec![
        PageElement {
            label: Some("Courriel".into()),
            ..text_input()
        },
        PageElement {
            placeholder: Some("Given Name".into()),
            ..text_input()
        },
    ]);

    let report = engine.match_and_fill(&mut doc, &signup_profile());

    assert_eq!(doc.value(InputHandle(0)), Some("jane@example.com"));
    // "firstName" is no longer a canonical key here
    assert_eq!(doc.value(InputHandle(1)), None);
    assert_eq!(report.heuristic.len(), 1);
}

#[test]
fn repeated_pass_refills_the_same_values() {
    let mut doc = signup_page();
    let p = signup_profile();

    let first = match_and_fill(&mut doc, &p, None);
    let second = match_and_fill(&mut doc, &p, None);

    assert_eq!(first.heuristic.len(), second.heuristic.len());
    assert_eq!(doc.value(InputHandle(0)), Some("Jane"));
}

#[test]
fn trace_file_gets_one_line_per_fill() {
    let path = std::env::temp_dir().join(format!("formfill-trace-{}.jsonl", uuid::Uuid::new_v4()));
    let path_str = path.to_string_lossy().to_string();

    let engine = FillEngine::default()
        .with_collaborator(Box::new(StaticMapper::new(&[("input_0", Some("company"))])))
        .with_tracer(TraceLogger::new(&path_str));
    let mut doc = signup_page();
    engine.match_and_fill(&mut doc, &signup_profile());

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    std::fs::remove_file(&path).ok();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["source"], "heuristic");
    assert_eq!(events[0]["key"], "firstName");
    assert_eq!(events[2]["source"], "ai");
    assert_eq!(events[2]["input"], "#3");
    assert!(events[2]["score"].is_null());

    let pass = &events[0]["pass"];
    assert!(events.iter().all(|e| &e["pass"] == pass));
}

#[test]
fn console_report_lists_every_fill() {
    let mut doc = signup_page();
    let report = match_and_fill(&mut doc, &signup_profile(), None);

    let text = format_console_report(&report);

    assert!(text.contains("Given Name"));
    assert!(text.contains("user_email"));
    assert!(text.contains("firstName"));
}

#[test]
fn report_serializes_fallback_status() {
    let mut doc = signup_page();
    let report = match_and_fill(&mut doc, &signup_profile(), None);

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["fallback"]["status"], "disabled");
    assert_eq!(json["fallback"]["unresolved"], 1);
    assert_eq!(json["heuristic"][1]["source"], "heuristic");
}
