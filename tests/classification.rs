use std::time::Duration;

use bytes::Bytes;
use renderfetch::{
    DecodeOutcome, FetchError, FetchResult, Inspector, Record, Rule, Verdict, compile,
    decode_record,
};

fn result_with_body(body: &str) -> FetchResult {
    FetchResult {
        status: 200,
        body: Bytes::copy_from_slice(body.as_bytes()),
        service_error: None,
        elapsed: Duration::from_millis(1),
    }
}

#[test]
fn test_first_matching_rule_wins() {
    let inspector = Inspector::new(vec![
        Rule::body_contains("Checking your browser", Verdict::Blocked),
        Rule::body_contains("Target Corp", Verdict::Success),
    ]);

    // Both markers present; the blocking rule is declared first and must win.
    let result = result_with_body(
        "<html>Checking your browser... please wait. Welcome to Target Corp.</html>",
    );

    assert_eq!(inspector.classify(&result, None), Verdict::Blocked);
}

#[test]
fn test_rule_order_is_the_only_precedence() {
    // Same rules, opposite order: now the success marker wins.
    let inspector = Inspector::new(vec![
        Rule::body_contains("Target Corp", Verdict::Success),
        Rule::body_contains("Checking your browser", Verdict::Blocked),
    ]);

    let result = result_with_body(
        "<html>Checking your browser... please wait. Welcome to Target Corp.</html>",
    );

    assert_eq!(inspector.classify(&result, None), Verdict::Success);
}

#[test]
fn test_no_matching_rule_is_anomalous() {
    let inspector = Inspector::new(vec![
        Rule::body_contains("Checking your browser", Verdict::Blocked),
        Rule::body_contains("recaptcha", Verdict::Blocked),
    ]);

    let result = result_with_body("<html>Something else entirely</html>");

    assert_eq!(inspector.classify(&result, None), Verdict::Anomalous);
}

#[test]
fn test_empty_rule_list_is_anomalous() {
    let inspector = Inspector::new(Vec::new());
    let result = result_with_body("anything");

    assert_eq!(inspector.classify(&result, None), Verdict::Anomalous);
}

#[test]
fn test_field_rules_against_decoded_fields() {
    #[derive(Debug, Default, Record)]
    struct Page {
        #[field(selector = "h1")]
        title: String,

        #[field(selector = ".link @href")]
        urls: Vec<String>,
    }

    let schema = compile::<Page>().expect("Failed to compile");
    let body = r#"{"title":"Trucks For Sale","urls":["https://x/a"]}"#;
    let outcome: DecodeOutcome<Page> = decode_record(body.as_bytes(), &schema);
    let result = result_with_body(body);

    let inspector = Inspector::new(vec![
        Rule::field_equals("title", "Trucks For Sale", Verdict::Success),
        Rule::body_contains("Checking your browser", Verdict::Blocked),
    ]);
    assert_eq!(
        inspector.classify(&result, outcome.fields()),
        Verdict::Success
    );

    let non_empty = Inspector::new(vec![Rule::field_non_empty("urls", Verdict::Success)]);
    assert_eq!(
        non_empty.classify(&result, outcome.fields()),
        Verdict::Success
    );

    let wrong_literal = Inspector::new(vec![Rule::field_equals(
        "title",
        "Something Else",
        Verdict::Success,
    )]);
    assert_eq!(
        wrong_literal.classify(&result, outcome.fields()),
        Verdict::Anomalous
    );
}

#[test]
fn test_field_rules_never_match_without_fields() {
    let inspector = Inspector::new(vec![
        Rule::field_equals("title", "Trucks For Sale", Verdict::Success),
        Rule::field_non_empty("urls", Verdict::Success),
    ]);

    // Raw-HTML fetches decode nothing; field rules just don't fire.
    let result = result_with_body("<html><h1>Trucks For Sale</h1></html>");

    assert_eq!(inspector.classify(&result, None), Verdict::Anomalous);
}

#[test]
fn test_empty_decoded_field_does_not_count_as_non_empty() {
    #[derive(Debug, Default, Record)]
    struct Page {
        #[field(selector = "h1")]
        title: String,
    }

    let schema = compile::<Page>().expect("Failed to compile");
    let body = r#"{"title":""}"#;
    let outcome: DecodeOutcome<Page> = decode_record(body.as_bytes(), &schema);
    let result = result_with_body(body);

    let inspector = Inspector::new(vec![Rule::field_non_empty("title", Verdict::Success)]);
    assert_eq!(
        inspector.classify(&result, outcome.fields()),
        Verdict::Anomalous
    );
}

#[test]
fn test_error_arm_verdicts() {
    let timeout = FetchError::Timeout {
        timeout: Duration::from_secs(120),
    };
    assert_eq!(Verdict::from_error(&timeout), Verdict::TransportError);

    let service = FetchError::Service {
        status: 422,
        message: "could not render".to_string(),
    };
    assert_eq!(Verdict::from_error(&service), Verdict::ServiceError);

    let invalid = FetchError::InvalidUrl {
        url: "not a url".to_string(),
        source: url::Url::parse("not a url").unwrap_err(),
    };
    assert_eq!(Verdict::from_error(&invalid), Verdict::Anomalous);
}
