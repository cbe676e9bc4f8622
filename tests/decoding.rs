use renderfetch::{DecodeOutcome, DecodeWarning, FieldValue, Record, compile, decode_record};

#[derive(Debug, Default, Record, PartialEq)]
struct ListingPage {
    #[field(selector = "h1")]
    title: String,

    #[field(selector = ".link @href")]
    urls: Vec<String>,
}

#[test]
fn test_round_trip_single_and_multiple() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let body = br#"{"title":"Trucks For Sale","urls":["https://x/a","https://x/b"]}"#;
    let outcome: DecodeOutcome<ListingPage> = decode_record(body, &schema);

    match outcome {
        DecodeOutcome::Clean { record, fields } => {
            assert_eq!(record.title, "Trucks For Sale");
            assert_eq!(record.urls, vec!["https://x/a", "https://x/b"]);

            assert_eq!(
                fields.get("title"),
                Some(&FieldValue::One("Trucks For Sale".to_string()))
            );
            assert_eq!(fields.len(), 2);
        }
        other => panic!("Expected clean decode, got {:?}", other),
    }
}

#[test]
fn test_malformed_body_is_explicit_and_nonfatal() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let body = b"<html><head><title>Checking your browser</title></head></html>";
    let outcome: DecodeOutcome<ListingPage> = decode_record(body, &schema);

    assert!(outcome.is_malformed());
    assert!(outcome.record().is_none());
    match outcome {
        DecodeOutcome::Malformed { body: kept } => {
            // The raw body survives for inspection.
            assert_eq!(&kept[..], &body[..]);
        }
        other => panic!("Expected malformed outcome, got {:?}", other),
    }
}

#[test]
fn test_json_non_object_is_malformed() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let outcome: DecodeOutcome<ListingPage> = decode_record(br#"["not","an","object"]"#, &schema);
    assert!(outcome.is_malformed());

    let outcome: DecodeOutcome<ListingPage> = decode_record(br#""just a string""#, &schema);
    assert!(outcome.is_malformed());
}

#[test]
fn test_absent_keys_stay_zero_valued_without_warning() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let outcome: DecodeOutcome<ListingPage> = decode_record(br#"{"title":"Only Title"}"#, &schema);

    match outcome {
        DecodeOutcome::Clean { record, fields } => {
            assert_eq!(record.title, "Only Title");
            assert!(record.urls.is_empty());
            assert!(fields.get("urls").is_none());
        }
        other => panic!("Expected clean decode, got {:?}", other),
    }
}

#[test]
fn test_type_mismatch_warns_but_keeps_decoding() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    // title is a number instead of a string; urls still decodes.
    let body = br#"{"title":42,"urls":["https://x/a"]}"#;
    let outcome: DecodeOutcome<ListingPage> = decode_record(body, &schema);

    match outcome {
        DecodeOutcome::Partial {
            record, warnings, ..
        } => {
            assert_eq!(record.title, "");
            assert_eq!(record.urls, vec!["https://x/a"]);
            assert_eq!(
                warnings,
                vec![DecodeWarning::ExpectedString {
                    key: "title".to_string(),
                    found: "number",
                }]
            );
        }
        other => panic!("Expected partial decode, got {:?}", other),
    }
}

#[test]
fn test_sequence_given_where_single_declared() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let body = br#"{"title":["one","two"],"urls":[]}"#;
    let outcome: DecodeOutcome<ListingPage> = decode_record(body, &schema);

    match outcome {
        DecodeOutcome::Partial { warnings, .. } => {
            assert_eq!(
                warnings,
                vec![DecodeWarning::ExpectedString {
                    key: "title".to_string(),
                    found: "array",
                }]
            );
        }
        other => panic!("Expected partial decode, got {:?}", other),
    }
}

#[test]
fn test_non_string_elements_warn_and_string_elements_survive() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let body = br#"{"title":"t","urls":["https://x/a",7,"https://x/b",null]}"#;
    let outcome: DecodeOutcome<ListingPage> = decode_record(body, &schema);

    match outcome {
        DecodeOutcome::Partial {
            record, warnings, ..
        } => {
            assert_eq!(record.urls, vec!["https://x/a", "https://x/b"]);
            assert_eq!(
                warnings,
                vec![
                    DecodeWarning::NonStringElement {
                        key: "urls".to_string(),
                        index: 1,
                    },
                    DecodeWarning::NonStringElement {
                        key: "urls".to_string(),
                        index: 3,
                    },
                ]
            );
        }
        other => panic!("Expected partial decode, got {:?}", other),
    }
}

#[test]
fn test_unknown_json_keys_are_ignored() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let body = br#"{"title":"t","urls":[],"price":"$1","extra":{"nested":true}}"#;
    let outcome: DecodeOutcome<ListingPage> = decode_record(body, &schema);

    match outcome {
        DecodeOutcome::Clean { fields, .. } => {
            assert_eq!(fields.len(), 2);
            assert!(fields.get("price").is_none());
        }
        other => panic!("Expected clean decode, got {:?}", other),
    }
}

#[test]
fn test_empty_json_object_decodes_clean_and_empty() {
    let schema = compile::<ListingPage>().expect("Failed to compile");

    let outcome: DecodeOutcome<ListingPage> = decode_record(b"{}", &schema);

    match outcome {
        DecodeOutcome::Clean { record, fields } => {
            assert_eq!(record, ListingPage::default());
            assert!(fields.is_empty());
        }
        other => panic!("Expected clean decode, got {:?}", other),
    }
}
