//! Rule-based classification of fetch outcomes
//!
//! A fetch that returns HTTP 200 can still be a challenge page, a CAPTCHA
//! wall, or an unrelated document. The inspector classifies a
//! [`FetchResult`]/decoded-fields pair against an ordered list of declarative
//! rules: rules are evaluated in declaration order and the first match wins.
//! When no rule matches, the verdict is [`Verdict::Anomalous`] — the response
//! needs manual inspection.
//!
//! Order sensitivity is the point: a body can contain both a blocking marker
//! and the expected content marker, and whichever rule is declared first
//! decides.
//!
//! # Examples
//!
//! ```ignore
//! use renderfetch::{Inspector, Rule, Verdict};
//!
//! let inspector = Inspector::new(vec![
//!     Rule::body_contains("Checking your browser", Verdict::Blocked),
//!     Rule::body_contains("recaptcha", Verdict::Blocked),
//!     Rule::field_equals("title", "Trucks For Sale", Verdict::Success),
//!     Rule::field_non_empty("urls", Verdict::Success),
//! ]);
//!
//! match inspector.classify(&result, outcome.fields()) {
//!     Verdict::Success => println!("got real content"),
//!     Verdict::Blocked => println!("anti-bot wall"),
//!     other => println!("needs a look: {:?}", other),
//! }
//! ```

use crate::{DecodedFields, FetchError, FetchResult, FieldValue};

/// Classification of one fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The response carries the expected content
    Success,
    /// The response is an anti-bot or challenge page
    Blocked,
    /// No rule matched; requires manual inspection
    Anomalous,
    /// The fetch failed before a usable response arrived
    TransportError,
    /// The remote service reported failure
    ServiceError,
}

impl Verdict {
    /// Classify the error arm of a fetch
    ///
    /// Lets callers fold both arms of `fetch`'s result into one verdict:
    /// transport failures and timeouts are transport-level, explicit service
    /// failures are service-level, and a syntactically invalid URL is a
    /// caller defect surfaced as anomalous.
    pub fn from_error(error: &FetchError) -> Verdict {
        match error {
            FetchError::Transport { .. } | FetchError::Timeout { .. } => Verdict::TransportError,
            FetchError::Service { .. } => Verdict::ServiceError,
            FetchError::InvalidUrl { .. } => Verdict::Anomalous,
        }
    }
}

/// One declarative post-condition on a fetch outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Matches when the body contains the marker substring
    BodyContains { marker: String, verdict: Verdict },

    /// Matches when a decoded single-valued field equals the expected literal
    FieldEquals {
        key: String,
        expected: String,
        verdict: Verdict,
    },

    /// Matches when a decoded field is present and non-empty
    FieldNonEmpty { key: String, verdict: Verdict },
}

impl Rule {
    /// Rule matching a marker substring anywhere in the body
    pub fn body_contains(marker: impl Into<String>, verdict: Verdict) -> Self {
        Rule::BodyContains {
            marker: marker.into(),
            verdict,
        }
    }

    /// Rule matching a decoded field against an expected literal
    pub fn field_equals(
        key: impl Into<String>,
        expected: impl Into<String>,
        verdict: Verdict,
    ) -> Self {
        Rule::FieldEquals {
            key: key.into(),
            expected: expected.into(),
            verdict,
        }
    }

    /// Rule matching any non-empty decoded field
    pub fn field_non_empty(key: impl Into<String>, verdict: Verdict) -> Self {
        Rule::FieldNonEmpty {
            key: key.into(),
            verdict,
        }
    }

    /// The verdict this rule produces when it matches
    pub fn verdict(&self) -> Verdict {
        match self {
            Rule::BodyContains { verdict, .. }
            | Rule::FieldEquals { verdict, .. }
            | Rule::FieldNonEmpty { verdict, .. } => *verdict,
        }
    }

    fn matches(&self, result: &FetchResult, fields: Option<&DecodedFields>) -> bool {
        match self {
            Rule::BodyContains { marker, .. } => result.body_text().contains(marker.as_str()),
            Rule::FieldEquals { key, expected, .. } => fields
                .and_then(|fields| fields.get(key))
                .and_then(FieldValue::as_one)
                .is_some_and(|value| value == expected),
            Rule::FieldNonEmpty { key, .. } => fields
                .and_then(|fields| fields.get(key))
                .is_some_and(|value| !value.is_empty()),
        }
    }
}

/// Ordered rule engine over fetch outcomes
///
/// Rules are caller-supplied per target; the inspector itself is immutable
/// and reusable across fetches.
#[derive(Debug, Clone)]
pub struct Inspector {
    rules: Vec<Rule>,
}

impl Inspector {
    /// Create an inspector from an ordered rule list
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Classify a fetch outcome; first matching rule wins
    ///
    /// `fields` is `None` when the fetch had no extraction schema or the body
    /// was malformed; field rules simply never match in that case.
    pub fn classify(&self, result: &FetchResult, fields: Option<&DecodedFields>) -> Verdict {
        for rule in &self.rules {
            if rule.matches(result, fields) {
                let verdict = rule.verdict();
                tracing::debug!(?verdict, ?rule, "rule matched");
                return verdict;
            }
        }
        tracing::debug!(status = result.status, "no rule matched");
        Verdict::Anomalous
    }
}
