//! Rule-based example classification
//!
//! Assigns exactly one [`Category`] to every (raw example, parse outcome)
//! pair. Classification is a pure function of its inputs plus the configured
//! [`ClassifyRules`]; the same inputs always yield the same category.
//!
//! Error-demo sentinels run first: an example that deliberately demonstrates
//! a failure (out-of-range payload value, reference to a nonexistent
//! resource, or a command that does not parse at all) is an error demo even
//! when its URL would otherwise route to a feature category. After that the
//! ordered route table applies, first match wins, and anything left over is
//! `Other` — no pair falls through unclassified.

use crate::config::{ClassifyRules, RangeRule};
use crate::types::{Body, Category, ParseOutcome, RawExample, RequestDescriptor};

/// Classify one example.
#[must_use]
pub fn classify(raw: &RawExample, outcome: &ParseOutcome, rules: &ClassifyRules) -> Category {
    if is_error_demo(raw, outcome, rules) {
        return Category::ErrorDemo;
    }

    if let Some(descriptor) = outcome.descriptor() {
        for rule in &rules.routes {
            if descriptor.url.contains(&rule.needle) {
                return rule.category;
            }
        }
    }

    Category::Other
}

/// Error-demo heuristics: parse failure, a known out-of-range parameter
/// value, or a reference to a deliberately nonexistent resource token.
fn is_error_demo(raw: &RawExample, outcome: &ParseOutcome, rules: &ClassifyRules) -> bool {
    if !outcome.is_parsed() {
        return true;
    }
    if rules.bogus_tokens.iter().any(|t| raw.text.contains(t.as_str())) {
        return true;
    }
    outcome
        .descriptor()
        .is_some_and(|d| body_out_of_range(d, &rules.ranges))
}

/// Whether any configured range rule is violated by a top-level numeric
/// field of a JSON body.
fn body_out_of_range(descriptor: &RequestDescriptor, ranges: &[RangeRule]) -> bool {
    let Body::Json(value) = &descriptor.body else {
        return false;
    };
    let Some(object) = value.as_object() else {
        return false;
    };
    ranges.iter().any(|rule| {
        object
            .get(&rule.param)
            .and_then(serde_json::Value::as_f64)
            .is_some_and(|v| v < rule.min || v > rule.max)
    })
}

/// Diagnostic notes for attachments whose path matches a missing-file
/// marker. These are annotations, not failures: a command can parse cleanly
/// and still reference a file the documentation knows is absent.
#[must_use]
pub fn file_reference_notes(descriptor: &RequestDescriptor, rules: &ClassifyRules) -> Vec<String> {
    let mut notes = Vec::new();
    for attachment in &descriptor.attached_files {
        for marker in &rules.missing_file_markers {
            if attachment.path.contains(marker.as_str()) {
                notes.push(format!(
                    "file reference issue: field '{}' references '{}' (matches marker '{}')",
                    attachment.field_name, attachment.path, marker
                ));
                break;
            }
        }
    }
    notes
}
