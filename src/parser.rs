//! Command parsing: one raw example string → structured request descriptor
//!
//! The parser understands the `curl` dialect used in the documentation, not
//! shell syntax in general. It is lenient by design: only structural problems
//! (an unterminated quote, a dangling continuation, a missing URL) produce a
//! [`ParseOutcome::Failed`]. Application-level oddities — unknown paths,
//! out-of-range payload values, references to files that do not exist — still
//! parse; judging them is the classifier's and executor's concern.
//!
//! The parser is a pure function over its input string and never touches the
//! filesystem; `-F field=@path` attachments are recorded as path references.

use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{Body, FileAttachment, Method, ParseOutcome, RequestDescriptor};

/// Flags that set a header entry
const HEADER_FLAGS: &[&str] = &["-H", "--header"];
/// Flags that override the request method
const METHOD_FLAGS: &[&str] = &["-X", "--request"];
/// Flags that attach a request body
const DATA_FLAGS: &[&str] = &["-d", "--data", "--data-raw", "--data-binary", "--data-ascii"];
/// Flags that add a multipart form part
const FORM_FLAGS: &[&str] = &["-F", "--form"];

/// Unrecognized flags known to consume a value token. Anything not listed
/// here (or above) is treated as a bare switch. This list only needs to cover
/// flags that plausibly appear in documentation examples.
const IGNORED_VALUE_FLAGS: &[&str] = &[
    "-o",
    "--output",
    "-u",
    "--user",
    "-A",
    "--user-agent",
    "-m",
    "--max-time",
    "--connect-timeout",
    "-e",
    "--referer",
    "-b",
    "--cookie",
    "--retry",
];

/// Parse one extracted command example into a request descriptor.
#[must_use]
pub fn parse_command(text: &str) -> ParseOutcome {
    // A trailing backslash is a continuation that never got its next line;
    // shell-words would tokenize it as a literal backslash
    if text.trim_end().ends_with('\\') {
        return ParseOutcome::Failed {
            reason: "unterminated line continuation".to_string(),
        };
    }

    let tokens = match shell_words::split(text) {
        Ok(tokens) => tokens,
        Err(e) => {
            return ParseOutcome::Failed {
                reason: format!("tokenization failed: {e}"),
            };
        }
    };

    if tokens.is_empty() {
        return ParseOutcome::Failed {
            reason: "empty command".to_string(),
        };
    }

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    let mut method_override: Option<Method> = None;
    let mut body = Body::None;
    let mut form_fields: Vec<(String, String)> = Vec::new();
    let mut attached_files: Vec<FileAttachment> = Vec::new();
    let mut url: Option<String> = None;

    // tokens[0] is the command name; flags may come in any order and any
    // repetition, with later occurrences of single-valued flags winning
    let mut iter = tokens.into_iter().skip(1);
    while let Some(token) = iter.next() {
        let (flag, inline_value) = split_long_flag(&token);

        if HEADER_FLAGS.contains(&flag) {
            if let Some(value) = take_value(inline_value, &mut iter) {
                apply_header(&mut headers, &value);
            }
        } else if METHOD_FLAGS.contains(&flag) {
            if let Some(value) = take_value(inline_value, &mut iter) {
                match Method::parse(&value) {
                    Some(method) => method_override = Some(method),
                    // Lenient: an unrepresentable method keeps the inferred one
                    None => debug!(method = %value, "ignoring unrecognized method"),
                }
            }
        } else if DATA_FLAGS.contains(&flag) {
            if let Some(value) = take_value(inline_value, &mut iter) {
                body = parse_body(&value);
            }
        } else if FORM_FLAGS.contains(&flag) {
            if let Some(value) = take_value(inline_value, &mut iter) {
                apply_form_part(&mut form_fields, &mut attached_files, &value);
            }
        } else if IGNORED_VALUE_FLAGS.contains(&flag) {
            let _ = take_value(inline_value, &mut iter);
        } else if flag.starts_with('-') {
            // Unrecognized switch: ignored for forward compatibility
            debug!(flag, "ignoring unrecognized flag");
        } else if url.is_none() {
            url = Some(token);
        }
        // Extra positional tokens after the URL are ignored
    }

    let Some(url) = url else {
        return ParseOutcome::Failed {
            reason: "no URL found in command".to_string(),
        };
    };

    let has_body = !body.is_none() || !form_fields.is_empty() || !attached_files.is_empty();
    let method = method_override.unwrap_or(if has_body { Method::Post } else { Method::Get });

    ParseOutcome::Parsed(RequestDescriptor {
        query_params: parse_query(&url),
        method,
        url,
        headers,
        body,
        form_fields,
        attached_files,
    })
}

/// Split `--flag=value` into its flag and inline value; short flags and plain
/// long flags pass through unchanged.
fn split_long_flag(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--")
        && let Some(eq) = token.find('=')
    {
        return (&token[..eq], Some(&token[eq + 1..]));
    }
    (token, None)
}

/// Inline `--flag=value` value, or the next token. A flag dangling at the end
/// of the command has no value and is dropped rather than failing the parse.
fn take_value(
    inline: Option<&str>,
    iter: &mut impl Iterator<Item = String>,
) -> Option<String> {
    match inline {
        Some(v) => Some(v.to_string()),
        None => iter.next(),
    }
}

/// Split a header on the first colon; keys lowercased so duplicate headers
/// differing only in case overwrite each other (last write wins).
fn apply_header(headers: &mut BTreeMap<String, String>, value: &str) {
    match value.split_once(':') {
        Some((name, val)) => {
            headers.insert(name.trim().to_ascii_lowercase(), val.trim().to_string());
        }
        None => debug!(header = value, "ignoring header without colon"),
    }
}

/// JSON when the payload deserializes as JSON, raw bytes otherwise
fn parse_body(payload: &str) -> Body {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => Body::Json(value),
        Err(_) => Body::Raw(payload.as_bytes().to_vec()),
    }
}

/// Interpret one `-F` part: `field=@path;type=mime` becomes an attachment,
/// `field=value` a plain multipart text field.
fn apply_form_part(
    form_fields: &mut Vec<(String, String)>,
    attached_files: &mut Vec<FileAttachment>,
    value: &str,
) {
    let Some((field, rest)) = value.split_once('=') else {
        debug!(part = value, "ignoring form part without '='");
        return;
    };

    let Some(file_spec) = rest.strip_prefix('@') else {
        form_fields.push((field.to_string(), rest.to_string()));
        return;
    };

    let mut segments = file_spec.split(';');
    let path = segments.next().unwrap_or_default().to_string();
    let mut content_type = None;
    let mut file_name = None;

    for segment in segments {
        match segment.split_once('=') {
            Some(("type", mime)) => content_type = Some(mime.trim().to_string()),
            Some(("filename", name)) => file_name = Some(name.trim().to_string()),
            _ => debug!(segment, "ignoring unrecognized form modifier"),
        }
    }

    let file_name = file_name.unwrap_or_else(|| {
        path.rsplit(['/', '\\'])
            .next()
            .unwrap_or(path.as_str())
            .to_string()
    });

    attached_files.push(FileAttachment {
        field_name: field.to_string(),
        file_name,
        path,
        content_type,
    });
}

/// Split a URL's query string into a key → value map. The first `=` separates
/// key from value; a key without `=` maps to the empty string.
fn parse_query(url: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let Some((_, query)) = url.split_once('?') else {
        return params;
    };
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((k, v)) => params.insert(k.to_string(), v.to_string()),
            None => params.insert(pair.to_string(), String::new()),
        };
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(text: &str) -> RequestDescriptor {
        match parse_command(text) {
            ParseOutcome::Parsed(d) => d,
            ParseOutcome::Failed { reason } => panic!("expected parse, got failure: {reason}"),
        }
    }

    fn failed(text: &str) -> String {
        match parse_command(text) {
            ParseOutcome::Failed { reason } => reason,
            ParseOutcome::Parsed(d) => panic!("expected failure, got parse: {d:?}"),
        }
    }

    #[test]
    fn simple_get() {
        let d = parsed("curl -X GET http://host/api/v1/health");
        assert_eq!(d.method, Method::Get);
        assert_eq!(d.url, "http://host/api/v1/health");
        assert!(d.body.is_none());
        assert!(d.headers.is_empty());
    }

    #[test]
    fn method_defaults_to_get_without_body() {
        let d = parsed("curl http://host/api/v1/voices");
        assert_eq!(d.method, Method::Get);
    }

    #[test]
    fn method_defaults_to_post_with_body() {
        let d = parsed("curl http://host/api/v1/tts -d '{\"text\":\"hi\"}'");
        assert_eq!(d.method, Method::Post);
    }

    #[test]
    fn method_defaults_to_post_with_form() {
        let d = parsed("curl http://host/api/v1/vc -F 'audio=@in.wav'");
        assert_eq!(d.method, Method::Post);
    }

    #[test]
    fn explicit_method_overrides_inference() {
        let d = parsed("curl -X PUT http://host/api/v1/voices/abc -d '{}'");
        assert_eq!(d.method, Method::Put);
    }

    #[test]
    fn later_method_flag_wins() {
        let d = parsed("curl -X POST -X DELETE http://host/api/v1/voices/abc");
        assert_eq!(d.method, Method::Delete);
    }

    #[test]
    fn headers_split_on_first_colon_and_lowercase() {
        let d = parsed("curl http://h/x -H 'Content-Type: application/json' -H 'X-Note: a:b:c'");
        assert_eq!(
            d.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(d.headers.get("x-note").map(String::as_str), Some("a:b:c"));
    }

    #[test]
    fn duplicate_headers_last_write_wins() {
        let d = parsed("curl http://h/x -H 'Accept: text/plain' -H 'accept: audio/wav'");
        assert_eq!(d.headers.len(), 1);
        assert_eq!(d.headers.get("accept").map(String::as_str), Some("audio/wav"));
    }

    #[test]
    fn json_body_is_detected() {
        let d = parsed(r#"curl http://h/tts -d '{"text":"hello","speed":1.0}'"#);
        assert_eq!(d.body, Body::Json(json!({"text": "hello", "speed": 1.0})));
    }

    #[test]
    fn non_json_body_stays_raw() {
        let d = parsed("curl http://h/tts -d 'text=hello&mode=fast'");
        assert_eq!(d.body, Body::Raw(b"text=hello&mode=fast".to_vec()));
    }

    #[test]
    fn later_data_flag_wins() {
        let d = parsed(r#"curl http://h/tts -d 'first' -d '{"second":true}'"#);
        assert_eq!(d.body, Body::Json(json!({"second": true})));
    }

    #[test]
    fn form_file_with_type_and_implicit_filename() {
        let d = parsed("curl http://h/vc -F 'audio=@samples/input.wav;type=audio/wav'");
        assert_eq!(d.attached_files.len(), 1);
        let f = &d.attached_files[0];
        assert_eq!(f.field_name, "audio");
        assert_eq!(f.path, "samples/input.wav");
        assert_eq!(f.file_name, "input.wav");
        assert_eq!(f.content_type.as_deref(), Some("audio/wav"));
    }

    #[test]
    fn form_text_field_without_at_sign() {
        let d = parsed("curl http://h/vc -F 'voice_id=abc123' -F 'audio=@in.wav'");
        assert_eq!(d.form_fields, vec![("voice_id".to_string(), "abc123".to_string())]);
        assert_eq!(d.attached_files.len(), 1);
    }

    #[test]
    fn pagination_query_round_trips() {
        let d = parsed("curl 'http://h/api/v1/outputs?page=1&page_size=5'");
        assert_eq!(d.query_params.get("page").map(String::as_str), Some("1"));
        assert_eq!(d.query_params.get("page_size").map(String::as_str), Some("5"));
        assert_eq!(d.url, "http://h/api/v1/outputs?page=1&page_size=5");
    }

    #[test]
    fn query_key_without_value_maps_to_empty() {
        let d = parsed("curl 'http://h/outputs?verbose&page=2'");
        assert_eq!(d.query_params.get("verbose").map(String::as_str), Some(""));
        assert_eq!(d.query_params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn long_flag_with_equals_value() {
        let d = parsed("curl --request=DELETE http://h/voices/abc");
        assert_eq!(d.method, Method::Delete);
    }

    #[test]
    fn unterminated_quote_fails() {
        let reason = failed("curl http://h/tts -d '{\"text\":\"oops}");
        assert!(reason.contains("tokenization"));
    }

    #[test]
    fn dangling_continuation_fails() {
        let reason = failed("curl http://h/tts \\");
        assert!(reason.contains("continuation"));
    }

    #[test]
    fn missing_url_fails() {
        let reason = failed("curl -X GET -H 'Accept: application/json'");
        assert!(reason.contains("no URL"));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let d = parsed("curl -s --fail-with-body -o out.wav http://h/outputs/latest");
        assert_eq!(d.url, "http://h/outputs/latest");
        assert_eq!(d.method, Method::Get);
    }

    #[test]
    fn unknown_method_keeps_inferred() {
        let d = parsed("curl -X TRACE http://h/health");
        assert_eq!(d.method, Method::Get);
    }

    #[test]
    fn nonexistent_paths_still_parse() {
        // Application-level content never fails the parse
        let d = parsed("curl http://h/api/v1/definitely/not/real");
        assert_eq!(d.url, "http://h/api/v1/definitely/not/real");
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = r#"curl -X POST http://h/api/v1/tts -H 'Content-Type: application/json' -d '{"text":"hi","temperature":0.7}'"#;
        assert_eq!(parse_command(text), parse_command(text));
    }
}
