//! Command example extraction from documentation text
//!
//! Scans markdown for fenced code blocks tagged as shell examples and yields
//! the `curl` commands they contain, one [`RawExample`] per command, in
//! source order. Multi-line commands joined by trailing-backslash
//! continuations come back as a single example.
//!
//! Extraction never fails: prose, unrelated fences, and malformed blocks are
//! skipped, and a document with no examples yields an empty vector. A command
//! left dangling by a continuation at the end of a block is still returned
//! verbatim so the parser can reject it with a diagnostic.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use tracing::debug;

use crate::types::RawExample;

/// Fence language tags treated as shell example blocks
const SHELL_LANGS: &[&str] = &["bash", "sh", "shell", "console", "zsh"];

/// Extract all command examples from a documentation text blob.
#[must_use]
pub fn extract_examples(text: &str) -> Vec<RawExample> {
    let mut examples = Vec::new();
    let mut fence: Option<FenceBlock> = None;

    for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                if is_shell_lang(&info) {
                    // Content starts on the line after the opening fence;
                    // line_of_offset is 0-based, source locations are 1-based
                    fence = Some(FenceBlock {
                        content: String::new(),
                        first_content_line: line_of_offset(text, range.start) + 2,
                    });
                }
            }
            Event::Text(t) => {
                if let Some(block) = fence.as_mut() {
                    block.content.push_str(&t);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = fence.take() {
                    collect_commands(&block, &mut examples);
                }
            }
            _ => {}
        }
    }

    debug!(count = examples.len(), "extracted command examples");
    examples
}

struct FenceBlock {
    content: String,
    /// 1-based line number of the first content line in the source text
    first_content_line: usize,
}

/// Whether a fence info string names a shell dialect (`bash`, `sh,no_run`, ...)
fn is_shell_lang(info: &str) -> bool {
    let lang = info
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .unwrap_or("");
    SHELL_LANGS.contains(&lang)
}

/// Scan one fence's content for `curl` commands and append them as examples.
fn collect_commands(block: &FenceBlock, examples: &mut Vec<RawExample>) {
    let lines: Vec<&str> = block.content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end_matches('\r');
        let stripped = strip_prompt(line).trim_start();

        if !is_command_start(stripped) {
            i += 1;
            continue;
        }

        let start_line = block.first_content_line + i;
        let mut text = String::new();
        let mut current = stripped.trim_end().to_string();

        // Join trailing-backslash continuations into one logical command.
        // A continuation dangling at the end of the block keeps its backslash
        // so the parser reports it instead of us guessing.
        loop {
            if let Some(head) = current.strip_suffix('\\')
                && i + 1 < lines.len()
            {
                text.push_str(head.trim_end());
                text.push(' ');
                i += 1;
                current = lines[i].trim_end_matches('\r').trim().to_string();
            } else {
                text.push_str(&current);
                break;
            }
        }

        let end_line = block.first_content_line + i;
        examples.push(RawExample {
            index: examples.len(),
            text,
            source_location: Some((start_line, end_line)),
        });
        i += 1;
    }
}

/// Strip an interactive prompt prefix (`$ `) when present
fn strip_prompt(line: &str) -> &str {
    line.trim_start().strip_prefix("$ ").unwrap_or(line)
}

fn is_command_start(stripped: &str) -> bool {
    stripped
        .split_whitespace()
        .next()
        .is_some_and(|tok| tok == "curl")
}

/// 0-based line number containing the given byte offset
fn line_of_offset(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_no_examples() {
        assert!(extract_examples("").is_empty());
        assert!(extract_examples("Just prose, no fences.").is_empty());
    }

    #[test]
    fn non_shell_fences_are_skipped() {
        let md = "```json\n{\"not\": \"a command\"}\n```\n";
        assert!(extract_examples(md).is_empty());
    }

    #[test]
    fn single_line_example() {
        let md = "Intro text.\n\n```bash\ncurl -X GET http://host/api/v1/health\n```\n";
        let examples = extract_examples(md);
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].index, 0);
        assert_eq!(examples[0].text, "curl -X GET http://host/api/v1/health");
        assert_eq!(examples[0].source_location, Some((4, 4)));
    }

    #[test]
    fn continuation_lines_join_into_one_example() {
        let md = "```bash\ncurl -X POST http://host/api/v1/tts \\\n  -H 'Content-Type: application/json' \\\n  -d '{\"text\":\"hi\"}'\n```\n";
        let examples = extract_examples(md);
        assert_eq!(examples.len(), 1);
        assert_eq!(
            examples[0].text,
            "curl -X POST http://host/api/v1/tts -H 'Content-Type: application/json' -d '{\"text\":\"hi\"}'"
        );
        assert_eq!(examples[0].source_location, Some((2, 4)));
    }

    #[test]
    fn prose_inside_fence_is_skipped() {
        let md = "```bash\n# check the service first\ncurl http://host/health\necho done\ncurl http://host/voices\n```\n";
        let examples = extract_examples(md);
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].text, "curl http://host/health");
        assert_eq!(examples[1].text, "curl http://host/voices");
        assert_eq!(examples[1].index, 1);
    }

    #[test]
    fn prompt_prefix_is_stripped() {
        let md = "```console\n$ curl http://host/health\n```\n";
        let examples = extract_examples(md);
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].text, "curl http://host/health");
    }

    #[test]
    fn dangling_continuation_is_kept_for_the_parser() {
        let md = "```bash\ncurl http://host/tts \\\n```\n";
        let examples = extract_examples(md);
        assert_eq!(examples.len(), 1);
        assert!(examples[0].text.ends_with('\\'));
    }

    #[test]
    fn multiple_fences_preserve_source_order() {
        let md = "```bash\ncurl http://a/health\n```\n\ntext\n\n```sh\ncurl http://b/voices\n```\n";
        let examples = extract_examples(md);
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].text, "curl http://a/health");
        assert_eq!(examples[1].text, "curl http://b/voices");
    }
}
