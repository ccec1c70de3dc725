use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Opening marker: `/**` followed by whitespace. `/***` banners and the empty
/// `/**/` comment are not Javadoc.
static JAVADOC_OPEN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"/\*\*\s").unwrap_or_else(|e| panic!("invalid javadoc open pattern: {e}"))
});

const JAVADOC_CLOSE: &str = "*/";

/// A Javadoc comment as it appears in the source, together with the code it
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawJavadocBlock {
	/// The comment exactly as written, from `/**` through `*/`. For an
	/// unterminated comment this runs to the next `/**` or end of input.
	pub source_text: String,
	/// Whitespace before `/**` on its line. Empty when code precedes the
	/// comment on the same line.
	pub indent: String,
	/// Annotation lines between the comment and the declaration.
	pub annotations: Vec<String>,
	/// The first non-annotation, non-blank line after the comment, trimmed.
	/// This is the classification subject.
	pub declaration: String,
	/// The code from the declaration line up to the next Javadoc comment,
	/// trimmed.
	pub following_code: String,
	/// 1-indexed line of the `/**` marker.
	pub line: usize,
	/// Byte offset of the `/**` marker in the source.
	pub offset: usize,
	/// Whether a closing `*/` was found.
	pub terminated: bool,
}

impl RawJavadocBlock {
	/// The text between `/**` and `*/`.
	pub fn body(&self) -> &str {
		let text = &self.source_text[3..];
		if self.terminated {
			&text[..text.len() - JAVADOC_CLOSE.len()]
		} else {
			text
		}
	}
}

/// Split source into its Javadoc blocks, in source order.
///
/// Text before the first `/**` never forms a block. A comment with no `*/`
/// yields an unterminated block with empty `following_code`.
pub fn split_blocks(content: &str) -> Vec<RawJavadocBlock> {
	let mut blocks = Vec::new();
	let mut cursor = 0;

	while cursor < content.len() {
		let Some(open) = JAVADOC_OPEN.find_at(content, cursor) else {
			break;
		};
		let start = open.start();
		let body_start = start + 3;

		// Comments do not nest, so the first `*/` closes the block even when
		// another `/**` appears inside it.
		let (source_end, rest, terminated) = match content[body_start..].find(JAVADOC_CLOSE) {
			Some(relative) => {
				let end = body_start + relative + JAVADOC_CLOSE.len();
				let following_end = JAVADOC_OPEN
					.find_at(content, end)
					.map_or(content.len(), |m| m.start());
				(end, &content[end..following_end], true)
			}
			None => {
				tracing::warn!(
					line = line_number(content, start),
					"unterminated javadoc comment"
				);
				let next_open = JAVADOC_OPEN
					.find_at(content, body_start)
					.map_or(content.len(), |m| m.start());
				(next_open, "", false)
			}
		};

		let (annotations, declaration, following_code) = scan_following_code(rest);

		blocks.push(RawJavadocBlock {
			source_text: content[start..source_end].to_string(),
			indent: leading_indent(content, start),
			annotations,
			declaration,
			following_code,
			line: line_number(content, start),
			offset: start,
			terminated,
		});

		cursor = source_end.max(body_start);
	}

	blocks
}

/// Walk the code after a comment: leading `@` lines are annotations, blank
/// lines are skipped, and the first other line is the declaration.
fn scan_following_code(rest: &str) -> (Vec<String>, String, String) {
	let mut annotations = Vec::new();
	let mut offset = 0;

	for line in rest.split_inclusive('\n') {
		let trimmed = line.trim();
		if trimmed.is_empty() {
			offset += line.len();
			continue;
		}
		if trimmed.starts_with('@') && !trimmed.starts_with("@interface") {
			annotations.push(trimmed.to_string());
			offset += line.len();
			continue;
		}

		let remaining = &rest[offset..];
		let declaration = remaining.lines().next().unwrap_or_default().trim().to_string();
		return (annotations, declaration, remaining.trim().to_string());
	}

	(annotations, String::new(), String::new())
}

/// The whitespace between the start of the line and `offset`, or an empty
/// string if anything else precedes it.
fn leading_indent(content: &str, offset: usize) -> String {
	let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
	let prefix = &content[line_start..offset];
	if prefix.chars().all(char::is_whitespace) {
		prefix.to_string()
	} else {
		String::new()
	}
}

fn line_number(content: &str, offset: usize) -> usize {
	content[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
