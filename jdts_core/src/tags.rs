use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// The identity of a Javadoc block tag.
///
/// Well-known tags get their own variant. Any other name is kept as
/// [`TagKind::Custom`] so custom tags in a policy can still be matched by
/// identity. [`TagKind::None`] marks a degenerate tag line that carried no
/// content at all, such as a bare `@author`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagKind {
	Author,
	Version,
	Since,
	Param,
	Return,
	Throws,
	Exception,
	See,
	Deprecated,
	Serial,
	SerialData,
	SerialField,
	Custom(String),
	None,
}

impl TagKind {
	/// Resolve a tag name (without the leading `@`).
	pub fn from_name(name: &str) -> Self {
		let name = name.trim().trim_start_matches('@');
		match name {
			"author" => Self::Author,
			"version" => Self::Version,
			"since" => Self::Since,
			"param" => Self::Param,
			"return" => Self::Return,
			"throws" => Self::Throws,
			"exception" => Self::Exception,
			"see" => Self::See,
			"deprecated" => Self::Deprecated,
			"serial" => Self::Serial,
			"serialData" => Self::SerialData,
			"serialField" => Self::SerialField,
			"" => Self::None,
			other => Self::Custom(other.to_string()),
		}
	}

	/// The tag name as written after `@`.
	pub fn name(&self) -> &str {
		match self {
			Self::Author => "author",
			Self::Version => "version",
			Self::Since => "since",
			Self::Param => "param",
			Self::Return => "return",
			Self::Throws => "throws",
			Self::Exception => "exception",
			Self::See => "see",
			Self::Deprecated => "deprecated",
			Self::Serial => "serial",
			Self::SerialData => "serialData",
			Self::SerialField => "serialField",
			Self::Custom(name) => name,
			Self::None => "",
		}
	}

	/// Tags whose value is a version and may take part in `ifLower`
	/// comparisons.
	pub fn is_versioned(&self) -> bool {
		matches!(self, Self::Version | Self::Since)
	}
}

impl fmt::Display for TagKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "@{}", self.name())
	}
}

impl From<String> for TagKind {
	fn from(value: String) -> Self {
		Self::from_name(&value)
	}
}

impl From<TagKind> for String {
	fn from(kind: TagKind) -> Self {
		kind.name().to_string()
	}
}

/// One tag occurrence inside a Javadoc body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavadocTagEntry {
	pub tag_type: TagKind,
	/// First token after the tag name. For a degenerate tag this is the tag
	/// name itself.
	pub value: String,
	/// Everything after the value, with continuation lines folded into a
	/// single space-separated string.
	pub description: String,
	/// The exact text of the tag in the body, including the newline that
	/// precedes it (when there is one) and the `*` line prefix. Edits locate
	/// the tag by searching for this text.
	pub raw_matched_text: String,
	/// The comment prefix the tag line was written with, e.g. `" * "`.
	pub line_prefix: String,
}

impl JavadocTagEntry {
	/// Render a replacement for this entry that keeps its original line
	/// prefix and leading newline.
	pub fn rewrite_with(&self, tag: &TagKind, value: &str, description: &str) -> String {
		let leading = if self.raw_matched_text.starts_with('\n') {
			"\n"
		} else {
			""
		};
		format!(
			"{leading}{}",
			format_tag_line(&self.line_prefix, tag, value, description)
		)
	}
}

/// Format a single tag line: `{prefix}@{tag} {value} {description}` with
/// trailing whitespace removed.
pub fn format_tag_line(prefix: &str, tag: &TagKind, value: &str, description: &str) -> String {
	let mut line = format!("{prefix}@{}", tag.name());
	for part in [value.trim(), description.trim()] {
		if !part.is_empty() {
			line.push(' ');
			line.push_str(part);
		}
	}
	line.trim_end().to_string()
}

/// Matches a tag line: comment prefix, `@name`, and the rest of the line.
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([ \t]*\*?[ \t]*)@([A-Za-z][\w.-]*)(.*)$")
		.unwrap_or_else(|e| panic!("invalid tag line pattern: {e}"))
});

/// Strips a comment continuation prefix (`   * `) from a line.
fn strip_comment_prefix(line: &str) -> &str {
	let trimmed = line.trim_start();
	let trimmed = trimmed.strip_prefix('*').unwrap_or(trimmed);
	trimmed.trim()
}

/// The ordered tags found in one Javadoc body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JavadocTags {
	entries: Vec<JavadocTagEntry>,
}

impl JavadocTags {
	/// Parse the body of a Javadoc comment (the text between `/**` and
	/// `*/`). Empty input gives an empty tag list.
	pub fn parse(body: &str) -> Self {
		if body.trim().is_empty() {
			return Self::default();
		}

		let lines = line_spans(body);
		let mut entries = Vec::new();
		let mut index = 0;

		while index < lines.len() {
			let (start, line) = lines[index];
			let Some(captures) = TAG_LINE.captures(line) else {
				index += 1;
				continue;
			};

			let line_prefix = captures.get(1).map_or("", |m| m.as_str()).to_string();
			let name = captures.get(2).map_or("", |m| m.as_str());
			let rest = captures.get(3).map_or("", |m| m.as_str()).trim();

			// Fold continuation lines up to the next tag, leaving trailing blank
			// lines outside the match.
			let mut folded = vec![rest.to_string()];
			let mut last_line = index;
			let mut next = index + 1;
			while next < lines.len() && !TAG_LINE.is_match(lines[next].1) {
				let text = strip_comment_prefix(lines[next].1);
				if !text.is_empty() {
					folded.push(text.to_string());
					last_line = next;
				}
				next += 1;
			}

			let raw_start = if start > 0 && body.as_bytes()[start - 1] == b'\n' {
				start - 1
			} else {
				start
			};
			let raw_end = lines[last_line].0 + lines[last_line].1.trim_end().len();
			let text = folded
				.iter()
				.map(|part| part.trim())
				.filter(|part| !part.is_empty())
				.collect::<Vec<_>>()
				.join(" ");

			let (tag_type, value, description) = if text.is_empty() {
				(TagKind::None, name.to_string(), String::new())
			} else {
				let (value, description) = text
					.split_once(char::is_whitespace)
					.map_or((text.as_str(), ""), |(v, d)| (v, d.trim()));
				(
					TagKind::from_name(name),
					value.to_string(),
					description.to_string(),
				)
			};

			entries.push(JavadocTagEntry {
				tag_type,
				value,
				description,
				raw_matched_text: body[raw_start..raw_end].to_string(),
				line_prefix,
			});

			index = next;
		}

		Self { entries }
	}

	/// First entry with the given tag identity.
	pub fn find(&self, tag: &TagKind) -> Option<&JavadocTagEntry> {
		self.entries.iter().find(|entry| &entry.tag_type == tag)
	}

	pub fn entries(&self) -> &[JavadocTagEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Byte offset and content of each line in `text`, without the `\n`.
fn line_spans(text: &str) -> Vec<(usize, &str)> {
	let mut spans = Vec::new();
	let mut offset = 0;
	for line in text.split('\n') {
		spans.push((offset, line));
		offset += line.len() + 1;
	}
	spans
}
