use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::DeclarationKind;
use crate::InsertPosition;
use crate::JavadocTagEntry;
use crate::JavadocTags;
use crate::OverwriteRule;
use crate::RawJavadocBlock;
use crate::TagKind;
use crate::TagPolicy;
use crate::version;

/// Start of the first tag line in a working body. The match begins at the
/// newline so inserted text lands before the whole line.
static FIRST_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\n[ \t]*\*?[ \t]*@[A-Za-z]")
		.unwrap_or_else(|e| panic!("invalid tag line pattern: {e}"))
});

/// Counts of the edits made to one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockChanges {
	pub inserted: usize,
	pub overwritten: usize,
	pub removed: usize,
}

impl BlockChanges {
	pub fn is_empty(&self) -> bool {
		self.inserted == 0 && self.overwritten == 0 && self.removed == 0
	}

	pub fn total(&self) -> usize {
		self.inserted + self.overwritten + self.removed
	}
}

impl std::ops::AddAssign for BlockChanges {
	fn add_assign(&mut self, other: Self) {
		self.inserted += other.inserted;
		self.overwritten += other.overwritten;
		self.removed += other.removed;
	}
}

/// A rewritten Javadoc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRewrite {
	/// The full comment, `/**` through `*/`.
	pub text: String,
	pub changes: BlockChanges,
}

/// An existing tag line and what has happened to it so far.
struct TagSlot<'a> {
	entry: &'a JavadocTagEntry,
	/// Current text of the tag in the working body. `None` once removed.
	current: Option<String>,
	value: String,
}

/// A tag line queued for insertion by an earlier policy.
struct QueuedTag {
	tag: TagKind,
	value: String,
	line: String,
	position: InsertPosition,
}

/// Apply `policies`, in order, to one Javadoc block.
///
/// Each policy looks up the live state of its tag: the existing tag line as
/// earlier policies left it, or a line an earlier policy queued for
/// insertion. Then:
///
/// - absent: a new line is queued for the head (`beginning`) or the tail
///   (anything else), but only where the tag is properly placed;
/// - present on a declaration it does not belong on, with
///   `removeIfMisplaced`: every occurrence of the tag is deleted;
/// - otherwise the overwrite rule decides whether the tag line is replaced.
///
/// Queued head lines go before the first tag line (or after the
/// description when there is none), then tail lines are appended. Changes
/// are counted against the original comment, so policies that cancel each
/// other out leave the block unchanged. An unterminated comment is returned
/// unchanged.
pub fn apply_policies(
	block: &RawJavadocBlock,
	kind: DeclarationKind,
	tags: &JavadocTags,
	policies: &[TagPolicy],
) -> BlockRewrite {
	let unchanged = BlockRewrite {
		text: block.source_text.clone(),
		changes: BlockChanges::default(),
	};
	if !block.terminated {
		return unchanged;
	}

	let (content, closing) = split_closing(block.body());
	let prefix = tag_line_prefix(content, closing, &block.indent);
	let mut working = content.to_string();
	let mut slots: Vec<TagSlot<'_>> = tags
		.entries()
		.iter()
		.map(|entry| {
			TagSlot {
				entry,
				current: Some(entry.raw_matched_text.clone()),
				value: entry.value.clone(),
			}
		})
		.collect();
	let mut queued: Vec<QueuedTag> = Vec::new();

	for policy in policies {
		let tag = policy.tag();
		let placed = policy.is_properly_placed(kind);

		if policy.remove_if_misplaced() && !placed {
			for slot in slots.iter_mut().filter(|slot| &slot.entry.tag_type == tag) {
				if let Some(current) = slot.current.take() {
					remove_first(&mut working, &current);
					tracing::debug!(line = block.line, %tag, %kind, "removed misplaced tag");
				}
			}
			queued.retain(|pending| &pending.tag != tag);
			continue;
		}

		if let Some(slot) = slots
			.iter_mut()
			.find(|slot| slot.current.is_some() && &slot.entry.tag_type == tag)
		{
			if !should_overwrite(policy, &slot.value) {
				continue;
			}

			let replacement = slot
				.entry
				.rewrite_with(tag, policy.tag_value(), policy.tag_description());
			let Some(current) = slot.current.as_mut() else {
				continue;
			};
			if replacement != *current && replace_first(&mut working, current.as_str(), &replacement) {
				tracing::debug!(line = block.line, %tag, value = policy.tag_value(), "overwrote tag");
				*current = replacement;
				slot.value = policy.tag_value().to_string();
			}
			continue;
		}

		if let Some(pending) = queued.iter_mut().find(|pending| &pending.tag == tag) {
			if should_overwrite(policy, &pending.value) {
				tracing::debug!(line = block.line, %tag, value = policy.tag_value(), "replaced queued tag");
				pending.line = policy.format_line(&prefix);
				pending.value = policy.tag_value().to_string();
			}
			continue;
		}

		if !placed {
			tracing::trace!(line = block.line, %tag, %kind, "tag not allowed here");
			continue;
		}

		tracing::debug!(line = block.line, %tag, %kind, position = ?policy.insert_position(), "inserting tag");
		queued.push(QueuedTag {
			tag: tag.clone(),
			value: policy.tag_value().to_string(),
			line: policy.format_line(&prefix),
			position: policy.insert_position(),
		});
	}

	let mut changes = BlockChanges {
		inserted: queued.len(),
		..BlockChanges::default()
	};
	for slot in &slots {
		match &slot.current {
			None => changes.removed += 1,
			Some(current) if *current != slot.entry.raw_matched_text => changes.overwritten += 1,
			Some(_) => {}
		}
	}

	if changes.is_empty() {
		return unchanged;
	}

	let mut closing = closing.to_string();
	if !queued.is_empty() {
		// New lines need a multi-line comment to go into.
		if !working.contains('\n') {
			let text = working.trim();
			working = if text.is_empty() {
				String::new()
			} else {
				format!("\n{prefix}{text}")
			};
		}
		if !closing.contains('\n') {
			closing = format!("\n{} ", block.indent);
		}

		let (head, tail): (Vec<_>, Vec<_>) = queued
			.iter()
			.partition(|line| line.position == InsertPosition::Beginning);

		let head_text: String = head.iter().map(|line| format!("\n{}", line.line)).collect();
		match FIRST_TAG_LINE.find(&working) {
			Some(found) => working.insert_str(found.start(), &head_text),
			None => working.push_str(&head_text),
		}

		for line in &tail {
			working.push('\n');
			working.push_str(&line.line);
		}
	}

	BlockRewrite {
		text: format!("/**{working}{closing}*/"),
		changes,
	}
}

fn should_overwrite(policy: &TagPolicy, existing: &str) -> bool {
	match policy.overwrite() {
		OverwriteRule::Never | OverwriteRule::None => false,
		OverwriteRule::Always => true,
		OverwriteRule::IfLower => should_overwrite_lower(policy, existing),
	}
}

/// `ifLower` only ever applies to version-bearing tags whose existing and
/// configured values both parse as versions.
fn should_overwrite_lower(policy: &TagPolicy, existing: &str) -> bool {
	if !policy.tag().is_versioned() {
		return false;
	}

	let greater = version::is_strictly_greater(policy.tag_value(), existing);
	if !greater {
		tracing::trace!(
			%existing,
			configured = policy.tag_value(),
			"keeping existing version"
		);
	}
	greater
}

/// Split a body into its content and the trailing whitespace that precedes
/// `*/`. When `*/` sits on its own line the split is at the last newline.
fn split_closing(body: &str) -> (&str, &str) {
	if let Some(index) = body.rfind('\n') {
		if body[index + 1..].trim().is_empty() {
			return body.split_at(index);
		}
	}

	let content = body.trim_end();
	body.split_at(content.len())
}

/// The prefix new tag lines are written with, copied from the block's own
/// `*` lines where possible.
fn tag_line_prefix(content: &str, closing: &str, indent: &str) -> String {
	for line in content.split('\n').skip(1) {
		let trimmed = line.trim_start();
		if trimmed.starts_with('*') {
			let margin = &line[..line.len() - trimmed.len()];
			return format!("{margin}* ");
		}
	}

	if let Some(index) = closing.rfind('\n') {
		return format!("{}* ", &closing[index + 1..]);
	}

	format!("{indent} * ")
}

fn remove_first(haystack: &mut String, needle: &str) -> bool {
	replace_first(haystack, needle, "")
}

fn replace_first(haystack: &mut String, needle: &str, replacement: &str) -> bool {
	if needle.is_empty() {
		return false;
	}

	match haystack.find(needle) {
		Some(start) => {
			haystack.replace_range(start..start + needle.len(), replacement);
			true
		}
		None => false,
	}
}
