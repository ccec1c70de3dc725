//! Maven-style version ordering used by the `ifLower` overwrite rule.
//!
//! Versions are split into numeric and alphanumeric items on `.`, `-` and
//! `_`, and on transitions between digits and letters (`1.0rc1` is `1`,
//! `0`, `rc`, `1`). Numeric items compare as integers. Qualifiers compare by
//! their well-known rank (`alpha < beta < milestone < rc < snapshot <
//! release < sp`) and unknown qualifiers sort after all known ones,
//! lexically. Trailing zero and release items are ignored, so `1.0.0` equals
//! `1`.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
	Number(u64),
	Qualifier(String),
}

impl Item {
	fn is_null(&self) -> bool {
		match self {
			Self::Number(n) => *n == 0,
			Self::Qualifier(q) => qualifier_rank(q) == RELEASE_RANK,
		}
	}
}

const RELEASE_RANK: usize = 5;

fn qualifier_rank(qualifier: &str) -> usize {
	match qualifier {
		"alpha" | "a" => 0,
		"beta" | "b" => 1,
		"milestone" | "m" => 2,
		"rc" | "cr" => 3,
		"snapshot" => 4,
		"" | "ga" | "final" | "release" => RELEASE_RANK,
		"sp" => 6,
		_ => 7,
	}
}

fn compare_items(left: &Item, right: &Item) -> Ordering {
	match (left, right) {
		(Item::Number(a), Item::Number(b)) => a.cmp(b),
		// Any number outranks any qualifier: `1.1` > `1-rc`.
		(Item::Number(_), Item::Qualifier(_)) => Ordering::Greater,
		(Item::Qualifier(_), Item::Number(_)) => Ordering::Less,
		(Item::Qualifier(a), Item::Qualifier(b)) => {
			qualifier_rank(a)
				.cmp(&qualifier_rank(b))
				.then_with(|| a.cmp(b))
		}
	}
}

/// A parsed, comparable version string.
#[derive(Debug, Clone)]
pub struct MavenVersion {
	raw: String,
	items: Vec<Item>,
}

impl MavenVersion {
	/// Parse `value` as a version. Returns `None` unless it looks like a
	/// version token: it must start with a digit and contain only ASCII
	/// alphanumerics and `.`, `-`, `_`.
	pub fn parse(value: &str) -> Option<Self> {
		let raw = value.trim();
		let first = raw.chars().next()?;
		if !first.is_ascii_digit() {
			return None;
		}
		if !raw
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
		{
			return None;
		}

		let mut items = Vec::new();
		for segment in raw.split(['.', '-', '_']) {
			push_segment_items(segment, &mut items);
		}

		while items.last().is_some_and(Item::is_null) {
			items.pop();
		}

		Some(Self {
			raw: raw.to_string(),
			items,
		})
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}
}

fn push_segment_items(segment: &str, items: &mut Vec<Item>) {
	let mut current = String::new();
	let mut current_is_digit = false;

	for c in segment.chars() {
		let is_digit = c.is_ascii_digit();
		if !current.is_empty() && is_digit != current_is_digit {
			items.push(make_item(&current, current_is_digit));
			current.clear();
		}
		current_is_digit = is_digit;
		current.push(c);
	}

	if !current.is_empty() {
		items.push(make_item(&current, current_is_digit));
	}
}

fn make_item(token: &str, is_digit: bool) -> Item {
	if is_digit {
		// Overflowing numbers saturate rather than fail the parse.
		Item::Number(token.parse().unwrap_or(u64::MAX))
	} else {
		Item::Qualifier(token.to_ascii_lowercase())
	}
}

impl fmt::Display for MavenVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

impl PartialEq for MavenVersion {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for MavenVersion {
	fn cmp(&self, other: &Self) -> Ordering {
		let len = self.items.len().max(other.items.len());
		for index in 0..len {
			let ordering = match (self.items.get(index), other.items.get(index)) {
				(Some(left), Some(right)) => compare_items(left, right),
				// A missing item behaves like `0` against a number and like a
				// release against a qualifier.
				(Some(left), None) => compare_to_missing(left),
				(None, Some(right)) => compare_to_missing(right).reverse(),
				(None, None) => Ordering::Equal,
			};

			if ordering != Ordering::Equal {
				return ordering;
			}
		}

		Ordering::Equal
	}
}

fn compare_to_missing(item: &Item) -> Ordering {
	match item {
		Item::Number(n) => n.cmp(&0),
		Item::Qualifier(q) => qualifier_rank(q).cmp(&RELEASE_RANK),
	}
}

/// Returns `true` only when both values parse as versions and `candidate`
/// is strictly greater than `existing`.
pub fn is_strictly_greater(candidate: &str, existing: &str) -> bool {
	match (MavenVersion::parse(candidate), MavenVersion::parse(existing)) {
		(Some(candidate), Some(existing)) => candidate > existing,
		_ => false,
	}
}
