use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// The kind of Java declaration a Javadoc block documents.
///
/// Classification only ever looks at the first non-annotation line after a
/// comment, so this is a best-effort guess rather than a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeclarationKind {
	Class,
	Interface,
	Enum,
	AnnotationDefinition,
	AnnotationUsage,
	Field,
	Method,
	None,
}

impl DeclarationKind {
	/// Every kind in declaration order.
	pub const ALL: [Self; 8] = [
		Self::Class,
		Self::Interface,
		Self::Enum,
		Self::AnnotationDefinition,
		Self::AnnotationUsage,
		Self::Field,
		Self::Method,
		Self::None,
	];

	/// Whether Javadoc written above this kind of declaration is picked up by
	/// the javadoc tool.
	pub fn is_javadoc_target(self) -> bool {
		matches!(
			self,
			Self::Class
				| Self::Interface
				| Self::Enum
				| Self::AnnotationDefinition
				| Self::Field
				| Self::Method
		)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Class => "CLASS",
			Self::Interface => "INTERFACE",
			Self::Enum => "ENUM",
			Self::AnnotationDefinition => "ANNOTATION_DEFINITION",
			Self::AnnotationUsage => "ANNOTATION_USAGE",
			Self::Field => "FIELD",
			Self::Method => "METHOD",
			Self::None => "NONE",
		}
	}
}

impl fmt::Display for DeclarationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DeclarationKind {
	type Err = String;

	/// Accepts `CLASS`, `class`, `annotation_definition`,
	/// `annotationDefinition` and `annotation-definition` alike.
	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let normalized: String = value
			.trim()
			.chars()
			.filter(|c| *c != '_' && *c != '-')
			.map(|c| c.to_ascii_lowercase())
			.collect();

		let kind = match normalized.as_str() {
			"class" => Self::Class,
			"interface" => Self::Interface,
			"enum" => Self::Enum,
			"annotationdefinition" => Self::AnnotationDefinition,
			"annotationusage" => Self::AnnotationUsage,
			"field" => Self::Field,
			"method" => Self::Method,
			"none" => Self::None,
			_ => return Err(format!("unknown declaration kind `{value}`")),
		};

		Ok(kind)
	}
}

impl TryFrom<String> for DeclarationKind {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<DeclarationKind> for String {
	fn from(kind: DeclarationKind) -> Self {
		kind.as_str().to_string()
	}
}

/// Javadoc block tag names. A line starting with one of these is a tag that
/// leaked out of a comment, never an annotation.
const JAVADOC_TAG_NAMES: &[&str] = &[
	"author",
	"since",
	"version",
	"param",
	"return",
	"throws",
	"see",
	"deprecated",
];

const MODIFIERS: &str = r"(?:(?:public|protected|private|static|final|abstract|synchronized|native|transient|volatile|default|sealed|non-sealed|strictfp)\s+)*";

struct KindPattern {
	kind: DeclarationKind,
	regex: Regex,
}

/// Candidate kinds in the order they are tried. `FIELD` is checked before
/// `METHOD`. A field is one or more declarators followed by `;` or by an
/// initializer, which may run onto later lines. A parameter list never
/// matches, so a method signature cannot be taken for a field.
static CLASSIFICATION_ORDER: LazyLock<Vec<KindPattern>> = LazyLock::new(|| {
	let type_ref = r"[\w$.<>\[\]?]+(?:(?:,\s*|\s+(?:extends|super|&)\s+)[\w$.<>\[\]?]+)*";
	let declarator = r"[\w$]+\s*(?:\[\s*\]\s*)*";
	let table = [
		(
			DeclarationKind::Class,
			format!(r"^{MODIFIERS}(?:class|record)\s+[\w$]+"),
		),
		(
			DeclarationKind::Interface,
			format!(r"^{MODIFIERS}interface\s+[\w$]+"),
		),
		(DeclarationKind::Enum, format!(r"^{MODIFIERS}enum\s+[\w$]+")),
		(
			DeclarationKind::AnnotationDefinition,
			format!(r"^{MODIFIERS}@\s*interface\s+[\w$]+"),
		),
		(
			DeclarationKind::AnnotationUsage,
			r"^@([A-Za-z_$][\w$.]*)".to_string(),
		),
		(
			DeclarationKind::Field,
			format!(
				r"^(?:{MODIFIERS}{type_ref}\s+{declarator}(?:,\s*{declarator})*(?:=|;)|[A-Z][A-Z0-9_]*\s*(?:\(.*\))?\s*(?:[,;{{].*)?$)"
			),
		),
		(
			DeclarationKind::Method,
			format!(r"^{MODIFIERS}(?:<[^>]*>\s*)?(?:{type_ref}\s+)?[\w$]+\s*\("),
		),
	];

	table
		.into_iter()
		.map(|(kind, pattern)| {
			KindPattern {
				kind,
				regex: Regex::new(&pattern).unwrap_or_else(|e| {
					panic!("invalid classification pattern for {kind}: {e}")
				}),
			}
		})
		.collect()
});

/// Classify a single line of Java code.
///
/// Kinds are tried in the order `CLASS`, `INTERFACE`, `ENUM`,
/// `ANNOTATION_DEFINITION`, `ANNOTATION_USAGE`, `FIELD`, `METHOD` and the
/// first match wins.
/// Empty input, or a line nothing matches, is [`DeclarationKind::None`].
pub fn classify(line: &str) -> DeclarationKind {
	let line = line.trim();
	if line.is_empty() {
		return DeclarationKind::None;
	}

	for candidate in CLASSIFICATION_ORDER.iter() {
		let Some(captures) = candidate.regex.captures(line) else {
			continue;
		};

		if candidate.kind == DeclarationKind::AnnotationUsage {
			let name = captures.get(1).map_or("", |m| m.as_str());
			if JAVADOC_TAG_NAMES.contains(&name) || name == "interface" {
				continue;
			}
		}

		tracing::trace!(%line, kind = %candidate.kind, "classified declaration");
		return candidate.kind;
	}

	DeclarationKind::None
}
