use uuid::Uuid;

use crate::BlockChanges;
use crate::DeclarationKind;
use crate::JavadocTags;
use crate::RawJavadocBlock;
use crate::TagPolicy;
use crate::apply_policies;
use crate::classify;
use crate::split_blocks;

/// One Javadoc block of a file, with everything the engine needs to
/// rewrite it.
#[derive(Debug, Clone)]
pub struct JdtsBlock {
	id: Uuid,
	raw: RawJavadocBlock,
	kind: DeclarationKind,
	tags: JavadocTags,
	rewritten: Option<String>,
	changes: BlockChanges,
}

impl JdtsBlock {
	pub fn new(raw: RawJavadocBlock) -> Self {
		let kind = if raw.terminated {
			classify(&raw.declaration)
		} else {
			DeclarationKind::None
		};
		let tags = JavadocTags::parse(raw.body());

		Self {
			id: Uuid::new_v4(),
			raw,
			kind,
			tags,
			rewritten: None,
			changes: BlockChanges::default(),
		}
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn raw(&self) -> &RawJavadocBlock {
		&self.raw
	}

	pub fn kind(&self) -> DeclarationKind {
		self.kind
	}

	pub fn tags(&self) -> &JavadocTags {
		&self.tags
	}

	pub fn changes(&self) -> BlockChanges {
		self.changes
	}

	/// The token standing in for this block between substitution phases.
	/// It cannot occur in Java source text.
	pub fn placeholder(&self) -> String {
		format!("\u{0}jdts-block-{}\u{0}", self.id.simple())
	}

	/// The rewritten comment, or the original text if the block has not been
	/// processed.
	pub fn output(&self) -> &str {
		self.rewritten.as_deref().unwrap_or(&self.raw.source_text)
	}

	fn apply(&mut self, policies: &[TagPolicy]) {
		let rewrite = apply_policies(&self.raw, self.kind, &self.tags, policies);
		self.changes = rewrite.changes;
		self.rewritten = Some(rewrite.text);
	}
}

/// A Java source file split into Javadoc blocks.
///
/// Rewriting happens in three steps so that byte-identical comments in one
/// file are each edited exactly once:
///
/// 1. [`JdtsCode::parse`] swaps the first remaining occurrence of each
///    block's text for that block's unique placeholder.
/// 2. [`JdtsCode::apply_policies`] rewrites every block independently.
/// 3. [`JdtsCode::render`] swaps each placeholder for its block's output.
#[derive(Debug, Clone)]
pub struct JdtsCode {
	template: String,
	blocks: Vec<JdtsBlock>,
}

impl JdtsCode {
	pub fn parse(content: &str) -> Self {
		let blocks: Vec<JdtsBlock> = split_blocks(content)
			.into_iter()
			.map(JdtsBlock::new)
			.collect();

		let mut template = content.to_string();
		for block in &blocks {
			let source = &block.raw.source_text;
			if let Some(start) = template.find(source.as_str()) {
				template.replace_range(start..start + source.len(), &block.placeholder());
			}
		}

		Self { template, blocks }
	}

	pub fn apply_policies(&mut self, policies: &[TagPolicy]) {
		for block in &mut self.blocks {
			block.apply(policies);
		}
	}

	pub fn render(&self) -> String {
		let mut output = self.template.clone();
		for block in &self.blocks {
			let placeholder = block.placeholder();
			if let Some(start) = output.find(&placeholder) {
				output.replace_range(start..start + placeholder.len(), block.output());
			}
		}
		output
	}

	pub fn blocks(&self) -> &[JdtsBlock] {
		&self.blocks
	}

	/// Sum of the edits made to every block.
	pub fn changes(&self) -> BlockChanges {
		let mut total = BlockChanges::default();
		for block in &self.blocks {
			total += block.changes();
		}
		total
	}
}

/// Parse, rewrite and render `content` in one go.
pub fn rewrite_source(content: &str, policies: &[TagPolicy]) -> String {
	let mut code = JdtsCode::parse(content);
	code.apply_policies(policies);
	code.render()
}
