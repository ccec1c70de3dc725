use std::path::Path;

use crate::DeclarationKind;
use crate::InsertPosition;
use crate::OverwriteRule;
use crate::TagKind;
use crate::TagPolicy;

pub fn policy(tag: TagKind, value: &str) -> TagPolicy {
	TagPolicy {
		tag,
		tag_value: value.to_string(),
		tag_description: String::new(),
		insert_position: InsertPosition::None,
		overwrite: OverwriteRule::None,
		allowed_locations: Vec::new(),
		remove_if_misplaced: false,
	}
}

/// `@author` at the top of type declarations, never overwritten.
pub fn author_policy() -> TagPolicy {
	TagPolicy {
		insert_position: InsertPosition::Beginning,
		overwrite: OverwriteRule::Never,
		allowed_locations: vec![
			DeclarationKind::Class,
			DeclarationKind::Interface,
			DeclarationKind::Enum,
			DeclarationKind::AnnotationDefinition,
		],
		..policy(TagKind::Author, "KMG")
	}
}

/// `@since` at the end of types and methods, bumped when lower.
pub fn since_policy(version: &str) -> TagPolicy {
	TagPolicy {
		insert_position: InsertPosition::End,
		overwrite: OverwriteRule::IfLower,
		allowed_locations: vec![
			DeclarationKind::Class,
			DeclarationKind::Interface,
			DeclarationKind::Enum,
			DeclarationKind::Method,
		],
		..policy(TagKind::Since, version)
	}
}

pub fn version_policy(version: &str, overwrite: OverwriteRule) -> TagPolicy {
	TagPolicy {
		overwrite,
		..policy(TagKind::Version, version)
	}
}

/// `@param` belongs on methods only and is stripped elsewhere.
pub fn param_policy() -> TagPolicy {
	TagPolicy {
		allowed_locations: vec![DeclarationKind::Method],
		remove_if_misplaced: true,
		..policy(TagKind::Param, "value")
	}
}

pub const SAMPLE_CLASS: &str = r#"package com.example;

import java.util.List;

/**
 * A greeter.
 */
public class Greeter {
    /**
     * The greeting.
     */
    private String greeting;

    /**
     * Says hello.
     *
     * @param name who to greet
     */
    @Deprecated
    public String greet(String name) {
        return greeting + name;
    }
}
"#;

pub const SAMPLE_CONFIG: &str = r#"tags:
  - tag: author
    tagValue: KMG
    insertPosition: beginning
    overwrite: never
    allowedLocations: [class, interface, enum]
  - tag: since
    tagValue: "1.0"
    insertPosition: end
    overwrite: ifLower
    allowedLocations: [class, method]
"#;

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

pub fn read_file(root: &Path, relative: &str) -> String {
	std::fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("read: {e}"))
}

pub const SAMPLE_CLASS_UPDATED: &str = r#"package com.example;

import java.util.List;

/**
 * A greeter.
 * @author KMG
 * @since 1.0
 */
public class Greeter {
    /**
     * The greeting.
     */
    private String greeting;

    /**
     * Says hello.
     *
     * @param name who to greet
     * @since 1.0
     */
    @Deprecated
    public String greet(String name) {
        return greeting + name;
    }
}
"#;
