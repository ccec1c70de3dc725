#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const CONFIG: &str = "tags:\n  - tag: author\n    tagValue: KMG\n    insertPosition: beginning\n    \
                          overwrite: never\n    allowedLocations: [class]\n  - tag: since\n    \
                          tagValue: \"2.0\"\n    insertPosition: end\n    overwrite: ifLower\n    \
                          allowedLocations: [class, method]\n";

pub const STALE_SOURCE: &str = "/**\n * A greeter.\n */\npublic class Greeter {\n    /**\n     * Says \
                                hi.\n     * @since 1.0\n     */\n    public void hi() {}\n}\n";

pub const UPDATED_SOURCE: &str = "/**\n * A greeter.\n * @author KMG\n * @since 2.0\n */\npublic class \
                                  Greeter {\n    /**\n     * Says hi.\n     * @since 2.0\n     */\n    \
                                  public void hi() {}\n}\n";

pub fn jdts_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("jdts"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write_project(root: &Path, source: &str) -> std::io::Result<()> {
	std::fs::write(root.join("jdts.yml"), CONFIG)?;
	std::fs::create_dir_all(root.join("src"))?;
	std::fs::write(root.join("src/Greeter.java"), source)
}
