#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use sofdocs_core::AnyEmptyResult;

pub const RULES: &str = ".cursor/rules/sofplus-api";

pub const CLEAN_PAGE: &str = "---\ndescription: sp_sc_alias - Creates an alias.\nalwaysApply: \
                              false\n---\n\n### sp_sc_alias\nCreates an \
                              alias.\n\nSynopsis:\n\n```txt\nsp_sc_alias NAME\n```\n";

pub const MESSY_PAGE: &str =
	"---\ndescription: sp_sc_echo - Prints text.\nalwaysApply: false\n---\n### sp_sc_echo\nsp_sc_echo\n\n\n\nPrints text.\n\nSynopsis:\n\n```txt\nsp_sc_echo TEXT\n```\n";

pub fn sofdocs_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("sofdocs"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write_file(root: &Path, rel: &str, content: &str) -> AnyEmptyResult {
	let path = root.join(rel);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)?;
	Ok(())
}
