mod common;

use common::CLEAN_PAGE;
use common::RULES;
use common::write_file;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use sofdocs_core::AnyEmptyResult;

const INDEX: &str = "- `sp_sc_alias` — command — Creates an alias. — `commands/sp_sc_alias.md`\n";

#[test]
fn validate_passes_for_consistent_tree() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;
	write_file(tmp.path(), &format!("{RULES}/commands_index.md"), INDEX)?;

	common::sofdocs_cmd()
		.arg("validate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Docs validation passed."));

	Ok(())
}

#[test]
fn validate_reports_problems() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;
	write_file(
		tmp.path(),
		&format!("{RULES}/commands/orphan.mdc"),
		"### orphan\nSynopsis:\n",
	)?;
	write_file(tmp.path(), &format!("{RULES}/commands_index.md"), INDEX)?;
	write_file(tmp.path(), &format!("{RULES}/map.json"), "{ not json")?;

	common::sofdocs_cmd()
		.arg("validate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Map is not valid JSON"))
		.stderr(predicates::str::contains(
			"Unreferenced page (not in index or map): commands/orphan.mdc",
		))
		.stderr(predicates::str::contains("2 problem(s) in 2 page(s)."));

	Ok(())
}

#[test]
fn validate_emits_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(
		tmp.path(),
		&format!("{RULES}/commands/sp_sc_alias.mdc"),
		"### sp_sc_other\n",
	)?;
	write_file(tmp.path(), &format!("{RULES}/commands_index.md"), INDEX)?;

	let output = common::sofdocs_cmd()
		.arg("validate")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], false);
	assert_eq!(json["pages"], 1);
	let problems = json["problems"].as_array().map(Vec::len);
	assert_eq!(problems, Some(2));

	Ok(())
}

#[test]
fn validate_examples_skips_missing_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::sofdocs_cmd()
		.arg("validate-examples")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"No examples/ directory found. Skipping.",
		));

	Ok(())
}

#[test]
fn validate_examples_warns_on_tabs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "examples/timer.func", "sp_sc_timer 100\n\tsp_sc_echo hi\n")?;

	common::sofdocs_cmd()
		.arg("validate-examples")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("warning:").not())
		.stdout(predicates::str::contains("Tab character in "))
		.stdout(predicates::str::contains("timer.func:2 (prefer spaces)"))
		.stdout(predicates::str::contains("Examples validation passed."));

	Ok(())
}

#[test]
fn validate_examples_fails_on_empty_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "examples/empty.func", "\n")?;

	common::sofdocs_cmd()
		.arg("validate-examples")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Empty example file:"));

	Ok(())
}
