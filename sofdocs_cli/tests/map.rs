mod common;

use common::CLEAN_PAGE;
use common::RULES;
use common::write_file;
use serde_json::Value;
use sofdocs_core::AnyEmptyResult;

#[test]
fn map_prints_json_to_stdout() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;

	let output = common::sofdocs_cmd()
		.arg("map")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let map: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(map["sp_sc_alias"]["path"], "commands/sp_sc_alias.mdc");
	assert_eq!(map["sp_sc_alias"]["summary"], "Creates an alias.");
	assert!(!tmp.path().join(RULES).join("map.json").exists());

	Ok(())
}

#[test]
fn map_write_creates_map_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;
	write_file(
		tmp.path(),
		&format!("{RULES}/commands/dot_players.mdc"),
		"### dot_players\nLists players.\n",
	)?;
	write_file(
		tmp.path(),
		&format!("{RULES}/commands_index.md"),
		"- `sp_sc_extra` — command — extra — `commands/sp_sc_extra.md`\n",
	)?;

	common::sofdocs_cmd()
		.arg("map")
		.arg("--write")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(format!(
			"Wrote {RULES}/map.json (4 entries)"
		)));

	let text = std::fs::read_to_string(tmp.path().join(RULES).join("map.json"))?;
	let map: Value = serde_json::from_str(&text)?;
	assert_eq!(map[".players"]["path"], "commands/dot_players.mdc");
	assert_eq!(map["sp_sc_extra"]["path"], "commands/sp_sc_extra.md");
	assert_eq!(map["sp_sc_extra"]["summary"], "");
	assert!(text.ends_with("}\n"));

	Ok(())
}
