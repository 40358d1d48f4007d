mod common;

use common::RULES;
use common::write_file;
use sofdocs_core::AnyEmptyResult;

const TIMER_PAGE: &str = "---\ndescription: old\nalwaysApply: false\n---\n\n### \
                          sp_sc_timer\nsp_sc_timer\n\nRuns a command later.\n";

#[test]
fn describe_refreshes_frontmatter() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_timer.mdc"), TIMER_PAGE)?;

	common::sofdocs_cmd()
		.arg("describe")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated commands/sp_sc_timer.mdc"))
		.stdout(predicates::str::contains("Total updated: 1"));

	let on_disk = std::fs::read_to_string(tmp.path().join(RULES).join("commands/sp_sc_timer.mdc"))?;
	assert!(on_disk.starts_with("---\ndescription: sp_sc_timer - Runs a command later.\n"));

	Ok(())
}

#[test]
fn describe_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_timer.mdc"), TIMER_PAGE)?;

	common::sofdocs_cmd()
		.arg("describe")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Would update commands/sp_sc_timer.mdc"))
		.stdout(predicates::str::contains("Total would update: 1"));

	let on_disk = std::fs::read_to_string(tmp.path().join(RULES).join("commands/sp_sc_timer.mdc"))?;
	assert_eq!(on_disk, TIMER_PAGE);

	Ok(())
}

#[test]
fn fix_descriptions_rewrites_colon_delimiters() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(
		tmp.path(),
		&format!("{RULES}/cvars/_sp_sv_info_map.mdc"),
		"---\ndescription: _sp_sv_info_map : Current map\nalwaysApply: false\n---\n\n### \
		 _sp_sv_info_map\n",
	)?;

	common::sofdocs_cmd()
		.arg("fix-descriptions")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(format!(
			"fixed: {RULES}/cvars/_sp_sv_info_map.mdc"
		)))
		.stdout(predicates::str::contains("total changed: 1"));

	let on_disk =
		std::fs::read_to_string(tmp.path().join(RULES).join("cvars/_sp_sv_info_map.mdc"))?;
	assert!(on_disk.starts_with("---\ndescription: _sp_sv_info_map - Current map\n"));

	Ok(())
}

#[test]
fn fix_descriptions_requires_rules_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::sofdocs_cmd()
		.arg("fix-descriptions")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("sofdocs::missing_rules_dir"));

	Ok(())
}
