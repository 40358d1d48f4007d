mod common;

use common::CLEAN_PAGE;
use common::MESSY_PAGE;
use common::RULES;
use common::write_file;
use predicates::prelude::PredicateBooleanExt;
use sofdocs_core::AnyEmptyResult;

#[test]
fn format_reports_without_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_echo.mdc"), MESSY_PAGE)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Scanned 2 files; 1 would change. Use --diff to preview, --write to apply.",
		));

	let on_disk = std::fs::read_to_string(tmp.path().join(RULES).join("commands/sp_sc_echo.mdc"))?;
	assert_eq!(on_disk, MESSY_PAGE);

	Ok(())
}

#[test]
fn format_write_updates_changed_pages() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_echo.mdc"), MESSY_PAGE)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--write")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(format!(
			"Updated: {RULES}/commands/sp_sc_echo.mdc"
		)))
		.stdout(predicates::str::contains("sp_sc_alias").not());

	let on_disk = std::fs::read_to_string(tmp.path().join(RULES).join("commands/sp_sc_echo.mdc"))?;
	assert_eq!(
		on_disk,
		"---\ndescription: sp_sc_echo - Prints text.\nalwaysApply: false\n---\n\n### \
		 sp_sc_echo\nPrints text.\n\nSynopsis:\n\n```txt\nsp_sc_echo TEXT\n```\n"
	);

	// A second run finds nothing to do.
	common::sofdocs_cmd()
		.arg("format")
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("0 would change"));

	Ok(())
}

#[test]
fn format_check_fails_when_pages_would_change() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_echo.mdc"), MESSY_PAGE)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("1 would change"));

	Ok(())
}

#[test]
fn format_diff_previews_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_echo.mdc"), MESSY_PAGE)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("@@"))
		.stdout(predicates::str::contains("-sp_sc_echo"))
		.stdout(predicates::str::contains("Scanned").not());

	Ok(())
}

#[test]
fn format_only_restricts_category() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_echo.mdc"), MESSY_PAGE)?;
	write_file(
		tmp.path(),
		&format!("{RULES}/cvars/_sp_cl_info_state.mdc"),
		"### _sp_cl_info_state\n\n\nState.\n",
	)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--only")
		.arg("cvars")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Scanned 1 files; 1 would change."));

	Ok(())
}

#[test]
fn format_reads_legacy_docs_before_migration() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(
		tmp.path(),
		"docs/sofplus-api/commands/sp_sc_echo.md",
		"### sp_sc_echo\nsp_sc_echo\n\nPrints text.\n",
	)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--write")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Updated: docs/sofplus-api/commands/sp_sc_echo.md",
		));

	let on_disk =
		std::fs::read_to_string(tmp.path().join("docs/sofplus-api/commands/sp_sc_echo.md"))?;
	assert_eq!(on_disk, "### sp_sc_echo\nPrints text.\n");

	Ok(())
}

#[test]
fn format_counts_unreadable_pages_as_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), &format!("{RULES}/commands/sp_sc_alias.mdc"), CLEAN_PAGE)?;
	std::fs::write(
		tmp.path().join(RULES).join("commands/sp_sc_broken.mdc"),
		[0xff, 0xfe, b'\n'],
	)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(format!(
			"error: processing {RULES}/commands/sp_sc_broken.mdc"
		)))
		.stdout(predicates::str::contains("Scanned 2 files; 0 would change."));

	Ok(())
}

#[test]
fn format_check_leaves_fenced_blocks_intact() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let page = "### sp_x\nExample:\n`sp_x 1\n\nNote:\n```\nsp_x 2\n```\n";
	write_file(tmp.path(), &format!("{RULES}/commands/sp_x.mdc"), page)?;

	common::sofdocs_cmd()
		.arg("format")
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Scanned 1 files; 0 would change."));

	Ok(())
}
