use clap::Parser;
use sofdocs_cli::Category;
use sofdocs_cli::Commands;
use sofdocs_cli::OutputFormat;
use sofdocs_cli::SofdocsCli;
use sofdocs_core::PageKind;

#[test]
fn parses_format_flags() -> Result<(), clap::Error> {
	let cli = SofdocsCli::try_parse_from(["sofdocs", "format", "--write", "--only", "cvars"])?;

	assert!(matches!(
		cli.command,
		Some(Commands::Format {
			write: true,
			diff: false,
			check: false,
			only: Some(Category::Cvars),
			watch: false,
		})
	));
	assert_eq!(PageKind::from(Category::Cvars), PageKind::Cvar);

	Ok(())
}

#[test]
fn parses_global_flags_after_subcommand() -> Result<(), clap::Error> {
	let cli = SofdocsCli::try_parse_from(["sofdocs", "migrate", "--move", "-v", "--path", "docs"])?;

	assert!(cli.verbose);
	assert_eq!(cli.path.as_deref(), Some(std::path::Path::new("docs")));
	assert!(matches!(
		cli.command,
		Some(Commands::Migrate { move_files: true })
	));

	Ok(())
}

#[test]
fn parses_validate_output_format() -> Result<(), clap::Error> {
	let cli = SofdocsCli::try_parse_from(["sofdocs", "validate", "--format", "json"])?;

	assert!(matches!(
		cli.command,
		Some(Commands::Validate {
			format: OutputFormat::Json
		})
	));

	Ok(())
}

#[test]
fn rejects_unknown_category() {
	let result = SofdocsCli::try_parse_from(["sofdocs", "format", "--only", "aliases"]);

	assert!(result.is_err());
}
