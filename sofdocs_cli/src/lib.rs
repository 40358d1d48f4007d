use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use sofdocs_core::PageKind;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Maintenance commands for the SoFplus API reference pages.",
	long_about = "sofdocs keeps the SoFplus command and cvar reference consistent.\n\nIt \
	              normalizes page markdown, rebuilds the lookup map, refreshes frontmatter \
	              descriptions and checks that the index, map and pages agree.\n\nQuick start:\n  \
	              sofdocs format --diff   Preview formatting changes\n  sofdocs format --write  \
	              Apply them\n  sofdocs map --write     Regenerate map.json\n  sofdocs validate      \
	              Check index, map and page schema"
)]
pub struct SofdocsCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Normalize the markdown of command and cvar pages.
	///
	/// Keeps the `###` title, fences synopsis and example blocks, and turns
	/// parameter and value descriptions into bullet lists. Without `--write`
	/// nothing is modified and only a summary is printed.
	Format {
		/// Write changes in place.
		#[arg(long, default_value_t = false)]
		write: bool,

		/// Show a unified diff for every page that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Exit with a non-zero status when any page would change. Intended
		/// for CI.
		#[arg(long, default_value_t = false)]
		check: bool,

		/// Restrict to a single category.
		#[arg(long, value_enum)]
		only: Option<Category>,

		/// Watch the pages and re-run on every change.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Build `map.json`, the name to page lookup table.
	///
	/// Prints the map to stdout unless `--write` is given.
	Map {
		/// Write the map file instead of printing it.
		#[arg(long, default_value_t = false)]
		write: bool,
	},
	/// Refresh the frontmatter `description:` of every rule page from the
	/// first sentence of its body.
	Describe {
		/// Report the pages that would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Replace `name : description` delimiters in frontmatter descriptions
	/// with `name - description`.
	FixDescriptions,
	/// Split the HTML reference into one rule page per command or cvar.
	Split,
	/// Convert legacy `.md` pages into `.mdc` rule pages.
	Migrate {
		/// Delete the legacy pages after converting them.
		#[arg(long = "move", default_value_t = false)]
		move_files: bool,
	},
	/// Check that the index, the map and the pages agree and that every page
	/// follows the page schema.
	Validate {
		/// Output format for validation results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check the `*.func` scripting examples.
	ValidateExamples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
	/// Command pages only.
	Commands,
	/// Cvar pages only.
	Cvars,
}

impl From<Category> for PageKind {
	fn from(value: Category) -> Self {
		match value {
			Category::Commands => PageKind::Command,
			Category::Cvars => PageKind::Cvar,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
