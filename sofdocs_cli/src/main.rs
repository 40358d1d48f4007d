use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use sofdocs_cli::Category;
use sofdocs_cli::Commands;
use sofdocs_cli::OutputFormat;
use sofdocs_cli::SofdocsCli;
use sofdocs_core::DocsLayout;
use sofdocs_core::PageKind;
use sofdocs_core::SofdocsError;
use sofdocs_core::describe::fix_descriptions;
use sofdocs_core::describe::update_descriptions;
use sofdocs_core::map::build_map;
use sofdocs_core::map::render_map;
use sofdocs_core::map::write_map;
use sofdocs_core::migrate::MigrateMode;
use sofdocs_core::migrate::migrate_legacy;
use sofdocs_core::normalize::format_page;
use sofdocs_core::split::split_reference;
use sofdocs_core::validate::validate_docs;
use sofdocs_core::validate::validate_examples;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,cyan) => {
		if color_enabled() {
			format!("{}", $text.cyan())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SofdocsCli::parse();

	// Respect NO_COLOR, --no-color and non-terminal output.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Format {
			write,
			diff,
			check,
			only,
			watch,
		}) => {
			run_format(
				&args,
				&FormatOptions {
					write,
					diff,
					check,
					only,
				},
				watch,
			)
		}
		Some(Commands::Map { write }) => run_map(&args, write),
		Some(Commands::Describe { dry_run }) => run_describe(&args, dry_run),
		Some(Commands::FixDescriptions) => run_fix_descriptions(&args),
		Some(Commands::Split) => run_split(&args),
		Some(Commands::Migrate { move_files }) => run_migrate(&args, move_files),
		Some(Commands::Validate { format }) => run_validate(&args, format),
		Some(Commands::ValidateExamples) => run_validate_examples(&args),
		None => {
			eprintln!("No subcommand specified. Run `sofdocs --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render core errors through miette for error codes and help text.
		match e.downcast::<SofdocsError>() {
			Ok(sofdocs_err) => {
				let report: miette::Report = (*sofdocs_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins; otherwise `--verbose` selects `debug`
/// and the default is `warn`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &SofdocsCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_layout(args: &SofdocsCli) -> Result<DocsLayout, Box<dyn std::error::Error>> {
	let layout = DocsLayout::discover(&resolve_root(args))?;
	tracing::debug!(
		root = %layout.root.display(),
		rules = layout.uses_rules_dir(),
		"resolved docs layout"
	);
	if args.verbose {
		println!("Rules directory: {}", layout.rules_dir.display());
		if !layout.uses_rules_dir() {
			println!("Using legacy docs: {}", layout.legacy_dir.display());
		}
	}
	Ok(layout)
}

struct FormatOptions {
	write: bool,
	diff: bool,
	check: bool,
	only: Option<Category>,
}

struct FormatOutcome {
	changed: usize,
	errors: usize,
}

fn run_format(
	args: &SofdocsCli,
	options: &FormatOptions,
	watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let outcome = run_format_once(args, options)?;

	if !watch {
		if outcome.errors > 0 || (options.check && outcome.changed > 0) {
			process::exit(1);
		}
		return Ok(());
	}

	// Watch mode
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let layout = resolve_layout(args)?;
	let watch_root = if layout.uses_rules_dir() {
		layout.rules_dir
	} else {
		layout.legacy_dir
	};
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&watch_root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, formatting...");
		if let Err(e) = run_format_once(args, options) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_format_once(
	args: &SofdocsCli,
	options: &FormatOptions,
) -> Result<FormatOutcome, Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let pages = layout.pages(options.only.map(PageKind::from))?;
	let mut outcome = FormatOutcome {
		changed: 0,
		errors: 0,
	};

	for page in &pages {
		let rel = make_relative(&page.path, &layout.root);
		let formatted = match format_page(page) {
			Ok(formatted) => formatted,
			Err(e) => {
				outcome.errors += 1;
				eprintln!("{} processing {rel}: {e}", colored!("error:", red));
				continue;
			}
		};

		if !formatted.is_changed() {
			continue;
		}
		outcome.changed += 1;

		if options.diff && !options.write {
			print_diff(&formatted.diff());
		}

		if options.write {
			if let Err(e) = formatted.write() {
				outcome.errors += 1;
				eprintln!("{} processing {rel}: {e}", colored!("error:", red));
				continue;
			}
			println!("Updated: {rel}");
		}
	}

	if !options.write && !options.diff {
		println!(
			"Scanned {} files; {} would change. Use --diff to preview, --write to apply.",
			pages.len(),
			outcome.changed
		);
	}

	Ok(outcome)
}

fn run_map(args: &SofdocsCli, write: bool) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let map = build_map(&layout)?;

	if write {
		write_map(&layout, &map)?;
		println!(
			"Wrote {} ({} entries)",
			make_relative(&layout.map_file, &layout.root),
			map.len()
		);
	} else {
		print!("{}", render_map(&map)?);
	}

	Ok(())
}

fn run_describe(args: &SofdocsCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let updated = update_descriptions(&layout, dry_run)?;
	let verb = if dry_run { "Would update" } else { "Updated" };

	for page in &updated {
		println!("{verb} {}", page.relative());
	}
	println!("Total {}: {}", verb.to_lowercase(), updated.len());

	Ok(())
}

fn run_fix_descriptions(args: &SofdocsCli) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	if !layout.uses_rules_dir() {
		return Err(SofdocsError::MissingRulesDir(layout.rules_dir.display().to_string()).into());
	}

	let fixed = fix_descriptions(&layout)?;
	for page in &fixed {
		println!("fixed: {}", make_relative(&page.path, &layout.root));
	}
	println!("total changed: {}", fixed.len());

	Ok(())
}

fn run_split(args: &SofdocsCli) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let written = split_reference(&layout)?;

	println!(
		"Wrote {} files into {} and {}",
		written.len(),
		make_relative(&layout.rules_dir.join(PageKind::Command.dir_name()), &layout.root),
		make_relative(&layout.rules_dir.join(PageKind::Cvar.dir_name()), &layout.root)
	);

	Ok(())
}

fn run_migrate(args: &SofdocsCli, move_files: bool) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let mode = if move_files {
		MigrateMode::Move
	} else {
		MigrateMode::Copy
	};
	let written = migrate_legacy(&layout, mode)?;

	println!(
		"Migrated {} files to {}",
		written.len(),
		make_relative(&layout.rules_dir, &layout.root)
	);

	Ok(())
}

fn run_validate(args: &SofdocsCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let report = validate_docs(&layout)?;

	match format {
		OutputFormat::Json => {
			let problems: Vec<String> = report.problems.iter().map(ToString::to_string).collect();
			let output = serde_json::json!({
				"ok": report.is_ok(),
				"pages": report.pages,
				"problems": problems,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if report.is_ok() {
				println!("Docs validation passed.");
			} else {
				for problem in &report.problems {
					eprintln!("{problem}");
				}
				eprintln!();
				eprintln!(
					"{} {} problem(s) in {} page(s).",
					colored!("error:", red),
					report.problems.len(),
					report.pages
				);
			}
		}
	}

	if !report.is_ok() {
		process::exit(1);
	}

	Ok(())
}

fn run_validate_examples(args: &SofdocsCli) -> Result<(), Box<dyn std::error::Error>> {
	let layout = resolve_layout(args)?;
	let report = validate_examples(&layout)?;

	if !report.found_dir {
		println!("No examples/ directory found. Skipping.");
		return Ok(());
	}

	for warning in report.warnings() {
		println!("{}", colored!(warning.to_string(), yellow));
	}

	if !report.is_ok() {
		for error in report.errors() {
			eprintln!("{error}");
		}
		process::exit(1);
	}

	println!("Examples validation passed.");
	Ok(())
}

/// Print a unified diff, colorized by line.
fn print_diff(diff: &str) {
	for line in diff.lines() {
		if line.starts_with("+++") || line.starts_with("---") {
			println!("{line}");
		} else if line.starts_with("@@") {
			println!("{}", colored!(line, cyan));
		} else if line.starts_with('+') {
			println!("{}", colored!(line, green));
		} else if line.starts_with('-') {
			println!("{}", colored!(line, red));
		} else {
			println!("{line}");
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
