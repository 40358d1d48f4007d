use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::DocsLayout;
use crate::Document;
use crate::SofdocsResult;
use crate::index::parse_index;
use crate::layout::files_with_extension;
use crate::layout::read_text;
use crate::map::read_map_paths;

/// Extension of scripting example files.
pub const EXAMPLE_EXTENSION: &str = "func";

/// An integrity problem in the documentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Problem {
	MissingIndexTarget { name: String, path: String },
	MissingMapTarget { name: String, path: String },
	InvalidMap { reason: String },
	UnreferencedPage { path: String },
	Schema { path: PathBuf, issue: SchemaIssue },
}

impl fmt::Display for Problem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingIndexTarget { name, path } => {
				write!(f, "Index points to missing file: {name} -> {path}")
			}
			Self::MissingMapTarget { name, path } => {
				write!(f, "Map points to missing file: {name} -> {path}")
			}
			Self::InvalidMap { reason } => write!(f, "Map is not valid JSON: {reason}"),
			Self::UnreferencedPage { path } => {
				write!(f, "Unreferenced page (not in index or map): {path}")
			}
			Self::Schema { path, issue } => write!(f, "Schema issue in {}: {issue}", path.display()),
		}
	}
}

/// A page that does not follow the page schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
	MissingTitle,
	MissingSynopsis,
	TitleMismatch { title: String, stem: String },
	InvalidFrontmatter(String),
}

impl fmt::Display for SchemaIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingTitle => f.write_str("missing title (### <name>)"),
			Self::MissingSynopsis => f.write_str("missing Synopsis:"),
			Self::TitleMismatch { title, stem } => {
				write!(f, "title/name mismatch: title='{title}' file='{stem}'")
			}
			Self::InvalidFrontmatter(reason) => write!(f, "invalid frontmatter: {reason}"),
		}
	}
}

#[derive(Debug, Default)]
pub struct ValidationReport {
	pub problems: Vec<Problem>,
	/// Number of pages inspected.
	pub pages: usize,
}

impl ValidationReport {
	pub fn is_ok(&self) -> bool {
		self.problems.is_empty()
	}
}

/// Check the index, the map and every page:
///
/// 1. index and map references resolve to existing files,
/// 2. every page is referenced by the index or the map,
/// 3. every page has a title matching its file name and a `Synopsis:` label,
/// 4. rule page frontmatter is valid YAML.
pub fn validate_docs(layout: &DocsLayout) -> SofdocsResult<ValidationReport> {
	let mut report = ValidationReport::default();
	let index = parse_index(&layout.index_file)?;
	let map = match read_map_paths(&layout.map_file) {
		Ok(map) => map,
		Err(e) => {
			report.problems.push(Problem::InvalidMap {
				reason: e.to_string(),
			});
			Default::default()
		}
	};

	for entry in &index {
		if layout.resolve_reference(&entry.path).is_none() {
			report.problems.push(Problem::MissingIndexTarget {
				name: entry.name.clone(),
				path: entry.path.clone(),
			});
		}
	}

	for (name, path) in &map {
		if !path.is_empty() && layout.resolve_reference(path).is_none() {
			report.problems.push(Problem::MissingMapTarget {
				name: name.clone(),
				path: path.clone(),
			});
		}
	}

	let known: BTreeSet<String> = index
		.iter()
		.map(|entry| entry.path.as_str())
		.chain(map.values().map(String::as_str))
		.map(reference_key)
		.collect();

	let pages = layout.pages(None)?;
	report.pages = pages.len();

	for page in &pages {
		let rel = page.relative();
		if !known.contains(&reference_key(&rel)) {
			report.problems.push(Problem::UnreferencedPage { path: rel });
		}
	}

	for page in &pages {
		let text = read_text(&page.path)?;
		for issue in validate_page_schema(&page.name(), &text) {
			report.problems.push(Problem::Schema {
				path: page.path.clone(),
				issue,
			});
		}
	}

	tracing::info!(
		pages = report.pages,
		problems = report.problems.len(),
		"validated docs"
	);
	Ok(report)
}

/// Schema issues of a single page named `stem`.
pub fn validate_page_schema(stem: &str, text: &str) -> Vec<SchemaIssue> {
	let mut issues = Vec::new();
	let document = Document::parse(text);

	if let Err(e) = document.metadata() {
		issues.push(SchemaIssue::InvalidFrontmatter(e.to_string()));
	}

	let lines: Vec<&str> = document.content().lines().collect();
	let title = lines
		.iter()
		.take(3)
		.find(|line| line.starts_with("### "))
		.map(|line| line[4..].trim());
	let has_synopsis = lines
		.iter()
		.any(|line| line.trim().eq_ignore_ascii_case("synopsis:"));

	match title {
		None => issues.push(SchemaIssue::MissingTitle),
		Some(title) if title != stem => {
			issues.push(SchemaIssue::TitleMismatch {
				title: title.to_string(),
				stem: stem.to_string(),
			});
		}
		Some(_) => {}
	}

	if !has_synopsis {
		issues.push(SchemaIssue::MissingSynopsis);
	}

	issues
}

/// `kind/stem` key so `.md` and `.mdc` references to one page compare equal.
fn reference_key(rel: &str) -> String {
	let path = Path::new(rel);
	let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
	match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		Some(parent) => format!("{}/{stem}", parent.display()),
		None => stem.into_owned(),
	}
}

/// A finding in a scripting example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleIssue {
	/// The file has no content besides whitespace.
	Empty { path: PathBuf },
	/// A tab character; spaces are preferred.
	Tab { path: PathBuf, line: usize },
}

impl ExampleIssue {
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Empty { .. })
	}
}

impl fmt::Display for ExampleIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty { path } => write!(f, "Empty example file: {}", path.display()),
			Self::Tab { path, line } => {
				write!(f, "Tab character in {}:{line} (prefer spaces)", path.display())
			}
		}
	}
}

#[derive(Debug, Default)]
pub struct ExamplesReport {
	/// False when the examples directory does not exist.
	pub found_dir: bool,
	pub checked: usize,
	pub issues: Vec<ExampleIssue>,
}

impl ExamplesReport {
	pub fn errors(&self) -> impl Iterator<Item = &ExampleIssue> {
		self.issues.iter().filter(|issue| issue.is_error())
	}

	pub fn warnings(&self) -> impl Iterator<Item = &ExampleIssue> {
		self.issues.iter().filter(|issue| !issue.is_error())
	}

	pub fn is_ok(&self) -> bool {
		self.errors().next().is_none()
	}
}

/// Check every `*.func` example: it must not be empty, and tab characters
/// are reported as warnings.
pub fn validate_examples(layout: &DocsLayout) -> SofdocsResult<ExamplesReport> {
	let mut report = ExamplesReport::default();
	if !layout.examples_dir.is_dir() {
		return Ok(report);
	}
	report.found_dir = true;

	for path in files_with_extension(&layout.examples_dir, EXAMPLE_EXTENSION)? {
		let text = read_text(&path)?;
		report.checked += 1;

		if text.trim().is_empty() {
			report.issues.push(ExampleIssue::Empty { path: path.clone() });
		}

		for (idx, line) in text.lines().enumerate() {
			if line.contains('\t') {
				report.issues.push(ExampleIssue::Tab {
					path: path.clone(),
					line: idx + 1,
				});
			}
		}
	}

	Ok(report)
}
