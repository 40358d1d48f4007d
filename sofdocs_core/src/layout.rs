use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::SofdocsConfig;
use crate::SofdocsError;
use crate::SofdocsResult;
use crate::config::DEFAULT_EXAMPLES_DIR;
use crate::config::DEFAULT_INDEX_FILE;
use crate::config::DEFAULT_LEGACY_DOCS_DIR;
use crate::config::DEFAULT_MAP_FILE;
use crate::config::DEFAULT_RULES_DIR;
use crate::config::DEFAULT_SOURCE_HTML;

/// File extension of migrated rule pages.
pub const RULE_EXTENSION: &str = "mdc";
/// File extension of legacy markdown pages.
pub const LEGACY_EXTENSION: &str = "md";

/// The two families of documented API items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
	Command,
	Cvar,
}

impl PageKind {
	pub const ALL: [PageKind; 2] = [PageKind::Command, PageKind::Cvar];

	/// Name of the directory holding pages of this kind.
	pub fn dir_name(self) -> &'static str {
		match self {
			Self::Command => "commands",
			Self::Cvar => "cvars",
		}
	}

	/// Classify an API identifier. Cvars start with `_` or carry an `_sp_`
	/// segment; everything else is a command.
	pub fn classify(id: &str) -> Self {
		if id.starts_with('_') || id.contains("_sp_") {
			Self::Cvar
		} else {
			Self::Command
		}
	}
}

impl fmt::Display for PageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Command => f.write_str("command"),
			Self::Cvar => f.write_str("cvar"),
		}
	}
}

/// A single documentation page on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
	pub kind: PageKind,
	pub path: PathBuf,
}

impl Page {
	/// The documented name, taken from the file stem.
	pub fn name(&self) -> String {
		self.path
			.file_stem()
			.map(|stem| stem.to_string_lossy().into_owned())
			.unwrap_or_default()
	}

	pub fn file_name(&self) -> String {
		self.path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default()
	}

	/// Path relative to the docs root, e.g. `commands/sp_sc_alias.mdc`.
	pub fn relative(&self) -> String {
		format!("{}/{}", self.kind.dir_name(), self.file_name())
	}

	/// Whether this is an `.mdc` rule page carrying frontmatter.
	pub fn is_rule(&self) -> bool {
		has_extension(&self.path, RULE_EXTENSION)
	}
}

/// Resolved locations of every file and directory the utilities touch.
#[derive(Debug, Clone)]
pub struct DocsLayout {
	pub root: PathBuf,
	pub rules_dir: PathBuf,
	pub legacy_dir: PathBuf,
	pub index_file: PathBuf,
	pub map_file: PathBuf,
	pub source_html: PathBuf,
	pub examples_dir: PathBuf,
}

impl DocsLayout {
	/// Layout with every path at its default location.
	pub fn new(root: &Path) -> Self {
		Self::from_config(root, None)
	}

	pub fn from_config(root: &Path, config: Option<&SofdocsConfig>) -> Self {
		let paths = config.map(|config| &config.paths);
		let pick = |value: Option<&PathBuf>, default: &str| {
			value.cloned().unwrap_or_else(|| PathBuf::from(default))
		};

		let rules_dir = root.join(pick(
			paths.and_then(|p| p.rules.as_ref()),
			DEFAULT_RULES_DIR,
		));
		let index_file = rules_dir.join(pick(
			paths.and_then(|p| p.index.as_ref()),
			DEFAULT_INDEX_FILE,
		));
		let map_file = rules_dir.join(pick(paths.and_then(|p| p.map.as_ref()), DEFAULT_MAP_FILE));

		Self {
			root: root.to_path_buf(),
			legacy_dir: root.join(pick(
				paths.and_then(|p| p.legacy_docs.as_ref()),
				DEFAULT_LEGACY_DOCS_DIR,
			)),
			source_html: root.join(pick(
				paths.and_then(|p| p.source_html.as_ref()),
				DEFAULT_SOURCE_HTML,
			)),
			examples_dir: root.join(pick(
				paths.and_then(|p| p.examples.as_ref()),
				DEFAULT_EXAMPLES_DIR,
			)),
			rules_dir,
			index_file,
			map_file,
		}
	}

	/// Load `sofdocs.toml` (if any) and resolve the layout for `root`.
	pub fn discover(root: &Path) -> SofdocsResult<Self> {
		let config = SofdocsConfig::load(root)?;
		Ok(Self::from_config(root, config.as_ref()))
	}

	/// The rules directory wins once it exists; until then the legacy docs
	/// are the page source.
	pub fn uses_rules_dir(&self) -> bool {
		self.rules_dir.is_dir()
	}

	/// Collect pages of the requested kinds, commands first, each sorted by
	/// file name.
	pub fn pages(&self, only: Option<PageKind>) -> SofdocsResult<Vec<Page>> {
		let (base, extension) = if self.uses_rules_dir() {
			(&self.rules_dir, RULE_EXTENSION)
		} else {
			(&self.legacy_dir, LEGACY_EXTENSION)
		};

		let mut pages = Vec::new();
		for kind in PageKind::ALL {
			if only.is_some_and(|only| only != kind) {
				continue;
			}

			for path in files_with_extension(&base.join(kind.dir_name()), extension)? {
				pages.push(Page { kind, path });
			}
		}

		tracing::debug!(count = pages.len(), base = %base.display(), "collected pages");
		Ok(pages)
	}

	/// Resolve a page reference from the index or map. Both docs locations
	/// are accepted, as is a `.md`/`.mdc` extension mismatch.
	pub fn resolve_reference(&self, rel: &str) -> Option<PathBuf> {
		let rel_path = Path::new(rel);
		let mut candidates = vec![self.legacy_dir.join(rel_path), self.rules_dir.join(rel_path)];

		if has_extension(rel_path, LEGACY_EXTENSION) {
			candidates.push(
				self.rules_dir
					.join(rel_path.with_extension(RULE_EXTENSION)),
			);
		} else if has_extension(rel_path, RULE_EXTENSION) {
			candidates.push(
				self.legacy_dir
					.join(rel_path.with_extension(LEGACY_EXTENSION)),
			);
		}

		candidates.into_iter().find(|path| path.is_file())
	}
}

/// Sorted list of the files directly inside `dir` with the given extension.
/// A missing directory yields an empty list.
pub fn files_with_extension(dir: &Path, extension: &str) -> SofdocsResult<Vec<PathBuf>> {
	if !dir.is_dir() {
		return Ok(Vec::new());
	}

	let mut files = Vec::new();
	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && has_extension(&path, extension) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
	path.extension().is_some_and(|ext| ext == extension)
}

/// Read a UTF-8 text file, attaching the path to any failure.
pub fn read_text(path: &Path) -> SofdocsResult<String> {
	std::fs::read_to_string(path).map_err(|e| {
		SofdocsError::ReadFile {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}

/// Write a UTF-8 text file, attaching the path to any failure.
pub fn write_text(path: &Path, content: &str) -> SofdocsResult<()> {
	std::fs::write(path, content).map_err(|e| {
		SofdocsError::WriteFile {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}
