use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::SofdocsError;
use crate::SofdocsResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["sofdocs.toml", ".sofdocs.toml", ".config/sofdocs.toml"];

/// Default location of the migrated `.mdc` rule pages.
pub const DEFAULT_RULES_DIR: &str = ".cursor/rules/sofplus-api";
/// Default location of the legacy `.md` pages.
pub const DEFAULT_LEGACY_DOCS_DIR: &str = "docs/sofplus-api";
/// Default file name of the index inside the rules directory.
pub const DEFAULT_INDEX_FILE: &str = "commands_index.md";
/// Default file name of the generated map inside the rules directory.
pub const DEFAULT_MAP_FILE: &str = "map.json";
/// Default HTML reference split by `sofdocs split`.
pub const DEFAULT_SOURCE_HTML: &str = "AGENTS.html";
/// Default directory holding `*.func` scripting examples.
pub const DEFAULT_EXAMPLES_DIR: &str = "examples";

/// Configuration loaded from a `sofdocs.toml` file.
///
/// Every entry is optional and relative to the project root, except `index`
/// and `map` which are relative to the rules directory.
///
/// ```toml
/// [paths]
/// rules = ".cursor/rules/sofplus-api"
/// legacy_docs = "docs/sofplus-api"
/// index = "commands_index.md"
/// map = "map.json"
/// source_html = "AGENTS.html"
/// examples = "examples"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SofdocsConfig {
	#[serde(default)]
	pub paths: PathsConfig,
}

/// Path overrides for the documentation tree.
#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
	#[serde(default)]
	pub rules: Option<PathBuf>,
	#[serde(default)]
	pub legacy_docs: Option<PathBuf>,
	#[serde(default)]
	pub index: Option<PathBuf>,
	#[serde(default)]
	pub map: Option<PathBuf>,
	#[serde(default)]
	pub source_html: Option<PathBuf>,
	#[serde(default)]
	pub examples: Option<PathBuf>,
}

impl SofdocsConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SofdocsResult<Option<SofdocsConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config: SofdocsConfig =
			toml::from_str(&content).map_err(|e| SofdocsError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}
}
