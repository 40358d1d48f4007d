use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SofdocsError {
	#[error(transparent)]
	#[diagnostic(code(sofdocs::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(sofdocs::read_file))]
	ReadFile { path: String, reason: String },

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(code(sofdocs::write_file))]
	WriteFile { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(sofdocs::config_parse),
		help("check that sofdocs.toml is valid TOML with an optional [paths] section")
	)]
	ConfigParse(String),

	#[error("failed to serialize map: {0}")]
	#[diagnostic(code(sofdocs::map_serialize))]
	MapSerialize(String),

	#[error("failed to parse map file `{path}`: {reason}")]
	#[diagnostic(
		code(sofdocs::map_parse),
		help("regenerate the map with `sofdocs map --write`")
	)]
	MapParse { path: String, reason: String },

	#[error("source file not found: `{0}`")]
	#[diagnostic(
		code(sofdocs::missing_source),
		help("place AGENTS.html at the project root or set `paths.source_html` in sofdocs.toml")
	)]
	MissingSource(String),

	#[error("legacy docs directory not found: `{0}`")]
	#[diagnostic(
		code(sofdocs::missing_legacy_docs),
		help("nothing to migrate; set `paths.legacy_docs` in sofdocs.toml if the docs live elsewhere")
	)]
	MissingLegacyDocs(String),

	#[error("rules directory not found: `{0}`")]
	#[diagnostic(code(sofdocs::missing_rules_dir))]
	MissingRulesDir(String),
}

pub type SofdocsResult<T> = Result<T, SofdocsError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
