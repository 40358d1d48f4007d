use std::path::Path;

use crate::PageKind;
use crate::SofdocsResult;
use crate::layout::read_text;

/// One entry of the commands index.
///
/// Index lines look like:
///
/// ```text
/// - `sp_sc_alias` — command — sp_sc_alias — `commands/sp_sc_alias.md`
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
	pub name: String,
	/// The declared kind, when the line carries one.
	pub kind: Option<PageKind>,
	/// Page path relative to the docs root.
	pub path: String,
}

/// Parse index text. Every `- ` bullet with at least two backtick-quoted
/// spans is an entry: the first span is the name, the second the path.
pub fn parse_index_text(content: &str) -> Vec<IndexEntry> {
	content
		.lines()
		.filter_map(|line| parse_index_line(line.trim()))
		.collect()
}

fn parse_index_line(line: &str) -> Option<IndexEntry> {
	if !line.starts_with("- ") {
		return None;
	}

	let parts: Vec<&str> = line.split('`').collect();
	if parts.len() < 4 {
		return None;
	}

	let name = parts[1].trim();
	let path = parts[3].trim();
	if name.is_empty() || path.is_empty() {
		return None;
	}

	let kind = parts[2]
		.split(['—', '-'])
		.map(str::trim)
		.find_map(|segment| {
			match segment {
				"command" => Some(PageKind::Command),
				"cvar" => Some(PageKind::Cvar),
				_ => None,
			}
		});

	Some(IndexEntry {
		name: name.to_string(),
		kind,
		path: path.to_string(),
	})
}

/// Read and parse the index file. A missing index yields no entries.
pub fn parse_index(path: &Path) -> SofdocsResult<Vec<IndexEntry>> {
	if !path.is_file() {
		tracing::debug!(path = %path.display(), "no index file");
		return Ok(Vec::new());
	}

	let entries = parse_index_text(&read_text(path)?);
	tracing::debug!(count = entries.len(), "parsed index");
	Ok(entries)
}
