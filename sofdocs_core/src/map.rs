use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::DocsLayout;
use crate::Document;
use crate::SofdocsError;
use crate::SofdocsResult;
use crate::document::read_summary;
use crate::index::parse_index;
use crate::layout::read_text;
use crate::layout::write_text;

/// File-stem suffix marking a page that documents a whole `prefix_*` family.
pub const WILDCARD_SUFFIX: &str = "_asterisk";
/// Name prefix of pages documenting dot commands (`dot_yes` is `.yes`).
pub const DOT_PREFIX: &str = "dot_";

/// A map value: where the page lives and its one-line summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
	pub path: String,
	pub summary: String,
}

/// Name-sorted lookup table written to `map.json`.
pub type DocsMap = BTreeMap<String, MapEntry>;

/// Build the lookup map from the pages on disk and the index.
///
/// 1. Every page registers under its file stem. `<prefix>_asterisk` pages
///    register as `<prefix>_*` without displacing an existing entry.
/// 2. Index entries fill in names missing from the pages, and replace a
///    wildcard-family entry with an explicit page.
/// 3. Every `dot_<x>` name gains a `.<x>` alias unless that name exists.
pub fn build_map(layout: &DocsLayout) -> SofdocsResult<DocsMap> {
	let mut map = DocsMap::new();

	for page in layout.pages(None)? {
		let entry = MapEntry {
			path: page.relative(),
			summary: page_summary(&page.path),
		};

		let name = page.name();
		match name.strip_suffix(WILDCARD_SUFFIX) {
			Some(prefix) => {
				map.entry(format!("{prefix}_*")).or_insert(entry);
			}
			None => {
				map.insert(name, entry);
			}
		}
	}

	for index_entry in parse_index(&layout.index_file)? {
		let replace = match map.get(&index_entry.name) {
			None => true,
			Some(current) => {
				is_wildcard_path(&current.path) && !index_entry.name.ends_with('*')
			}
		};

		if !replace {
			continue;
		}

		let summary = layout
			.resolve_reference(&index_entry.path)
			.map(|path| page_summary(&path))
			.unwrap_or_default();
		map.insert(
			index_entry.name,
			MapEntry {
				path: index_entry.path,
				summary,
			},
		);
	}

	let aliases: Vec<(String, MapEntry)> = map
		.iter()
		.filter_map(|(name, entry)| {
			name.strip_prefix(DOT_PREFIX)
				.map(|rest| (format!(".{rest}"), entry.clone()))
		})
		.collect();
	for (alias, entry) in aliases {
		map.entry(alias).or_insert(entry);
	}

	tracing::info!(entries = map.len(), "built map");
	Ok(map)
}

/// Pretty JSON with a trailing newline.
pub fn render_map(map: &DocsMap) -> SofdocsResult<String> {
	let mut text =
		serde_json::to_string_pretty(map).map_err(|e| SofdocsError::MapSerialize(e.to_string()))?;
	text.push('\n');
	Ok(text)
}

/// Write the rendered map to the layout's map file.
pub fn write_map(layout: &DocsLayout, map: &DocsMap) -> SofdocsResult<()> {
	let text = render_map(map)?;
	if let Some(parent) = layout.map_file.parent() {
		std::fs::create_dir_all(parent)?;
	}
	write_text(&layout.map_file, &text)
}

/// Read an existing map as `name -> path`. Both entry objects and bare path
/// strings are accepted; values of any other shape are skipped. A missing
/// map yields an empty table.
pub fn read_map_paths(path: &Path) -> SofdocsResult<BTreeMap<String, String>> {
	if !path.is_file() {
		return Ok(BTreeMap::new());
	}

	let text = read_text(path)?;
	let raw: BTreeMap<String, Value> =
		serde_json::from_str(&text).map_err(|e| {
			SofdocsError::MapParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

	Ok(raw
		.into_iter()
		.filter_map(|(name, value)| {
			let path = match value {
				Value::String(path) => path,
				Value::Object(mut entry) => {
					match entry.remove("path") {
						Some(Value::String(path)) => path,
						_ => return None,
					}
				}
				_ => return None,
			};
			Some((name, path))
		})
		.collect())
}

/// Summary line of the page at `path`, or empty when it cannot be read.
pub fn page_summary(path: &Path) -> String {
	match read_text(path) {
		Ok(text) => read_summary(Document::parse(&text).content()),
		Err(e) => {
			tracing::warn!(path = %path.display(), error = %e, "could not read page summary");
			String::new()
		}
	}
}

fn is_wildcard_path(path: &str) -> bool {
	Path::new(path)
		.file_stem()
		.is_some_and(|stem| stem.to_string_lossy().ends_with(WILDCARD_SUFFIX))
}
