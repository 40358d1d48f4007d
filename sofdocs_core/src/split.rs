use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::DocsLayout;
use crate::PageKind;
use crate::SofdocsError;
use crate::SofdocsResult;
use crate::document::SUMMARY_MAX_CHARS;
use crate::document::render_frontmatter;
use crate::document::truncate_chars;
use crate::layout::RULE_EXTENSION;
use crate::layout::read_text;
use crate::layout::write_text;

static DT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<dt[^>]*\bid="([^"]+)"[^>]*>"#).expect("valid dt regex")
});
static ENTRY_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"<dt[^>]*\bid=|</dl>|<h2\s+id=").expect("valid boundary regex")
});
static BREAK: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));
static CODE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)<code>(.*?)</code>").expect("valid code regex"));
static HEADING: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)<h3[^>]*>(.*?)</h3>").expect("valid h3 regex"));
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"</?(?:ul|li|dl|dt|dd|div|span)\b[^>]*>").expect("valid block tag regex")
});
static ANY_TAG: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));
static UNSAFE_FILE_CHARS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^0-9A-Za-z._-]").expect("valid file name regex"));

/// One `<dt id=…>` entry of the HTML reference rendered as a rule page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEntry {
	pub id: String,
	pub kind: PageKind,
	pub file_name: String,
	pub content: String,
}

/// Split an HTML reference into one page per `<dt id=…>` entry. An entry's
/// body runs to the next entry, the end of its `<dl>`, the next `<h2 id=…>`
/// or the end of the document.
pub fn split_html(html: &str) -> Vec<SplitEntry> {
	let mut entries = Vec::new();

	for captures in DT_OPEN.captures_iter(html) {
		let (Some(open), Some(id)) = (captures.get(0), captures.get(1)) else {
			continue;
		};

		let Some(close_offset) = html[open.end()..].find("</dt>") else {
			tracing::warn!(id = id.as_str(), "skipping entry without closing </dt>");
			continue;
		};
		let title_end = open.end() + close_offset;
		let body_start = title_end + "</dt>".len();
		let body_end = ENTRY_BOUNDARY
			.find_at(html, body_start)
			.map_or(html.len(), |boundary| boundary.start());

		let title_html = &html[open.end()..title_end];
		let body_html = &html[body_start..body_end];
		entries.push(render_entry(
			id.as_str(),
			&html_to_md(&format!("{title_html}\n\n{body_html}")),
		));
	}

	entries
}

fn render_entry(id: &str, markdown: &str) -> SplitEntry {
	let summary = markdown
		.lines()
		.map(str::trim)
		.find(|line| !line.is_empty() && !line.starts_with("###"))
		.map(|line| truncate_chars(&line.replace('`', ""), SUMMARY_MAX_CHARS))
		.unwrap_or_default();
	let description = if summary.is_empty() {
		id.to_string()
	} else {
		format!("{id} - {summary}")
	};

	SplitEntry {
		id: id.to_string(),
		kind: PageKind::classify(id),
		file_name: format!("{}.{RULE_EXTENSION}", safe_file_stem(id)),
		content: format!(
			"{}\n### {id}\n\n{markdown}\n",
			render_frontmatter(&description, false)
		),
	}
}

/// File stem for an identifier; characters outside `[0-9A-Za-z._-]` become
/// `_`.
pub fn safe_file_stem(id: &str) -> String {
	UNSAFE_FILE_CHARS.replace_all(id, "_").into_owned()
}

/// Best-effort conversion of a fragment of reference HTML to markdown.
pub fn html_to_md(html: &str) -> String {
	let text = html.replace('\r', "");
	let text = BREAK.replace_all(&text, "\n");
	let text = CODE.replace_all(&text, |caps: &Captures<'_>| format!("`{}`", caps[1].trim()));
	let text = HEADING.replace_all(&text, |caps: &Captures<'_>| format!("**{}**\n", caps[1].trim()));
	let text = BLOCK_TAG.replace_all(&text, "\n");
	let text = ANY_TAG.replace_all(&text, "");
	let text = unescape_entities(&text);
	let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
	text.trim().to_string()
}

/// Decode named and numeric character references. A reference to NUL
/// becomes U+FFFD so no control byte reaches a page.
pub fn unescape_entities(text: &str) -> String {
	html_escape::decode_html_entities(text).replace('\0', "\u{fffd}")
}

/// Split the layout's HTML source into rule pages, returning the written
/// paths.
pub fn split_reference(layout: &DocsLayout) -> SofdocsResult<Vec<PathBuf>> {
	if !layout.source_html.is_file() {
		return Err(SofdocsError::MissingSource(
			layout.source_html.display().to_string(),
		));
	}

	let html = read_text(&layout.source_html)?;
	for kind in PageKind::ALL {
		std::fs::create_dir_all(layout.rules_dir.join(kind.dir_name()))?;
	}

	let mut written = Vec::new();
	for entry in split_html(&html) {
		let path = layout
			.rules_dir
			.join(entry.kind.dir_name())
			.join(&entry.file_name);
		write_text(&path, &entry.content)?;
		tracing::debug!(id = %entry.id, path = %path.display(), "wrote page");
		written.push(path);
	}

	tracing::info!(count = written.len(), "split reference");
	Ok(written)
}
