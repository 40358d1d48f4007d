use std::sync::LazyLock;

use regex::Regex;

use crate::DocsLayout;
use crate::Document;
use crate::Page;
use crate::SofdocsResult;
use crate::document::join_frontmatter;
use crate::document::set_description;
use crate::layout::read_text;
use crate::layout::write_text;

/// Lines made of a single identifier-like token, e.g. `.players` or
/// `sp_sc_timer`. They name the item rather than describe it.
static SINGLE_TOKEN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-`]+$").expect("valid single token regex"));

/// A colon used as a `name : description` delimiter. Colons inside values
/// such as `12:30:00` are not followed by whitespace and stay.
static DELIMITER_COLON: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s*:\s+").expect("valid delimiter regex"));

/// The first substantive line of a page body: not blank, not inside a code
/// fence, not a `###` heading, not a section label and not a lone token.
pub fn extract_description(body: &str) -> Option<String> {
	let mut in_fence = false;

	for line in body.lines().map(str::trim) {
		if line.is_empty() {
			continue;
		}

		if line.starts_with("```") {
			in_fence = !in_fence;
			continue;
		}

		if in_fence || line.starts_with("###") {
			continue;
		}

		let lower = line.to_lowercase();
		if ["synopsis", "example", "parameters"]
			.iter()
			.any(|label| lower.starts_with(label))
		{
			continue;
		}

		if !line.contains(' ') && SINGLE_TOKEN.is_match(line) {
			continue;
		}

		return Some(line.trim_matches([' ', '`']).to_string());
	}

	None
}

/// The frontmatter description for a page named `name`.
pub fn description_for(name: &str, body: &str) -> String {
	match extract_description(body) {
		Some(description) if !description.is_empty() => format!("{name} - {description}"),
		_ => name.to_string(),
	}
}

/// Recompute the `description:` of one rule page. Returns whether the file
/// was (or, with `dry_run`, would be) rewritten. Pages without frontmatter
/// are left alone.
pub fn update_page_description(page: &Page, dry_run: bool) -> SofdocsResult<bool> {
	let text = read_text(&page.path)?;
	let document = Document::parse(&text);
	let Some(frontmatter) = document.frontmatter else {
		return Ok(false);
	};

	let description = description_for(&page.name(), document.body);
	let current = document
		.metadata()
		.ok()
		.and_then(|metadata| metadata.description);
	if current.as_deref() == Some(description.as_str()) {
		return Ok(false);
	}

	if !dry_run {
		let updated = join_frontmatter(&set_description(frontmatter, &description), document.body);
		write_text(&page.path, &updated)?;
	}

	tracing::debug!(path = %page.path.display(), %description, "updated description");
	Ok(true)
}

/// Update the descriptions of every rule page. Returns the pages that
/// changed; a failure on one page is logged and does not stop the rest.
pub fn update_descriptions(layout: &DocsLayout, dry_run: bool) -> SofdocsResult<Vec<Page>> {
	let mut updated = Vec::new();

	for page in layout.pages(None)?.into_iter().filter(Page::is_rule) {
		match update_page_description(&page, dry_run) {
			Ok(true) => updated.push(page),
			Ok(false) => {}
			Err(e) => {
				tracing::error!(
					path = %page.path.display(),
					error = %e,
					"failed to update description"
				);
			}
		}
	}

	tracing::info!(updated = updated.len(), "updated descriptions");
	Ok(updated)
}

/// Replace `name : description` delimiters with `name - description` in the
/// first `description:` line of a page.
pub fn fix_description_delimiters(text: &str) -> String {
	let mut offset = 0;

	for line in text.split_inclusive('\n') {
		if let Some(rest) = line.strip_prefix("description:") {
			let content = rest.trim_end_matches(['\n', '\r']);
			let ending = &rest[content.len()..];
			let value = content.trim_start();
			let spacing = &content[..content.len() - value.len()];
			let fixed = DELIMITER_COLON.replace_all(value, " - ");

			return format!(
				"{}description:{spacing}{fixed}{ending}{}",
				&text[..offset],
				&text[offset + line.len()..]
			);
		}
		offset += line.len();
	}

	text.to_string()
}

/// Repair the description delimiters of one page. Returns whether the page
/// was rewritten.
pub fn fix_page_description(page: &Page) -> SofdocsResult<bool> {
	let text = read_text(&page.path)?;
	let updated = fix_description_delimiters(&text);
	if updated == text {
		return Ok(false);
	}

	write_text(&page.path, &updated)?;
	Ok(true)
}

/// Repair the description delimiters of every rule page, returning the
/// pages that changed. A page that cannot be read or written is logged and
/// skipped.
pub fn fix_descriptions(layout: &DocsLayout) -> SofdocsResult<Vec<Page>> {
	let mut fixed = Vec::new();

	for page in layout.pages(None)?.into_iter().filter(Page::is_rule) {
		match fix_page_description(&page) {
			Ok(true) => fixed.push(page),
			Ok(false) => {}
			Err(e) => {
				tracing::error!(
					path = %page.path.display(),
					error = %e,
					"failed to fix description"
				);
			}
		}
	}

	tracing::info!(fixed = fixed.len(), "fixed descriptions");
	Ok(fixed)
}
