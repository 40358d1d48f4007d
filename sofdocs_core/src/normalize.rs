//! Rewrites semi-structured command and cvar pages into one consistent
//! layout.
//!
//! A page body is scanned for a handful of labelled regions:
//!
//! ```text
//! ### sp_sc_cvar_copy            title
//! Copies one cvar into another.  summary
//!
//! Synopsis:                      synopsis label + code block
//! `sp_sc_cvar_copy DST SRC`
//!
//! DST                            parameters (upper-case name, description)
//! Destination cvar
//!
//! Values:                        values (value line, meaning line)
//! 0
//! off
//!
//! Example:                       example label + code block
//! `sp_sc_cvar_copy a b`
//! ```
//!
//! Single-backtick blocks become ```` ```txt ```` fences, parameters and
//! values become `- name: description` bullets. Running the normalizer on
//! its own output changes nothing.

use similar::TextDiff;

use crate::Document;
use crate::Page;
use crate::SofdocsResult;
use crate::document::join_frontmatter;
use crate::layout::read_text;
use crate::layout::write_text;

const SYNOPSIS_LABEL: &str = "synopsis:";
const EXAMPLE_LABEL: &str = "example:";
const VALUES_LABEL: &str = "values:";
const PARAMETERS_LABEL: &str = "parameters:";
const SECTION_LABELS: [&str; 4] = [SYNOPSIS_LABEL, EXAMPLE_LABEL, VALUES_LABEL, PARAMETERS_LABEL];

/// Fence emitted for converted single-backtick blocks.
const TEXT_FENCE: &str = "```txt";

/// Line indices of the labelled regions of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionPositions {
	pub synopsis_label: Option<usize>,
	pub synopsis_start: Option<usize>,
	pub synopsis_end: Option<usize>,
	pub example_label: Option<usize>,
	pub values_label: Option<usize>,
}

/// Normalize a markdown page body.
pub fn normalize_markdown(content: &str) -> String {
	let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

	lines = collapse_blank_lines(lines);
	lines = normalize_title(lines);

	let pos = find_sections(&lines);
	lines = normalize_synopsis(lines, pos);

	let pos = find_sections(&lines);
	lines = normalize_parameters(lines, pos);

	let pos = find_sections(&lines);
	lines = normalize_values(lines, pos);

	let pos = find_sections(&lines);
	lines = normalize_examples(lines, pos);

	lines = collapse_blank_lines(lines);

	let mut output = lines.join("\n");
	output.push('\n');
	output
}

/// Normalize a whole page. A frontmatter block is kept as is and only the
/// body below it is rewritten.
pub fn normalize_page(text: &str) -> String {
	let document = Document::parse(text);
	match document.frontmatter {
		Some(frontmatter) => {
			let body = normalize_markdown(document.body);
			join_frontmatter(frontmatter, &format!("\n{body}"))
		}
		None => normalize_markdown(text),
	}
}

/// Trim trailing whitespace, collapse runs of blank lines into one and drop
/// leading and trailing blank lines. Lines inside ```` ``` ```` fences are
/// kept verbatim.
pub fn collapse_blank_lines(lines: Vec<String>) -> Vec<String> {
	let mut result: Vec<String> = Vec::with_capacity(lines.len());
	let mut in_fence = false;

	for line in lines {
		if is_fence(&line) {
			in_fence = !in_fence;
			result.push(line.trim_end().to_string());
			continue;
		}

		if in_fence {
			result.push(line);
			continue;
		}

		if line.trim().is_empty() {
			if result.last().is_some_and(|last| !last.is_empty()) {
				result.push(String::new());
			}
		} else {
			result.push(line.trim_end().to_string());
		}
	}

	while result.first().is_some_and(String::is_empty) {
		result.remove(0);
	}
	while result.last().is_some_and(String::is_empty) {
		result.pop();
	}

	result
}

/// Drop plain-name lines directly under a `### title` that repeat the title.
pub fn normalize_title(mut lines: Vec<String>) -> Vec<String> {
	let Some(title) = lines.first().and_then(|line| title_text(line)) else {
		return lines;
	};
	let title = title.to_string();

	while lines.len() >= 2 && lines[1].trim() == title {
		lines.remove(1);
		if lines.len() > 1 && lines[1].trim().is_empty() {
			lines.remove(1);
		}
	}

	lines
}

/// Title text of a `### name` heading line.
pub fn title_text(line: &str) -> Option<&str> {
	let rest = line.strip_prefix("###")?;
	if !rest.starts_with(char::is_whitespace) {
		return None;
	}

	let title = rest.trim();
	(!title.is_empty()).then_some(title)
}

/// Locate the first synopsis, example and values labels. Labels inside code
/// blocks are ignored.
pub fn find_sections(lines: &[String]) -> SectionPositions {
	let mut pos = SectionPositions::default();
	let mut in_fence = false;
	let mut idx = 0;

	while idx < lines.len() {
		let line = &lines[idx];

		if is_fence(line) {
			in_fence = !in_fence;
			idx += 1;
			continue;
		}

		if in_fence {
			idx += 1;
			continue;
		}

		if pos.synopsis_label.is_none() && is_label(line, SYNOPSIS_LABEL) {
			pos.synopsis_label = Some(idx);
			let block_idx = skip_blank_lines(lines, idx + 1);
			if let Some((start, end)) = locate_code_block(lines, block_idx) {
				pos.synopsis_start = Some(start);
				pos.synopsis_end = Some(end);
				idx = end + 1;
			} else {
				idx = block_idx;
			}
			continue;
		}

		if pos.example_label.is_none() && is_label(line, EXAMPLE_LABEL) {
			pos.example_label = Some(idx);
		}

		if pos.values_label.is_none() && is_label(line, VALUES_LABEL) {
			pos.values_label = Some(idx);
		}

		idx += 1;
	}

	pos
}

/// Fence single-backtick synopsis blocks and leave exactly one blank line
/// between the label and the block.
pub fn normalize_synopsis(mut lines: Vec<String>, mut pos: SectionPositions) -> Vec<String> {
	let (Some(_), Some(start), Some(end)) =
		(pos.synopsis_label, pos.synopsis_start, pos.synopsis_end)
	else {
		return lines;
	};

	if is_inline_code_start(&lines[start]) {
		lines = fence_inline_block(lines, start, end);
		pos = find_sections(&lines);
	}

	let Some(label) = pos.synopsis_label else {
		return lines;
	};

	let block_idx = skip_blank_lines(&lines, label + 1);
	lines.splice(label + 1..block_idx, [String::new()]);
	lines
}

/// Rewrite `NAME` / description pairs between the synopsis block and the
/// next values or example label as a `Parameters:` bullet list.
pub fn normalize_parameters(mut lines: Vec<String>, pos: SectionPositions) -> Vec<String> {
	let Some(synopsis_end) = pos.synopsis_end else {
		return lines;
	};

	let stop = [pos.values_label, pos.example_label]
		.into_iter()
		.flatten()
		.filter(|&label| label > synopsis_end)
		.min();
	let (start, end) = extract_region(lines.len(), Some(synopsis_end), stop);
	let region = &lines[start..end];

	let already_listed = region
		.iter()
		.find(|line| !line.trim().is_empty())
		.is_none_or(|line| line.trim().to_lowercase().starts_with(PARAMETERS_LABEL))
		|| region.iter().any(|line| line.trim().starts_with('-'))
		|| region.iter().any(|line| is_fence(line) || is_section_label(line));
	if already_listed {
		return lines;
	}

	let parsed = parse_name_description_pairs(region);
	if parsed.pairs.is_empty() {
		return lines;
	}

	let mut replacement = vec![String::new()];
	if !parsed.preamble.is_empty() {
		replacement.extend(parsed.preamble);
		replacement.push(String::new());
	}
	replacement.push("Parameters:".to_string());
	replacement.push(String::new());
	replacement.extend(render_pairs_as_bullets(&parsed.pairs));
	replacement.push(String::new());

	lines.splice(start..end, replacement);
	lines
}

/// Rewrite the lines under `Values:` as a bullet list of `value: meaning`.
pub fn normalize_values(mut lines: Vec<String>, pos: SectionPositions) -> Vec<String> {
	let Some(label) = pos.values_label else {
		return lines;
	};

	let start = label + 1;
	let end = lines
		.iter()
		.enumerate()
		.skip(start)
		.find(|(_, line)| is_section_label(line))
		.map_or(lines.len(), |(idx, _)| idx);
	let region = &lines[start..end];

	let already_listed = region.iter().any(|line| line.trim().starts_with('-'))
		|| region.iter().any(|line| is_fence(line));
	if already_listed {
		return lines;
	}

	let pairs = parse_value_pairs(region);
	if pairs.is_empty() {
		return lines;
	}

	let mut replacement = vec![String::new()];
	replacement.extend(render_pairs_as_bullets(&pairs));
	replacement.push(String::new());

	lines.splice(start..end, replacement);
	lines
}

/// Fence a single-backtick example block.
pub fn normalize_examples(lines: Vec<String>, pos: SectionPositions) -> Vec<String> {
	let Some(label) = pos.example_label else {
		return lines;
	};

	let block_idx = skip_blank_lines(&lines, label + 1);
	if block_idx >= lines.len() || !is_inline_code_start(&lines[block_idx]) {
		return lines;
	}

	match locate_code_block(&lines, block_idx) {
		Some((start, end)) => fence_inline_block(lines, start, end),
		None => lines,
	}
}

/// Slice bounds `(start, end)` of the region strictly after `start_after` and
/// before `stop_before`, clamped to the line count.
pub fn extract_region(
	len: usize,
	start_after: Option<usize>,
	stop_before: Option<usize>,
) -> (usize, usize) {
	let start = start_after.map_or(0, |idx| idx + 1).min(len);
	let end = stop_before.unwrap_or(len).min(len).max(start);
	(start, end)
}

/// A parameter region split into free text before the first parameter and
/// the parameters themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedParameters {
	pub preamble: Vec<String>,
	pub pairs: Vec<(String, String)>,
}

/// Parse upper-case names each followed by description lines. Text between
/// parameters that follows a blank line still belongs to the preceding
/// parameter so nothing is dropped.
pub fn parse_name_description_pairs(lines: &[String]) -> ParsedParameters {
	let mut parsed = ParsedParameters::default();

	for line in lines {
		let text = line.trim();

		if text.is_empty() {
			if parsed.pairs.is_empty() && !parsed.preamble.is_empty() {
				parsed.preamble.push(String::new());
			}
			continue;
		}

		if is_upper_token(text) {
			parsed.pairs.push((text.to_string(), String::new()));
			continue;
		}

		match parsed.pairs.last_mut() {
			Some((_, description)) => {
				if !description.is_empty() {
					description.push(' ');
				}
				description.push_str(text);
			}
			None => parsed.preamble.push(line.clone()),
		}
	}

	while parsed.preamble.last().is_some_and(String::is_empty) {
		parsed.preamble.pop();
	}

	parsed
}

/// Parse a values region. Every non-blank line is a value and the next
/// non-blank line is its meaning; parsing stops at a section label.
pub fn parse_value_pairs(lines: &[String]) -> Vec<(String, String)> {
	let mut entries = lines
		.iter()
		.map(|line| line.trim())
		.filter(|line| !line.is_empty())
		.take_while(|line| !is_section_label(line));
	let mut pairs = Vec::new();

	while let Some(value) = entries.next() {
		let meaning = entries.next().unwrap_or_default();
		pairs.push((value.to_string(), meaning.to_string()));
	}

	pairs
}

pub fn render_pairs_as_bullets(pairs: &[(String, String)]) -> Vec<String> {
	pairs
		.iter()
		.map(|(name, description)| {
			if description.is_empty() {
				format!("- {name}:")
			} else {
				format!("- {name}: {description}")
			}
		})
		.collect()
}

/// True when the line's letters are all upper case, e.g. `DST CVAR` or
/// `MIN VALUE...`.
pub fn is_upper_token(line: &str) -> bool {
	let mut letters = line.trim().chars().filter(char::is_ascii_alphabetic).peekable();
	letters.peek().is_some() && letters.all(|c| c.is_ascii_uppercase())
}

fn is_fence(line: &str) -> bool {
	line.trim_start().starts_with("```")
}

fn is_label(line: &str, label: &str) -> bool {
	line.trim().eq_ignore_ascii_case(label)
}

fn is_section_label(line: &str) -> bool {
	SECTION_LABELS.iter().any(|label| is_label(line, label))
}

fn is_inline_code_start(line: &str) -> bool {
	line.starts_with('`') && !line.starts_with("```")
}

fn skip_blank_lines(lines: &[String], mut idx: usize) -> usize {
	while idx < lines.len() && lines[idx].trim().is_empty() {
		idx += 1;
	}
	idx
}

/// Start and end line of the code block beginning at `idx`: either a
/// ```` ``` ```` fence or a single-backtick block closed by a line ending in
/// a backtick. An unclosed block never extends into a fence or a label.
fn locate_code_block(lines: &[String], idx: usize) -> Option<(usize, usize)> {
	let first = lines.get(idx)?;

	if is_fence(first) {
		return (idx + 1..lines.len())
			.find(|&end| is_fence(&lines[end]))
			.map(|end| (idx, end));
	}

	if !is_inline_code_start(first) {
		return None;
	}

	let rest = first[1..].trim_end();
	if rest.ends_with('`') {
		return Some((idx, idx));
	}

	// Inline code followed by prose on the same line is not a block.
	if rest.contains('`') {
		return None;
	}

	for (end, line) in lines.iter().enumerate().skip(idx + 1) {
		if is_section_label(line) || is_fence(line) {
			return None;
		}
		if line.trim_end().ends_with('`') {
			return Some((idx, end));
		}
	}

	None
}

/// Replace the single-backtick block spanning `start..=end` with a
/// ```` ```txt ```` fence, keeping its line breaks.
fn fence_inline_block(mut lines: Vec<String>, start: usize, end: usize) -> Vec<String> {
	let mut content: Vec<String> = if start == end {
		let line = lines[start].trim_end();
		let inner = line
			.strip_prefix('`')
			.and_then(|line| line.strip_suffix('`'))
			.unwrap_or_default();
		vec![inner.to_string()]
	} else {
		let mut content = Vec::with_capacity(end - start + 1);
		content.push(lines[start][1..].to_string());
		content.extend(lines[start + 1..end].iter().cloned());
		let last = lines[end].trim_end();
		content.push(last.strip_suffix('`').unwrap_or(last).to_string());
		content
	};

	while content.first().is_some_and(|line| line.trim().is_empty()) {
		content.remove(0);
	}
	while content.last().is_some_and(|line| line.trim().is_empty()) {
		content.pop();
	}

	let mut fenced = Vec::with_capacity(content.len() + 2);
	fenced.push(TEXT_FENCE.to_string());
	fenced.append(&mut content);
	fenced.push("```".to_string());

	lines.splice(start..=end, fenced);
	lines
}

/// A page together with its normalized content.
#[derive(Debug, Clone)]
pub struct FormattedPage {
	pub page: Page,
	pub original: String,
	pub normalized: String,
}

impl FormattedPage {
	pub fn is_changed(&self) -> bool {
		self.original != self.normalized
	}

	/// Unified diff from the original to the normalized content.
	pub fn diff(&self) -> String {
		unified_diff(
			&self.original,
			&self.normalized,
			&self.page.path.display().to_string(),
		)
	}

	/// Write the normalized content back to the page.
	pub fn write(&self) -> SofdocsResult<()> {
		write_text(&self.page.path, &self.normalized)
	}
}

/// Read and normalize a single page.
pub fn format_page(page: &Page) -> SofdocsResult<FormattedPage> {
	let original = read_text(&page.path)?;
	let normalized = normalize_page(&original);
	tracing::debug!(
		path = %page.path.display(),
		changed = original != normalized,
		"normalized page"
	);

	Ok(FormattedPage {
		page: page.clone(),
		original,
		normalized,
	})
}

/// Unified diff between two texts using `path` for both headers.
pub fn unified_diff(old: &str, new: &str, path: &str) -> String {
	TextDiff::from_lines(old, new)
		.unified_diff()
		.header(path, path)
		.to_string()
}
