use serde::Deserialize;

/// Maximum length (in characters) of a page summary.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// A page split into its optional YAML frontmatter and markdown body.
///
/// The frontmatter slice holds the text between the two `---` fences
/// (without the fences themselves). The body is everything after the closing
/// fence line. Pages without a well-formed frontmatter block are all body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
	pub frontmatter: Option<&'a str>,
	pub body: &'a str,
}

impl<'a> Document<'a> {
	pub fn parse(text: &'a str) -> Self {
		let whole = Self {
			frontmatter: None,
			body: text,
		};

		let first_len = text.find('\n').map_or(text.len(), |idx| idx + 1);
		if text[..first_len].trim_end() != "---" {
			return whole;
		}

		let rest = &text[first_len..];
		let mut offset = 0;
		for line in rest.split_inclusive('\n') {
			if line.trim_end() == "---" {
				return Self {
					frontmatter: Some(&rest[..offset]),
					body: &rest[offset + line.len()..],
				};
			}
			offset += line.len();
		}

		whole
	}

	/// The body with leading blank lines removed.
	pub fn content(&self) -> &'a str {
		self.body.trim_start_matches(['\n', '\r'])
	}

	/// Deserialize the frontmatter block. Pages without one yield the default.
	pub fn metadata(&self) -> Result<Frontmatter, serde_yaml_ng::Error> {
		match self.frontmatter {
			Some(raw) => Frontmatter::parse(raw),
			None => Ok(Frontmatter::default()),
		}
	}
}

/// The keys of a rule page's frontmatter this tool cares about. Unknown keys
/// are tolerated.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub always_apply: Option<bool>,
}

impl Frontmatter {
	pub fn parse(raw: &str) -> Result<Self, serde_yaml_ng::Error> {
		if raw.trim().is_empty() {
			return Ok(Self::default());
		}

		serde_yaml_ng::from_str(raw)
	}
}

/// Reassemble a page from raw frontmatter text and a body.
pub fn join_frontmatter(frontmatter: &str, body: &str) -> String {
	let separator = if frontmatter.is_empty() || frontmatter.ends_with('\n') {
		""
	} else {
		"\n"
	};

	format!("---\n{frontmatter}{separator}---\n{body}")
}

/// Render a fresh frontmatter block for a rule page.
pub fn render_frontmatter(description: &str, always_apply: bool) -> String {
	format!(
		"---\n{}\nalwaysApply: {always_apply}\n---\n",
		description_line(description)
	)
}

/// Replace the first `description:` line of raw frontmatter text, keeping its
/// indentation and every other line. When no such line exists one is
/// prepended.
pub fn set_description(frontmatter: &str, description: &str) -> String {
	let mut offset = 0;
	for line in frontmatter.split_inclusive('\n') {
		let trimmed = line.trim_start();
		if trimmed.starts_with("description:") {
			let indent = &line[..line.len() - trimmed.len()];
			let ending = &line[line.trim_end_matches(['\n', '\r']).len()..];
			return format!(
				"{}{indent}{}{ending}{}",
				&frontmatter[..offset],
				description_line(description),
				&frontmatter[offset + line.len()..]
			);
		}
		offset += line.len();
	}

	format!("{}\n{frontmatter}", description_line(description))
}

fn description_line(description: &str) -> String {
	if description.is_empty() {
		"description:".to_string()
	} else {
		format!("description: {}", yaml_scalar(description))
	}
}

/// Encode a single-line string as a YAML scalar, quoting only when YAML
/// requires it.
pub fn yaml_scalar(value: &str) -> String {
	match serde_yaml_ng::to_string(value) {
		Ok(encoded) => encoded.trim_end_matches('\n').to_string(),
		Err(_) => format!("{value:?}"),
	}
}

/// The optional one-line summary under a page's title: the first non-empty
/// line among the three after a `### ` title in the first five lines, with
/// backticks removed.
pub fn read_summary(body: &str) -> String {
	let lines: Vec<&str> = body.lines().collect();
	let Some(title_idx) = lines
		.iter()
		.take(5)
		.position(|line| line.starts_with("### "))
	else {
		return String::new();
	};

	lines
		.iter()
		.skip(title_idx + 1)
		.take(3)
		.map(|line| line.trim())
		.find(|line| !line.is_empty())
		.map(|line| truncate_chars(line.replace('`', "").trim(), SUMMARY_MAX_CHARS))
		.unwrap_or_default()
}

pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
	value.chars().take(max).collect()
}
