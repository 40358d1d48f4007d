use std::path::PathBuf;

use crate::DocsLayout;
use crate::PageKind;
use crate::SofdocsError;
use crate::SofdocsResult;
use crate::document::read_summary;
use crate::document::render_frontmatter;
use crate::layout::LEGACY_EXTENSION;
use crate::layout::RULE_EXTENSION;
use crate::layout::files_with_extension;
use crate::layout::read_text;
use crate::layout::write_text;

/// Whether migrated originals are kept or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrateMode {
	#[default]
	Copy,
	Move,
}

/// Convert legacy `*.md` pages into `.mdc` rule pages with a frontmatter
/// block whose description is the page summary. Page content is kept as is.
/// Returns the written rule pages.
pub fn migrate_legacy(layout: &DocsLayout, mode: MigrateMode) -> SofdocsResult<Vec<PathBuf>> {
	if !layout.legacy_dir.is_dir() {
		return Err(SofdocsError::MissingLegacyDocs(
			layout.legacy_dir.display().to_string(),
		));
	}

	let mut written = Vec::new();
	for kind in PageKind::ALL {
		let source_dir = layout.legacy_dir.join(kind.dir_name());
		let sources = files_with_extension(&source_dir, LEGACY_EXTENSION)?;
		if sources.is_empty() {
			continue;
		}

		let target_dir = layout.rules_dir.join(kind.dir_name());
		std::fs::create_dir_all(&target_dir)?;

		for source in sources {
			let Some(stem) = source.file_stem() else {
				continue;
			};
			let target = target_dir.join(format!("{}.{RULE_EXTENSION}", stem.to_string_lossy()));

			let content = read_text(&source)?;
			let frontmatter = render_frontmatter(&read_summary(&content), false);
			write_text(&target, &format!("{frontmatter}\n{content}"))?;

			if mode == MigrateMode::Move {
				std::fs::remove_file(&source)?;
			}

			tracing::debug!(from = %source.display(), to = %target.display(), "migrated page");
			written.push(target);
		}
	}

	tracing::info!(count = written.len(), ?mode, "migrated legacy docs");
	Ok(written)
}
