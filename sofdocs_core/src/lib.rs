//! `sofdocs_core` is the library behind the `sofdocs` maintenance commands for
//! the SoFplus scripting API reference. It knows where command and cvar pages
//! live, how to normalize their markdown, and how to derive the lookup map,
//! frontmatter descriptions and integrity reports from them.
//!
//! ## Documentation tree
//!
//! ```text
//! .cursor/rules/sofplus-api/
//!   commands/*.mdc       command pages (YAML frontmatter + markdown)
//!   cvars/*.mdc          cvar pages
//!   commands_index.md    hand-maintained index
//!   map.json             generated name -> { path, summary } lookup
//! docs/sofplus-api/      legacy `.md` pages, read until migrated
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `sofdocs.toml` discovery and path overrides.
//! - `layout`: Resolved paths and page discovery.
//! - [`normalize`]: The page formatter: synopsis, parameters, values and
//!   example regions rewritten into bullets and fenced code.
//! - [`map`]: Building and reading `map.json`.
//! - [`describe`]: Frontmatter `description:` extraction and repair.
//! - [`split`]: Splitting the HTML reference into pages.
//! - [`migrate`]: Moving legacy pages into the rules directory.
//! - [`validate`]: Index, map, schema and example checks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sofdocs_core::DocsLayout;
//! use sofdocs_core::map::build_map;
//! use sofdocs_core::map::write_map;
//! use std::path::Path;
//!
//! let layout = DocsLayout::discover(Path::new(".")).unwrap();
//!
//! for page in layout.pages(None).unwrap() {
//!     let formatted = sofdocs_core::normalize::format_page(&page).unwrap();
//!     if formatted.is_changed() {
//!         formatted.write().unwrap();
//!     }
//! }
//!
//! let map = build_map(&layout).unwrap();
//! write_map(&layout, &map).unwrap();
//! ```

pub use config::*;
pub use document::*;
pub use error::*;
pub use layout::*;

pub mod config;
pub mod describe;
mod document;
#[allow(unused_assignments)]
mod error;
pub mod index;
mod layout;
pub mod map;
pub mod migrate;
pub mod normalize;
pub mod split;
pub mod validate;
