//! # Folio
//!
//! Ingestion and indexing for a personal article site.
//!
//! Folio loads Markdown articles with front matter, renders each body to
//! display HTML and plain text, groups the collection into a deterministic
//! category → subcategory hierarchy, and derives the views the site is
//! built from: presentation cards, the flat category map, featured
//! articles, per-article bundles and a compact context summary.
//!
//! The pure pipeline stages live in [`folio_core`]; this crate adds the
//! sources, concurrency, configuration and the `folio` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ ArticleSource│──▶│ load + render│──▶│ Hierarchical │
//! │  FS / Memory │   │  (fan-out)   │   │    Index     │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                  ┌──────────────┬────────────┼────────────┐
//!                  ▼              ▼            ▼            ▼
//!             ┌─────────┐   ┌──────────┐  ┌─────────┐  ┌─────────┐
//!             │  Cards  │   │ Category │  │ Summary │  │ Bundles │
//!             │         │   │   Map    │  │Featured │  │         │
//!             └─────────┘   └──────────┘  └─────────┘  └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! folio check                        # build, report excluded articles
//! folio tree                         # category tree with dates
//! folio cards --json                 # card projection
//! folio export --output site.json    # everything the front end needs
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`traits`] | The [`traits::ArticleSource`] extension point |
//! | [`connector_fs`] | Filesystem source |
//! | [`ingest`] | Concurrent build pipeline and index cache |
//! | [`check`] | Build report |
//! | [`listing`] | Tree, category, card and summary views |
//! | [`get`] | Single-article lookup |
//! | [`export`] | JSON export |
//! | [`watch`] | Rebuild on change |
//! | [`logging`] | Tracing subscriber setup |

pub mod check;
pub mod config;
pub mod connector_fs;
pub mod export;
pub mod get;
pub mod ingest;
pub mod listing;
pub mod logging;
pub mod traits;
pub mod watch;

pub use folio_core;
