//! # Folio Core
//!
//! Shared, I/O-free logic for Folio: article models, front-matter
//! validation, Markdown rendering, the category hierarchy, card projection
//! and summaries.
//!
//! This crate contains no tokio, filesystem access or configuration
//! loading. The calling application gathers [`models::RawArticle`]s and
//! drives them through the stages below.
//!
//! ```text
//! RawArticle ──▶ loader ──▶ render ──▶ hierarchy ──┬──▶ cards
//!                                                   ├──▶ summary
//!                                                   └──▶ tree
//! ```

pub mod cards;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod models;
pub mod render;
pub mod summary;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;
