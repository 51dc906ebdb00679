//! LevelDB Viewer (ldbv)
//!
//! TUI application for browsing LevelDB databases: incremental filtered key
//! listing, binary-safe value inspection, and export to text files.
//!
//! Layout follows a pure-core / impure-shell split: `pager`, `render`, and
//! `state` are pure and fully tested without a terminal; `view` owns the
//! terminal; `store` is the seam to the database.

pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod pager;
pub mod render;
pub mod state;
pub mod store;
pub mod view;
