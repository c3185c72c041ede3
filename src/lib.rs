//! taskflow - single-account task manager library
//!
//! This library provides the core functionality for the `tf` CLI: a local
//! account, emoji categories, and tasks persisted as four keyed JSON records.
//!
//! # Core Concepts
//!
//! - **Records**: `tf-user`, `tf-categories`, `tf-tasks`, `tf-theme`
//! - **Categories**: named, emoji-labelled buckets; deleting one deletes its tasks
//! - **Tasks**: pending/done items with search, six sort orders, and progress
//! - **Session**: logged-out/logged-in state plus the current view and any
//!   action awaiting confirmation
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskflow.toml`
//! - `error`: Error types and result aliases
//! - `storage`: Key-value backends and typed record access
//! - `repository`: CRUD over categories, tasks, account, and theme
//! - `query`: Filtering, sorting, and progress
//! - `session`: Authentication state machine and application state
//! - `hash`: Legacy password token
//! - `lock`: File locking and atomic writes for the file store

pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod lock;
pub mod output;
pub mod query;
pub mod repository;
pub mod session;
pub mod storage;
pub mod task;
pub mod user;

pub use error::{Error, Result};
