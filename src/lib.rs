//! # TaskFlow
//!
//! Core of a personal task manager: a validated task model, pure view
//! derivation (search, category and status filters, priority ordering,
//! statistics), a persistence adapter over a simple key-value store, and a
//! session controller that ties them together.
//!
//! ## Layout
//!
//! - [`task`] and [`validate`]: the `Task` record and its input rules
//! - [`view`]: read-only projections over a task slice
//! - [`db`] and [`storage`]: key-value backends and the slot encoding on top
//! - [`state`]: the `TaskFlow` controller, the only owner of the collection
//! - [`cli`], [`cmd`] and [`display`]: the `taskflow` command line
//!
//! ## Example
//!
//! ```
//! use taskflow::db::MemoryStore;
//! use taskflow::fields::Priority;
//! use taskflow::state::TaskFlow;
//! use taskflow::storage::Storage;
//! use taskflow::task::CreateTaskInput;
//!
//! let mut flow = TaskFlow::load(Storage::new(MemoryStore::new()));
//! flow.create(CreateTaskInput::new("Buy milk", Priority::High, "Shopping")).unwrap();
//! assert_eq!(flow.stats().active, 1);
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod fields;
pub mod state;
pub mod storage;
pub mod task;
pub mod validate;
pub mod view;
