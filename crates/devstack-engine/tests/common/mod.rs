//! Common test infrastructure for devstack-engine tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Component names, versions and URL paths
//! - `builders`: In-memory zip archive builder
//! - `fixtures`: Engine configuration and `DevStack` construction
//! - `mock_server`: Wiremock setup helpers and request counting
//! - `path_manager`: PATH collaborator that records calls

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod fixtures;
pub mod mock_server;
pub mod path_manager;

pub use builders::*;
pub use constants::*;
pub use fixtures::*;
pub use mock_server::*;
pub use path_manager::*;
