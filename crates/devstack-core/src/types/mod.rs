//! Type definitions for DevStack configuration, components and catalogs

mod catalog_types;
mod component_types;
mod runtime_config;

pub use catalog_types::*;
pub use component_types::*;
pub use runtime_config::*;
