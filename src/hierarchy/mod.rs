pub mod builder;
pub mod caches;
pub mod config;
pub mod graph;
pub mod xbar;

#[cfg(test)]
mod unit_tests;

pub use builder::{CacheHierarchy, ClassicHierarchy};
pub use caches::CacheParams;
pub use config::{CacheSpec, HierarchyConfig, HierarchyParams, SpecError};
pub use graph::{CoreTopology, GraphSummary, HierarchyGraph, Topology};
pub use xbar::XbarParams;
