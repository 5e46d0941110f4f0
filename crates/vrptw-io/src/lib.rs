//! Solomon-format instance parsing and distance/travel-time/arc-filter preprocessing.
//!
//! This crate is pure plumbing: it produces the [`vrptw_core::PreprocessedGraph`] that
//! `vrptw-algo`'s ESPPTWC model binds to. It implements no solver logic.

pub mod preprocess;
pub mod solomon;

pub use preprocess::build_graph;
pub use solomon::parse_solomon;
