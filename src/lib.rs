//! plangraph - schema-checked query plan compiler
//!
//! This crate turns candidate filters over a declared object-graph schema into
//! two query texts:
//! - a GraphQL filtered entry-point query
//! - an equivalent Cypher graph-pattern query
//!
//! The pipeline is schema load (`graph_catalog`), plan building and
//! validation (`query_planner`), then rendering (`query_generator`), glued
//! together by `compiler`.

pub mod compiler;
pub mod config;
pub mod graph_catalog;
pub mod query_generator;
pub mod query_planner;

pub use compiler::{compile, compile_filters, CompileError, CompiledQuery, PipelineOutput};
