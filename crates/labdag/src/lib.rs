//! LabDAG - dependency planning for lab products.
//!
//! A [`ProductGraph`](graph::ProductGraph) records products (plasmids, cell
//! lines, protocols) and which ones each needs first. The crate orders them
//! so every prerequisite comes before its dependents, reports the exact
//! cycle when no such order exists, and flags target dates that fall before
//! a prerequisite's target.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod chart;
pub mod domain;
pub mod error;
pub mod graph;
pub mod order;
pub mod storage;
pub mod validate;

// Application and shell (needed by binary)
pub mod app;
pub mod cli;
pub mod config;
pub mod output;
