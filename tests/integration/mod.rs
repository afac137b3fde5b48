//! Integration test suite for tplview
//!
//! End-to-end tests against real temporary view roots and the compiled binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **loading**: include resolution, variables, walk order and error paths
//! - **caching**: mtime-keyed reuse, preloading and cache sharing
//! - **cli**: the `tplview` binary (render, preload, config lookup, exit codes)

mod caching;
mod cli;
mod loading;
