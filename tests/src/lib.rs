//! # Dedup Test Suite
//!
//! Workspace-level test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # End-to-end scenarios across crates
//! │   ├── scenarios.rs   # Batch add / exists / info flows
//! │   ├── concurrency.rs # Shared collections under load
//! │   └── persistence.rs # Restart and reload
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dedup-tests
//! cargo test -p dedup-tests integration::persistence
//!
//! # Benchmarks
//! cargo bench -p dedup-tests
//! ```

pub mod integration;
