/// DiskAtlas Core: scanning, aggregation, treemap layout and data model.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`model`]: Owned size-annotated node tree and the scan result snapshot.
/// - [`scanner`]: Bounded-retention filesystem walk with progress and cancellation.
/// - [`layout`]: Squarified and nested treemap layout.
/// - [`analysis`]: Post-scan summaries (extensions, categories, largest files).
/// - [`platform`]: Volume capacity for progress estimates.
/// - [`export`]: JSON and CSV reports.
pub mod analysis;
pub mod export;
pub mod layout;
pub mod model;
pub mod platform;
pub mod scanner;
