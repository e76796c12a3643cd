// crates/dndltr-regress-cli/src/lib.rs
// ============================================================================
// Module: dndltr Regression CLI Library
// Description: Shared helpers for the `dndltr-regress` binary.
// Purpose: Expose the message catalog, console reporter, and logging setup.
// Dependencies: dndltr-regress-core, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Library half of the CLI crate. The binary in `main.rs` owns argument
//! parsing and dispatch; everything it prints is rendered here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod console;
pub mod i18n;
pub mod logging;

#[cfg(test)]
mod tests;
