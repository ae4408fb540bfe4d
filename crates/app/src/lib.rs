//! # spinkit-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** the host document must implement (driven port):
//!   - `Document` — selection, mutation, signal binding and markup parsing
//! - Define the **driving port** as a use-case struct:
//!   - `SpinnerWidget` — attach a spinner to a container, detach it on signal
//!
//! ## Dependency rule
//! Depends on `spinkit-domain` only (plus `tracing` for logs).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
