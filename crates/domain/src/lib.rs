//! # spinkit-domain
//!
//! Pure domain model for the spinkit loading indicator.
//!
//! ## Responsibilities
//! - **Options**: caller-supplied overrides, deserializable from JSON or TOML
//! - **Config**: the immutable defaults record and the per-call resolved value
//! - **Placement**: the mutually exclusive insertion strategies and their priority
//! - **Errors**: the typed error taxonomy shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! The host document is expressed as a trait in the `app` crate (port).

pub mod error;

pub mod config;
pub mod options;
pub mod placement;
