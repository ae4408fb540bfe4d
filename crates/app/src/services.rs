//! Application services — use-case implementations.
//!
//! Each service accepts port trait implementations via generic parameters,
//! keeping this layer decoupled from concrete adapters.

pub mod spinner_widget;
