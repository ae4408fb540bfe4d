//! # spinkit — demo runner
//!
//! Composition root that wires the widget to a document and shows one
//! attach/detach cycle.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Build an in-memory document from the configured page
//! - Attach a spinner to the configured container and print the page
//! - Fire the detach signal and print the page again
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no widget logic belongs here.

mod config;

use anyhow::Context;
use spinkit_adapter_dom_memory::MemoryDocument;
use spinkit_app::services::spinner_widget::SpinnerWidget;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let html = config.page_html().context("reading page")?;
    let mut doc = MemoryDocument::parse(&html);
    let selection = doc.select(&config.page.container);
    tracing::info!(
        container = %config.page.container,
        matches = selection.len(),
        "page loaded"
    );

    let widget = SpinnerWidget::default();
    widget
        .attach(&mut doc, &selection, config.spinner.clone())
        .context("attaching spinner")?;
    println!("{}", doc.to_html());

    if widget.detach(&mut doc, &selection) {
        tracing::info!("spinner detached");
    }
    println!("{}", doc.to_html());

    Ok(())
}
