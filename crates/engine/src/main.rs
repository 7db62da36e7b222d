//! Outfitter Engine - Main entry point.
//!
//! Resolves the configured class and background against a directory of JSON
//! item packs and prints the equipment section and its default collection.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outfitter_domain::{CollectOptions, SelectionContext, SelectionRef};
use outfitter_engine::infrastructure::{config::EngineConfig, json_source::JsonItemSource};
use outfitter_engine::{App, EquipmentSection, Ports};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outfitter_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Outfitter Engine");

    let config = EngineConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(content_path = %config.content_path.display(), "Reading item packs");

    let source = Arc::new(JsonItemSource::new(config.content_path.clone()));
    let app = App::new(Ports::standard(source), &config);

    let ctx = selection_context(&config);
    let (data, form) = match app.render_equipment_section(&ctx).await {
        EquipmentSection::Ready { data, form } => (data, form),
        EquipmentSection::Failed { message_key, error } => {
            anyhow::bail!("{}: {}", message_key, error);
        }
    };

    let options = CollectOptions::default();
    let selections = app.collect_selections(&form, options).await;
    let currency = app.collect_currency(&form, options);
    let wealth = app.collect_wealth(&form).await;
    tracing::info!(
        selections = selections.len(),
        currency = currency.len(),
        wealth = wealth.len(),
        "Collected default selection"
    );

    let report = serde_json::json!({
        "equipment": data,
        "form": form,
        "selections": selections,
        "currency": currency,
        "wealth": wealth,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    Ok(())
}

fn selection_context(config: &EngineConfig) -> SelectionContext {
    let mut ctx = SelectionContext::default();
    if let Some(uuid) = &config.class_uuid {
        ctx = ctx.with_class(SelectionRef::new(uuid.as_str(), uuid.as_str(), uuid.clone()));
    }
    if let Some(uuid) = &config.background_uuid {
        ctx = ctx.with_background(SelectionRef::new(uuid.as_str(), uuid.as_str(), uuid.clone()));
    }
    ctx
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
