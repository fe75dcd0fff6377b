//! Shared command utilities
//!
//! This module contains:
//! - `AppContext` - Resolved global options passed to every command
//! - `load_config` - Engine config resolution
//! - `read_json` / `print_json` - JSON file input and stdout output
//! - `open_advisor` - Advisor wired to the file-backed history

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bases_core::{Account, Advisor, EngineConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::FileHistory;

/// Global options resolved once in main
pub struct AppContext {
    pub config: EngineConfig,
    pub history_path: PathBuf,
    pub session: String,
    pub json: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    EngineConfig::load(path).context("Failed to load engine config")
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn read_account(path: &Path) -> Result<Account> {
    read_json(path).with_context(|| format!("Failed to load account from {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

pub fn open_history(ctx: &AppContext) -> Arc<FileHistory> {
    Arc::new(FileHistory::open(&ctx.history_path))
}

pub fn open_advisor(ctx: &AppContext) -> Result<Advisor> {
    Advisor::new(&ctx.config, open_history(ctx), ctx.session.clone())
        .context("Failed to build recommendation engine")
}

/// Format a value that may be the +inf sentinel
pub fn fmt_months(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{:.1}", value)
    }
}

pub fn fmt_pct(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{:.1}%", value)
    }
}
