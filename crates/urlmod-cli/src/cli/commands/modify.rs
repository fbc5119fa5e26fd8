//! `urlmod modify <json>`: apply a modify spec.

use anyhow::{Context, Result};
use urlmod_core::config::UrlmodConfig;
use urlmod_core::{modify_json, Environment};

pub fn run_modify(spec: &str, cfg: &UrlmodConfig, env: &Environment) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(spec).context("modify spec is not valid JSON")?;
    let url = modify_json(&value, cfg.url.clone(), env)?;
    println!("{url}");
    Ok(())
}
