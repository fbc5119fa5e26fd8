//! `urlmod parse <url>`: dump components as JSON.

use anyhow::Result;
use urlmod_core::config::UrlmodConfig;
use urlmod_core::{Environment, UrlModel};

pub fn run_parse(url: &str, cfg: &UrlmodConfig, env: &Environment) -> Result<()> {
    let model = UrlModel::new(Some(url), cfg.url.clone(), env.clone())?;
    let json = serde_json::to_string_pretty(&model.to_plain_object())?;
    println!("{json}");
    Ok(())
}
