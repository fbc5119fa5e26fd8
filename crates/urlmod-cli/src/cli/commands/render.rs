//! `urlmod render <url>`: render a URL in one mode.

use anyhow::{Context, Result};
use urlmod_core::config::UrlmodConfig;
use urlmod_core::{Environment, Mode, UrlModel};

pub fn run_render(url: &str, mode: Mode, cfg: &UrlmodConfig, env: &Environment) -> Result<()> {
    let model = UrlModel::new(Some(url), cfg.url.clone(), env.clone())
        .with_context(|| format!("parse {url}"))?;
    println!("{}", model.get(mode)?);
    Ok(())
}
