//! CLI for the urlmod URL model.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use urlmod_core::config::{self, RequestConfig, UrlmodConfig};
use urlmod_core::Mode;

use commands::{run_completions, run_modify, run_parse, run_render};

/// Top-level CLI for urlmod.
#[derive(Debug, Parser)]
#[command(name = "urlmod")]
#[command(about = "urlmod: parse, edit and render URLs", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/urlmod/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// URL of the current request (overrides [request] in the config).
    #[arg(long, global = true, value_name = "URL")]
    pub current: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Parse a URL and render it in the given mode.
    Render {
        /// URL to render; `@name` is resolved through [aliases].
        url: String,

        /// Output form: rel, abs, short_abs, http or https.
        #[arg(long, default_value = "abs")]
        mode: Mode,
    },

    /// Apply a JSON modify spec (a URL string or an edit list) and print the result.
    Modify {
        /// e.g. '["http://site.com/?foo=bar", "!foo", {"page": 2}]'
        spec: String,
    },

    /// Print the components of a URL as JSON.
    Parse {
        /// URL to decompose.
        url: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            return run_completions(shell);
        }

        let mut cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        apply_overrides(&mut cfg, &cli);
        tracing::debug!("loaded config: {:?}", cfg);
        let env = cfg.environment()?;

        match cli.command {
            CliCommand::Render { url, mode } => run_render(&url, mode, &cfg, &env)?,
            CliCommand::Modify { spec } => run_modify(&spec, &cfg, &env)?,
            CliCommand::Parse { url } => run_parse(&url, &cfg, &env)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

fn apply_overrides(cfg: &mut UrlmodConfig, cli: &Cli) {
    if let Some(current) = &cli.current {
        cfg.request = RequestConfig {
            url: current.clone(),
            scheme: None,
            host: None,
        };
    }
}

#[cfg(test)]
mod tests;
