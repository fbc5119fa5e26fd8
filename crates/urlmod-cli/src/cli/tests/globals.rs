//! Tests for global flags and config overrides.

use crate::cli::{apply_overrides, Cli};
use clap::Parser;
use std::path::Path;
use urlmod_core::config::UrlmodConfig;

#[test]
fn cli_parse_globals_after_subcommand() {
    let cli = Cli::try_parse_from([
        "urlmod",
        "render",
        "/",
        "--current",
        "https://site.com/a",
        "--config",
        "/tmp/urlmod.toml",
    ])
    .unwrap();
    assert_eq!(cli.current.as_deref(), Some("https://site.com/a"));
    assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/urlmod.toml")));
}

#[test]
fn cli_parse_without_globals() {
    let cli = Cli::try_parse_from(["urlmod", "parse", "/"]).unwrap();
    assert!(cli.current.is_none());
    assert!(cli.config.is_none());
}

#[test]
fn current_override_replaces_request_section() {
    let cli = Cli::try_parse_from(["urlmod", "--current", "https://other.com:8443/x", "parse", "/"])
        .unwrap();
    let mut cfg = UrlmodConfig::default();
    cfg.request.host = Some("stale.com".into());
    apply_overrides(&mut cfg, &cli);
    assert_eq!(cfg.request.url, "https://other.com:8443/x");
    assert!(cfg.request.host.is_none());

    let env = cfg.environment().unwrap();
    assert_eq!(env.request.host(), "other.com:8443");
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["urlmod"]).is_err());
}
