//! End-to-end scenarios through the public API.

use serde_json::json;
use urlmod_core::{
    modify, modify_json, Edit, Environment, ModifySpec, StaticRequest, UrlConfig, UrlModel,
};

fn host_only() -> Environment {
    Environment::new(StaticRequest::new("", "site.com", "/"))
}

#[test]
fn render_modes() {
    let env = host_only();
    let url = UrlModel::new(
        Some("http://site.com:8080/?page=2#name"),
        UrlConfig::default(),
        env.clone(),
    )
    .unwrap();
    assert_eq!(url.get_relative().unwrap(), "/?page=2#name");

    let url = UrlModel::new(Some("/?page=2#name"), UrlConfig::default(), env.clone()).unwrap();
    assert_eq!(url.get_absolute().unwrap(), "//site.com/?page=2#name");

    let url =
        UrlModel::new(Some("//site.com:8080/?page=2#name"), UrlConfig::default(), env).unwrap();
    assert_eq!(url.get_short_absolute().unwrap(), "//site.com:8080/?page=2#name");
}

#[test]
fn modify_scenario() {
    let env = host_only();
    let spec = json!(["http://site.com/?foo=bar", "!foo", {"page": 2}, {"#": "name"}]);
    assert_eq!(modify_json(&spec, UrlConfig::default(), &env).unwrap(), "/?page=2#name");

    let typed = ModifySpec::from(vec![
        Edit::positional("http://site.com/?foo=bar"),
        Edit::positional("!foo"),
        Edit::pair("page", 2),
        Edit::pair("#", "name"),
    ]);
    assert_eq!(modify(&typed, UrlConfig::default(), &env).unwrap(), "/?page=2#name");
}

#[test]
fn merge_policy_drops_empty_values() {
    let mut url = UrlModel::new(Some("/"), UrlConfig::default(), host_only()).unwrap();
    url.add_query_params([("view", ""), ("page", "1")]);
    assert_eq!(url.get_relative().unwrap(), "/?page=1");
}

#[test]
fn protect_scenario_with_config_file_environment() {
    let cfg: urlmod_core::config::UrlmodConfig = toml::from_str(
        r#"
        [request]
        url = "https://site.com/"

        [url]
        protect = true
        protect_link = "@warning"

        [aliases]
        warning = "https://site.com/warning/"
        "#,
    )
    .unwrap();
    let env = cfg.environment().unwrap();

    let url = UrlModel::new(Some("https://evil.com/x?a=1"), cfg.url.clone(), env.clone()).unwrap();
    let out = url.get_absolute().unwrap();
    assert!(out.starts_with("https://site.com/warning/?r="), "{out}");

    let url = UrlModel::new(Some("/local"), cfg.url, env).unwrap();
    assert_eq!(url.get_absolute().unwrap(), "https://site.com/local");
}
