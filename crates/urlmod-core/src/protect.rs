//! Outbound-link guard.
//!
//! When enabled, an absolute render whose host is not on the allow-list is
//! replaced by the configured warning page carrying the original URL in the
//! `r` query parameter.

use crate::config::UrlConfig;
use crate::error::UrlError;
use crate::modify::{modify, Edit, ModifySpec};
use crate::url_model::UrlModel;

/// Query parameter on the warning page that carries the original URL.
pub const REDIRECT_PARAM: &str = "r";

/// Returns `rendered` unchanged when protection is off, no warning page is
/// configured, or `host` is allowed; otherwise the warning-page URL.
pub(crate) fn guard(
    model: &UrlModel,
    rendered: String,
    host: Option<&str>,
) -> Result<String, UrlError> {
    let config = model.config();
    if !config.protect {
        return Ok(rendered);
    }
    let Some(link) = config.protect_link.as_deref().filter(|l| !l.is_empty()) else {
        return Ok(rendered);
    };

    let allowed = allowed_domains(model)?;
    if host.is_some_and(|h| allowed.iter().any(|d| d == h)) {
        return Ok(rendered);
    }

    tracing::warn!(
        host = host.unwrap_or_default(),
        target = %rendered,
        "link outside allowed domains rerouted through warning page"
    );
    let spec = ModifySpec::Edits(vec![
        Edit::positional(link),
        Edit::pair("@scheme", "abs"),
        Edit::pair(REDIRECT_PARAM, rendered),
    ]);
    modify(&spec, UrlConfig::default(), model.environment())
}

/// Configured domains (alias-resolved); the current request host when none are configured.
fn allowed_domains(model: &UrlModel) -> Result<Vec<String>, UrlError> {
    let env = model.environment();
    let configured = &model.config().allowed_domains;
    if configured.is_empty() {
        let host = env.request.host();
        let bare = match host.rsplit_once(':') {
            Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name.to_string(),
            _ => host,
        };
        return Ok(vec![bare]);
    }
    configured.iter().map(|d| env.resolve_alias(d)).collect()
}
