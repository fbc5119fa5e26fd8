//! Error type shared by the URL model, the modify engine and the collaborators.

use thiserror::Error;

/// Failures surfaced by the library. Nothing is swallowed: either an
/// operation completes or one of these reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The source string could not be split into URL components.
    #[error("malformed URL: {input:?}")]
    MalformedUrl { input: String },

    /// The modify entry point got something that is neither a URL nor an edit list,
    /// or an edit list item it cannot interpret.
    #[error("invalid modify spec: {0}")]
    InvalidModifySpec(String),

    /// Strict alias resolution found no entry for the name.
    #[error("unknown alias: @{0}")]
    UnknownAlias(String),

    /// A textual component value that cannot be stored (e.g. a non-numeric port).
    #[error("invalid value {value:?} for URL component {component}")]
    InvalidComponent { component: String, value: String },
}

impl UrlError {
    pub(crate) fn malformed(input: &str) -> Self {
        UrlError::MalformedUrl {
            input: input.to_string(),
        }
    }

    pub(crate) fn invalid_component(component: impl Into<String>, value: &str) -> Self {
        UrlError::InvalidComponent {
            component: component.into(),
            value: value.to_string(),
        }
    }
}
