//! `@name` property assignments.

use crate::error::UrlError;
use crate::url_model::{parse_port, Component, Mode, UrlModel};

use super::spec::EditValue;

/// Properties settable through `@name` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Scheme,
    Host,
    Port,
    User,
    Pass,
    Path,
    Query,
    Fragment,
    PrefixPath,
    PostfixPath,
    Protect,
    ProtectLink,
    AllowedDomains,
    Csrf,
    Strip,
    Dummy,
}

const TABLE: [(&str, Property); 16] = [
    ("scheme", Property::Scheme),
    ("host", Property::Host),
    ("port", Property::Port),
    ("user", Property::User),
    ("pass", Property::Pass),
    ("path", Property::Path),
    ("query", Property::Query),
    ("fragment", Property::Fragment),
    ("prefixPath", Property::PrefixPath),
    ("postfixPath", Property::PostfixPath),
    ("protect", Property::Protect),
    ("protectLink", Property::ProtectLink),
    ("allowedDomains", Property::AllowedDomains),
    ("csrf", Property::Csrf),
    ("strip", Property::Strip),
    ("dummy", Property::Dummy),
];

impl Property {
    pub fn from_name(name: &str) -> Result<Self, UrlError> {
        TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| *p)
            .ok_or_else(|| UrlError::InvalidModifySpec(format!("unknown property @{name}")))
    }

    /// Checks the value shape up front so a bad list fails before any edit runs.
    pub fn validate(self, value: &EditValue) -> Result<(), UrlError> {
        match (self, value) {
            (Property::AllowedDomains, _) => Ok(()),
            (Property::Port, v) => parse_port(&self.text(v)?).map(|_| ()),
            (_, v) => self.text(v).map(|_| ()),
        }
    }

    fn text(self, value: &EditValue) -> Result<String, UrlError> {
        value.as_text().ok_or_else(|| {
            UrlError::InvalidModifySpec(format!("@{} expects a single value", self.name()))
        })
    }

    fn name(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, p)| *p == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Applies the assignment. Returns the render mode when `@scheme` selects one.
    pub fn apply(self, model: &mut UrlModel, value: &EditValue) -> Result<Option<Mode>, UrlError> {
        match self {
            Property::Scheme => {
                let text = self.text(value)?;
                return Ok(Some(match text.parse::<Mode>() {
                    Ok(mode @ (Mode::Relative | Mode::Absolute | Mode::ShortAbsolute)) => mode,
                    _ => {
                        model.set_scheme(&text);
                        Mode::Absolute
                    }
                }));
            }
            Property::Host => {
                model.set_host(&self.text(value)?);
            }
            Property::Port => {
                model.set_component(Component::Port, &self.text(value)?)?;
            }
            Property::User => {
                model.set_user(&self.text(value)?);
            }
            Property::Pass => {
                model.set_pass(&self.text(value)?);
            }
            Property::Path => {
                model.set_path(&self.text(value)?);
            }
            Property::Query => {
                model.set_query(self.text(value)?);
            }
            Property::Fragment => {
                model.set_fragment(&self.text(value)?);
            }
            Property::PrefixPath => {
                model.set_prefix_path(&self.text(value)?);
            }
            Property::PostfixPath => {
                model.set_postfix_path(&self.text(value)?);
            }
            Property::Protect => model.config_mut().protect = value.as_bool(),
            Property::ProtectLink => {
                let link = self.text(value)?;
                model.config_mut().protect_link = Some(link).filter(|l| !l.is_empty());
            }
            Property::AllowedDomains => {
                model.config_mut().allowed_domains = match value {
                    EditValue::List(items) => items.clone(),
                    EditValue::Null => Vec::new(),
                    other => other.as_text().into_iter().filter(|d| !d.is_empty()).collect(),
                };
            }
            Property::Csrf => model.config_mut().csrf = value.as_bool(),
            Property::Strip => model.config_mut().strip = value.as_bool(),
            Property::Dummy => model.config_mut().dummy = self.text(value)?,
        }
        Ok(None)
    }
}
