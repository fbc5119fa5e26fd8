//! Batch URL edits.
//!
//! An edit list is compiled into instructions before anything runs, so an
//! invalid list fails without partial work. The leading positional item (if
//! it is a URL and not a `!` removal) picks the source; every other
//! instruction applies in order, except `+name` placeholder substitutions,
//! which are collected and applied once after the rest.

mod property;
mod spec;

pub use property::Property;
pub use spec::{Edit, EditValue, ModifySpec};

use std::collections::HashMap;

use crate::config::UrlConfig;
use crate::error::UrlError;
use crate::provider::Environment;
use crate::url_model::{Mode, QueryParams, UrlModel};

const REMOVE_PREFIX: char = '!';
const FRAGMENT_KEY: &str = "#";
const PROPERTY_PREFIX: char = '@';
const PLACEHOLDER_PREFIX: char = '+';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Instruction {
    RemoveQuery,
    RemoveFragment,
    RemoveParam(String),
    SetFragment(String),
    SetProperty(Property, EditValue),
    Placeholder(String, String),
    AddParam(String, EditValue),
}

impl Instruction {
    fn from_positional(value: &str) -> Result<Option<Self>, UrlError> {
        if value.is_empty() {
            return Ok(None);
        }
        match value.strip_prefix(REMOVE_PREFIX) {
            Some("") => Ok(Some(Instruction::RemoveQuery)),
            Some(FRAGMENT_KEY) => Ok(Some(Instruction::RemoveFragment)),
            Some(name) => Ok(Some(Instruction::RemoveParam(name.to_string()))),
            None => Err(UrlError::InvalidModifySpec(format!(
                "positional value {value:?} is only allowed as the first item"
            ))),
        }
    }

    fn from_pair(key: &str, value: &EditValue) -> Result<Self, UrlError> {
        if key == FRAGMENT_KEY {
            let fragment = value.as_text().ok_or_else(|| {
                UrlError::InvalidModifySpec("fragment expects a single value".into())
            })?;
            return Ok(Instruction::SetFragment(fragment));
        }
        if let Some(name) = key.strip_prefix(PROPERTY_PREFIX) {
            let property = Property::from_name(name)?;
            property.validate(value)?;
            return Ok(Instruction::SetProperty(property, value.clone()));
        }
        if let Some(name) = key.strip_prefix(PLACEHOLDER_PREFIX) {
            let replacement = value.as_text().ok_or_else(|| {
                UrlError::InvalidModifySpec(format!("placeholder {name:?} expects a single value"))
            })?;
            return Ok(Instruction::Placeholder(name.to_string(), replacement));
        }
        if key.is_empty() {
            return Err(UrlError::InvalidModifySpec("empty instruction key".into()));
        }
        Ok(Instruction::AddParam(key.to_string(), value.clone()))
    }
}

/// Splits off the source URL (if any) and compiles the rest.
fn compile(
    edits: &[Edit],
    allow_source: bool,
) -> Result<(Option<String>, Vec<Instruction>), UrlError> {
    let mut rest = edits;
    let mut source = None;
    if let Some((Edit::Positional(first), tail)) = edits.split_first() {
        let first = first.as_deref().unwrap_or_default();
        if !first.starts_with(REMOVE_PREFIX) {
            if !first.is_empty() && !allow_source {
                return Err(UrlError::InvalidModifySpec(format!(
                    "source URL {first:?} not allowed when modifying the current URL"
                )));
            }
            source = Some(first.to_string()).filter(|s| !s.is_empty());
            rest = tail;
        }
    }

    let mut instructions = Vec::with_capacity(rest.len());
    for edit in rest {
        let instruction = match edit {
            Edit::Positional(value) => {
                Instruction::from_positional(value.as_deref().unwrap_or_default())?
            }
            Edit::Pair(key, value) => Some(Instruction::from_pair(key, value)?),
        };
        instructions.extend(instruction);
    }
    Ok((source, instructions))
}

fn run(
    source: Option<&str>,
    instructions: Vec<Instruction>,
    config: UrlConfig,
    env: &Environment,
) -> Result<String, UrlError> {
    let mut model = UrlModel::new(source, config, env.clone())?;
    let mut mode = Mode::default();
    let mut placeholders = HashMap::new();

    for instruction in instructions {
        tracing::trace!(?instruction, "apply modify instruction");
        match instruction {
            Instruction::RemoveQuery => {
                model.remove_query();
            }
            Instruction::RemoveFragment => {
                model.remove_fragment();
            }
            Instruction::RemoveParam(name) => {
                model.remove_query_params([name]);
            }
            Instruction::SetFragment(fragment) => {
                model.set_fragment(&fragment);
            }
            Instruction::SetProperty(property, value) => {
                if let Some(selected) = property.apply(&mut model, &value)? {
                    mode = selected;
                }
            }
            Instruction::Placeholder(name, value) => {
                placeholders.insert(name, value);
            }
            Instruction::AddParam(key, value) => {
                let mut params = QueryParams::new();
                params.insert(key, value.to_query_value());
                model.add_query_params(params);
            }
        }
    }

    model.replace(&placeholders);
    model.get(mode)
}

/// Applies `spec` and renders the result.
///
/// A bare URL renders relative. For an edit list, the render mode is the one
/// selected by `@scheme`, relative otherwise.
pub fn modify(
    spec: &ModifySpec,
    config: UrlConfig,
    env: &Environment,
) -> Result<String, UrlError> {
    match spec {
        ModifySpec::Url(url) => {
            UrlModel::new(Some(url.as_str()), config, env.clone())?.get(Mode::default())
        }
        ModifySpec::Edits(edits) => {
            let (source, instructions) = compile(edits, true)?;
            run(source.as_deref(), instructions, config, env)
        }
    }
}

/// Like [`modify`] with a JSON spec (string or array).
pub fn modify_json(
    spec: &serde_json::Value,
    config: UrlConfig,
    env: &Environment,
) -> Result<String, UrlError> {
    modify(&ModifySpec::try_from(spec)?, config, env)
}

/// Applies `edits` to the current URL. A leading source URL is rejected.
pub fn modify_current(
    edits: &[Edit],
    config: UrlConfig,
    env: &Environment,
) -> Result<String, UrlError> {
    let (_, instructions) = compile(edits, false)?;
    run(None, instructions, config, env)
}

#[cfg(test)]
mod tests;
