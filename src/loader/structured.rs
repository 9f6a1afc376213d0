//! Loader for catalogs kept as structured JSON or YAML mappings.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use color_eyre::owo_colors::OwoColorize;
use log::{debug, trace};
use serde_json::Value;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::loader::Loader;
use crate::textdomain::{TextDomain, Translation};

/// Reads catalogs from nested-mapping resources.
///
/// The resource maps message ids to either a single string or an ordered
/// list of plural variants. An optional entry under the empty key may carry
/// a `plural_forms` declaration; it seeds the catalog's plural rule and is
/// excluded from the returned catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct Structured;

impl Loader for Structured {
  #[instrument(skip(self), err)]
  fn load(&self, filename: &Path) -> Result<TextDomain> {
    trace!("Reading catalog: {:?}", filename.yellow());
    let file = File::open(filename)
      .map_err(|_| Error::InvalidArgument(format!("could not open file {} for reading", filename.display())))?;
    let reader = BufReader::new(file);

    let resource: Value = if filename.extension().is_some_and(|ext| ext == "yml" || ext == "yaml") {
      serde_yaml_ng::from_reader(reader)
        .map_err(|_| Error::InvalidArgument(format!("could not parse {} as a catalog", filename.display())))?
    } else {
      serde_json::from_reader(reader)
        .map_err(|_| Error::InvalidArgument(format!("could not parse {} as a catalog", filename.display())))?
    };

    let text_domain = Self::from_value(&resource)?;
    debug!("Loaded {} messages from {:?}", text_domain.len().cyan(), filename.yellow());
    Ok(text_domain)
  }
}

impl Structured {
  /// Builds a catalog from an already-materialized mapping.
  pub fn from_value(resource: &Value) -> Result<TextDomain> {
    let Some(entries) = resource.as_object() else {
      return Err(Error::InvalidArgument(format!("expected a mapping, but received {}", value_kind(resource))));
    };

    let mut text_domain = TextDomain::new();
    for (id, value) in entries {
      if id.is_empty() {
        apply_headers(&mut text_domain, value)?;
        continue;
      }

      match value {
        Value::String(text) => {
          text_domain.insert(id.clone(), Translation::Singular(text.clone()));
        },
        Value::Array(items) => {
          let variants = items
            .iter()
            .map(|item| {
              item.as_str().map(str::to_string).ok_or_else(|| {
                Error::InvalidArgument(format!("plural variants of '{id}' must all be strings"))
              })
            })
            .collect::<Result<Vec<_>>>()?;
          text_domain.insert(id.clone(), Translation::Plural(variants));
        },
        other => {
          return Err(Error::InvalidArgument(format!(
            "translation for '{id}' must be a string or a list of strings, but received {}",
            value_kind(other)
          )));
        },
      }
    }

    Ok(text_domain)
  }
}

/// Handles the entry under the empty key: a mapping that may declare
/// `plural_forms`.
fn apply_headers(text_domain: &mut TextDomain, headers: &Value) -> Result<()> {
  let Some(headers) = headers.as_object() else {
    return Err(Error::InvalidArgument(format!(
      "the header entry must be a mapping, but received {}",
      value_kind(headers)
    )));
  };

  if let Some(declaration) = headers.get("plural_forms") {
    let declaration = declaration.as_str().ok_or_else(|| {
      Error::InvalidArgument(format!("plural_forms must be a string, but received {}", value_kind(declaration)))
    })?;
    trace!("Found plural_forms header: {}", declaration.cyan());
    text_domain.set_plural_rule(declaration.parse()?);
  }

  Ok(())
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a list",
    Value::Object(_) => "a mapping",
  }
}
