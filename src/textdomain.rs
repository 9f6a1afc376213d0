//! The message catalog: translations for one locale and text domain.
use std::collections::HashMap;

use once_cell::unsync::OnceCell;

use crate::plural::PluralRule;

/// The payload stored for one message id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Translation {
  /// A single translated string.
  Singular(String),
  /// An ordered list of plural variants, variant 0 first.
  Plural(Vec<String>),
}

impl Translation {
  /// The singular text, if this is a singular translation.
  pub fn singular(&self) -> Option<&str> {
    match self {
      Translation::Singular(text) => Some(text),
      Translation::Plural(_) => None,
    }
  }

  /// The plural variant at `index`, if present.
  pub fn variant(&self, index: usize) -> Option<&str> {
    match self {
      Translation::Singular(text) if index == 0 => Some(text),
      Translation::Singular(_) => None,
      Translation::Plural(variants) => variants.get(index).map(String::as_str),
    }
  }
}

/// A set of message translations with an attached plural rule.
///
/// Loaders populate a text domain in full and hand it over; downstream
/// consumers treat it as read-only. The plural rule defaults to
/// `nplurals=2; plural=n==1` when no declaration was loaded.
#[derive(Clone, Debug, Default)]
pub struct TextDomain {
  messages: HashMap<String, Translation>,
  plural_rule: OnceCell<PluralRule>,
}

impl TextDomain {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores a translation under a message id, replacing any previous entry.
  pub fn insert(&mut self, id: impl Into<String>, translation: Translation) {
    self.messages.insert(id.into(), translation);
  }

  /// Looks up the translation for a message id.
  pub fn get(&self, id: &str) -> Option<&Translation> {
    self.messages.get(id)
  }

  /// Removes and returns the translation for a message id.
  pub fn remove(&mut self, id: &str) -> Option<Translation> {
    self.messages.remove(id)
  }

  pub fn len(&self) -> usize {
    self.messages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }

  /// Iterates over all message ids and their translations, in no particular
  /// order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Translation)> {
    self.messages.iter().map(|(id, translation)| (id.as_str(), translation))
  }

  /// The plural rule of this catalog, constructing the default rule on first
  /// access if none was set.
  pub fn plural_rule(&self) -> &PluralRule {
    self.plural_rule.get_or_init(PluralRule::default)
  }

  /// Attaches a plural rule, replacing the current one.
  pub fn set_plural_rule(&mut self, rule: PluralRule) {
    self.plural_rule = OnceCell::with_value(rule);
  }

  /// Selects the plural variant index for a count using the attached rule.
  pub fn plural_index(&self, number: i64) -> crate::error::Result<usize> {
    self.plural_rule().evaluate(number)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn stores_and_returns_translations() {
    let mut text_domain = TextDomain::new();
    text_domain.insert("Message 1", Translation::Singular("Nachricht 1".to_string()));
    text_domain.insert(
      "Message 10",
      Translation::Plural(vec!["Nachricht 10 - 0".to_string(), "Nachricht 10 - 1".to_string()]),
    );

    assert_eq!(text_domain.len(), 2);
    assert_eq!(text_domain.get("Message 1").and_then(Translation::singular), Some("Nachricht 1"));
    assert_eq!(text_domain.get("Message 10").and_then(|t| t.variant(1)), Some("Nachricht 10 - 1"));
    assert_eq!(text_domain.get("Message 2"), None);
  }

  #[test]
  fn plural_rule_defaults_lazily() {
    let text_domain = TextDomain::new();
    let rule = text_domain.plural_rule();
    assert_eq!(rule.num_plurals(), 2);
    // the documented default maps a count of one to index 1
    assert_eq!(rule.evaluate(1).unwrap(), 1);
    assert_eq!(rule.evaluate(2).unwrap(), 0);
  }

  #[test]
  fn set_plural_rule_replaces_the_default() {
    let mut text_domain = TextDomain::new();
    // touch the default first; a later set must still win
    assert_eq!(text_domain.plural_rule().num_plurals(), 2);

    text_domain.set_plural_rule("nplurals=1; plural=0".parse().unwrap());
    assert_eq!(text_domain.plural_rule().num_plurals(), 1);
    assert_eq!(text_domain.plural_index(5).unwrap(), 0);
  }

  #[test]
  fn singular_translations_expose_variant_zero_only() {
    let translation = Translation::Singular("Nachricht".to_string());
    assert_eq!(translation.variant(0), Some("Nachricht"));
    assert_eq!(translation.variant(1), None);
  }
}
