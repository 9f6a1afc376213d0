//! Plural rules: `nplurals=<count>; plural=<expression>`.
pub mod ast;
mod lexer;
mod parser;

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use ast::{Ast, BinaryOp};
pub use parser::ExpressionParser;

static NPLURALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"nplurals=(?P<nplurals>\d+)").unwrap());
static PLURAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"plural=(?P<plural>[^;\n]+)").unwrap());

/// A plural rule: how many plural forms a language declares and which
/// expression selects among them.
///
/// Immutable once constructed. [`PluralRule::evaluate`] always returns an
/// index within `[0, num_plurals)` or an error, never a silent out-of-range
/// value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluralRule {
  num_plurals: usize,
  ast: Ast,
}

impl PluralRule {
  /// The declared number of plural forms.
  pub fn num_plurals(&self) -> usize {
    self.num_plurals
  }

  /// Evaluates the rule for a count and returns the plural variant index.
  ///
  /// The magnitude is taken as the absolute value of `number`, so negative
  /// counts select the same variant as their positive counterparts.
  /// `i64::MIN`, whose magnitude is not representable, is clamped to
  /// `i64::MAX`.
  pub fn evaluate(&self, number: i64) -> Result<usize> {
    let result = self.ast.evaluate(number.checked_abs().unwrap_or(i64::MAX))?;
    if result < 0 || result as u64 >= self.num_plurals as u64 {
      return Err(Error::Range { result, num_plurals: self.num_plurals });
    }
    Ok(result as usize)
  }
}

impl FromStr for PluralRule {
  type Err = Error;

  /// Parses a `Plural-Forms` declaration, e.g.
  /// `nplurals=3; plural=(n==0 ? 0 : (n==1 ? 1 : 2))`.
  ///
  /// Both fields must be present; the expression value runs until `;` or the
  /// end of the field.
  fn from_str(declaration: &str) -> Result<Self> {
    let num_plurals = NPLURALS
      .captures(declaration)
      .and_then(|captures| captures["nplurals"].parse::<usize>().ok())
      .ok_or_else(|| Error::Parse(format!("unknown or invalid plural rule: {declaration}")))?;
    if num_plurals == 0 {
      return Err(Error::Parse(format!("nplurals must be positive: {declaration}")));
    }

    let expression = PLURAL
      .captures(declaration)
      .map(|captures| captures["plural"].to_string())
      .ok_or_else(|| Error::Parse(format!("unknown or invalid plural rule: {declaration}")))?;

    let ast = ExpressionParser::new().parse(&expression)?;
    Ok(Self { num_plurals, ast })
  }
}

impl Default for PluralRule {
  /// The rule attached to catalogs that carry no plural-forms declaration:
  /// `nplurals=2; plural=n==1`. Note the sense: a count of one selects
  /// index 1, every other count selects index 0.
  fn default() -> Self {
    Self { num_plurals: 2, ast: Ast::binary(BinaryOp::Eq, Ast::N, Ast::Number(1)) }
  }
}
