//! Loading of compiled gettext catalogs and evaluation of plural-forms rules.
//!
//! A [`TextDomain`] holds the translations for one locale: singular messages
//! and ordered plural-variant lists, together with the [`PluralRule`] that
//! selects among variants for a given count. Catalogs are produced by the
//! loaders in [`loader`]: [`loader::Gettext`] decodes compiled `.mo` files,
//! [`loader::Structured`] reads already-materialized JSON or YAML mappings.
//!
//! ```
//! use textdomain::PluralRule;
//!
//! let rule: PluralRule = "nplurals=2; plural=n!=1".parse().unwrap();
//! assert_eq!(rule.evaluate(1).unwrap(), 0);
//! assert_eq!(rule.evaluate(4).unwrap(), 1);
//! ```

mod error;
pub mod loader;
mod plural;
mod textdomain;

pub use error::{Error, Result};
pub use loader::Loader;
pub use plural::ast::{Ast, BinaryOp};
pub use plural::{ExpressionParser, PluralRule};
pub use textdomain::{TextDomain, Translation};
