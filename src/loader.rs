//! Catalog loaders.
mod gettext;
mod structured;

use std::path::Path;

use crate::error::Result;
use crate::textdomain::TextDomain;

pub use gettext::Gettext;
pub use structured::Structured;

/// A source of translation catalogs addressed by file path.
///
/// Implementations populate a [`TextDomain`] in full and return it only on
/// success; no partial catalog is ever observable.
pub trait Loader {
  fn load(&self, filename: &Path) -> Result<TextDomain>;
}
