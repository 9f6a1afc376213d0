//! Loader for compiled gettext (`.mo`) catalogs.
use std::fs;
use std::path::Path;

use color_eyre::owo_colors::OwoColorize;
use log::{debug, trace};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::loader::Loader;
use crate::textdomain::{TextDomain, Translation};

const MAGIC_BIG_ENDIAN: [u8; 4] = [0x95, 0x04, 0x12, 0xde];
const MAGIC_LITTLE_ENDIAN: [u8; 4] = [0xde, 0x12, 0x04, 0x95];

/// Reads compiled gettext catalogs.
///
/// The file is buffered in full and decoded through a bounds-checked cursor,
/// so a truncated or corrupted catalog fails cleanly instead of reading out
/// of bounds. Only major format revisions 0 and 1 are accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gettext;

impl Loader for Gettext {
  #[instrument(skip(self), err)]
  fn load(&self, filename: &Path) -> Result<TextDomain> {
    trace!("Reading catalog: {:?}", filename.yellow());
    let data = fs::read(filename)
      .map_err(|_| Error::InvalidArgument(format!("could not open file {} for reading", filename.display())))?;
    let text_domain = Self::parse(&data)?;
    debug!("Loaded {} messages from {:?}", text_domain.len().cyan(), filename.yellow());
    Ok(text_domain)
  }
}

impl Gettext {
  /// Decodes a catalog from an in-memory `.mo` image.
  pub fn parse(data: &[u8]) -> Result<TextDomain> {
    let mut reader = MoReader::new(data)?;

    // Only major revisions 0 and 1 are known.
    let major_revision = reader.read_u32()? >> 16;
    if major_revision != 0 && major_revision != 1 {
      return Err(Error::InvalidArgument(format!("unknown major revision {major_revision}")));
    }

    let num_strings = reader.read_u32()? as usize;
    let original_table_offset = reader.read_u32()? as usize;
    let translation_table_offset = reader.read_u32()? as usize;

    // Size and offset of the hash table follow, but we have no need for it.
    reader.seek(original_table_offset);
    let original_table = reader.read_u32_list(2 * num_strings)?;
    reader.seek(translation_table_offset);
    let translation_table = reader.read_u32_list(2 * num_strings)?;

    let mut text_domain = TextDomain::new();
    for current in 0..num_strings {
      let original_size = original_table[current * 2] as usize;
      let original_offset = original_table[current * 2 + 1] as usize;
      let translation_size = translation_table[current * 2] as usize;
      let translation_offset = translation_table[current * 2 + 1] as usize;

      let originals = if original_size > 0 {
        split_nul(reader.slice(original_offset, original_size)?)?
      } else {
        vec![String::new()]
      };

      if translation_size == 0 {
        continue;
      }
      let translations = split_nul(reader.slice(translation_offset, translation_size)?)?;

      if originals.len() > 1 && translations.len() > 1 {
        // A plural entry: the first original keys the ordered variant list,
        // the remaining originals are registered as empty placeholders.
        let mut originals = originals.into_iter();
        if let Some(id) = originals.next() {
          text_domain.insert(id, Translation::Plural(translations));
        }
        for id in originals {
          text_domain.insert(id, Translation::Singular(String::new()));
        }
      } else {
        let id = originals.into_iter().next().unwrap_or_default();
        let translation = translations.into_iter().next().unwrap_or_default();
        text_domain.insert(id, Translation::Singular(translation));
      }
    }

    apply_headers(&mut text_domain)?;

    Ok(text_domain)
  }
}

/// Parses the pseudo-entry under the empty message id, wires up the
/// `Plural-Forms` header if present and strips the entry from the catalog.
fn apply_headers(text_domain: &mut TextDomain) -> Result<()> {
  let Some(entry) = text_domain.remove("") else {
    return Ok(());
  };
  let Some(raw_headers) = entry.variant(0) else {
    return Ok(());
  };

  for raw_header in raw_headers.trim().lines() {
    let Some((name, content)) = raw_header.split_once(':') else {
      continue;
    };
    if name.trim().eq_ignore_ascii_case("plural-forms") {
      trace!("Found plural-forms header: {}", content.trim().cyan());
      text_domain.set_plural_rule(content.parse()?);
    }
  }

  Ok(())
}

/// Splits a message on NUL bytes into its parts.
fn split_nul(bytes: &[u8]) -> Result<Vec<String>> {
  bytes
    .split(|&byte| byte == 0)
    .map(|part| {
      String::from_utf8(part.to_vec())
        .map_err(|_| Error::InvalidArgument("catalog contains a message that is not valid UTF-8".to_string()))
    })
    .collect()
}

/// Cursor over a fully buffered catalog image.
struct MoReader<'a> {
  data: &'a [u8],
  position: usize,
  little_endian: bool,
}

impl<'a> MoReader<'a> {
  /// Detects the byte order from the magic number and positions the cursor
  /// after it.
  fn new(data: &'a [u8]) -> Result<Self> {
    let magic = data.get(..4).ok_or_else(not_a_catalog)?;
    let little_endian = if magic == MAGIC_BIG_ENDIAN {
      false
    } else if magic == MAGIC_LITTLE_ENDIAN {
      true
    } else {
      return Err(not_a_catalog());
    };
    Ok(Self { data, position: 4, little_endian })
  }

  fn seek(&mut self, position: usize) {
    self.position = position;
  }

  fn read_u32(&mut self) -> Result<u32> {
    let bytes = self.slice(self.position, 4)?;
    self.position += 4;
    let bytes = [bytes[0], bytes[1], bytes[2], bytes[3]];
    Ok(if self.little_endian { u32::from_le_bytes(bytes) } else { u32::from_be_bytes(bytes) })
  }

  fn read_u32_list(&mut self, count: usize) -> Result<Vec<u32>> {
    (0..count).map(|_| self.read_u32()).collect()
  }

  fn slice(&self, offset: usize, size: usize) -> Result<&'a [u8]> {
    let end = offset
      .checked_add(size)
      .ok_or_else(|| Error::InvalidArgument("string offset outside catalog data".to_string()))?;
    self
      .data
      .get(offset..end)
      .ok_or_else(|| Error::InvalidArgument("string offset outside catalog data".to_string()))
  }
}

fn not_a_catalog() -> Error {
  Error::InvalidArgument("not a valid gettext catalog".to_string())
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tempdir::TempDir;

  use super::*;

  /// Builds a minimal `.mo` image: header, the two offset tables, no hash
  /// table, then the string data.
  fn build_mo(little_endian: bool, entries: &[(&[u8], &[u8])]) -> Vec<u8> {
    let u32_bytes = |value: u32| if little_endian { value.to_le_bytes() } else { value.to_be_bytes() };

    let num_strings = entries.len() as u32;
    let original_table_offset = 28u32;
    let translation_table_offset = original_table_offset + 8 * num_strings;
    let mut string_offset = translation_table_offset + 8 * num_strings;

    let mut image = Vec::new();
    image.extend_from_slice(if little_endian { &MAGIC_LITTLE_ENDIAN } else { &MAGIC_BIG_ENDIAN });
    image.extend_from_slice(&u32_bytes(0)); // revision
    image.extend_from_slice(&u32_bytes(num_strings));
    image.extend_from_slice(&u32_bytes(original_table_offset));
    image.extend_from_slice(&u32_bytes(translation_table_offset));
    image.extend_from_slice(&u32_bytes(0)); // hash table size
    image.extend_from_slice(&u32_bytes(0)); // hash table offset

    let mut strings = Vec::new();
    let mut original_table = Vec::new();
    let mut translation_table = Vec::new();
    for (original, translation) in entries {
      original_table.push((original.len() as u32, string_offset));
      strings.extend_from_slice(original);
      string_offset += original.len() as u32;

      translation_table.push((translation.len() as u32, string_offset));
      strings.extend_from_slice(translation);
      string_offset += translation.len() as u32;
    }

    for (size, offset) in original_table.into_iter().chain(translation_table) {
      image.extend_from_slice(&u32_bytes(size));
      image.extend_from_slice(&u32_bytes(offset));
    }
    image.extend_from_slice(&strings);
    image
  }

  #[test]
  fn parses_a_minimal_little_endian_catalog() {
    let image = build_mo(true, &[(b"foo", b"bar")]);
    let text_domain = Gettext::parse(&image).unwrap();

    assert_eq!(text_domain.len(), 1);
    assert_eq!(text_domain.get("foo"), Some(&Translation::Singular("bar".to_string())));
    assert_eq!(text_domain.get(""), None);
  }

  #[test]
  fn parses_a_minimal_big_endian_catalog() {
    let image = build_mo(false, &[(b"foo", b"bar")]);
    let text_domain = Gettext::parse(&image).unwrap();

    assert_eq!(text_domain.get("foo"), Some(&Translation::Singular("bar".to_string())));
  }

  #[test]
  fn parses_a_plural_entry() {
    let image = build_mo(true, &[(
      b"Message 5\0Message 5 Plural",
      b"Nachricht 5 - 0\0Nachricht 5 - 1\0Nachricht 5 - 2",
    )]);
    let text_domain = Gettext::parse(&image).unwrap();

    assert_eq!(
      text_domain.get("Message 5"),
      Some(&Translation::Plural(vec![
        "Nachricht 5 - 0".to_string(),
        "Nachricht 5 - 1".to_string(),
        "Nachricht 5 - 2".to_string(),
      ]))
    );
    // the plural-id variant is registered as an empty placeholder
    assert_eq!(text_domain.get("Message 5 Plural"), Some(&Translation::Singular(String::new())));
  }

  #[test]
  fn entries_without_translation_are_skipped() {
    let image = build_mo(true, &[(b"untranslated", b""), (b"foo", b"bar")]);
    let text_domain = Gettext::parse(&image).unwrap();

    assert_eq!(text_domain.len(), 1);
    assert_eq!(text_domain.get("untranslated"), None);
  }

  #[test]
  fn reads_the_plural_forms_header_and_strips_the_header_entry() {
    let image = build_mo(true, &[(
      b"",
      b"Content-Type: text/plain; charset=utf-8\nPlural-Forms: nplurals=1; plural=0\n",
    )]);
    let text_domain = Gettext::parse(&image).unwrap();

    assert_eq!(text_domain.get(""), None);
    assert_eq!(text_domain.plural_rule().num_plurals(), 1);
    assert_eq!(text_domain.plural_index(5).unwrap(), 0);
  }

  #[test]
  fn header_name_matching_is_case_insensitive() {
    let image = build_mo(true, &[(b"", b"plural-forms: nplurals=2; plural=n!=1\n")]);
    let text_domain = Gettext::parse(&image).unwrap();

    assert_eq!(text_domain.plural_index(1).unwrap(), 0);
    assert_eq!(text_domain.plural_index(4).unwrap(), 1);
  }

  #[test]
  fn malformed_plural_forms_header_is_a_parse_error() {
    let image = build_mo(true, &[(b"", b"Plural-Forms: nplurals=2; plural=(n==1\n")]);
    assert!(matches!(Gettext::parse(&image), Err(Error::Parse(_))));
  }

  #[test]
  fn rejects_an_unknown_magic_number() {
    assert!(matches!(Gettext::parse(&[0x00, 0x01, 0x02, 0x03]), Err(Error::InvalidArgument(_))));
  }

  #[test]
  fn rejects_a_file_shorter_than_the_magic_number() {
    assert!(matches!(Gettext::parse(&[0xde, 0x12]), Err(Error::InvalidArgument(_))));
  }

  #[test]
  fn rejects_an_unknown_major_revision() {
    let mut image = build_mo(true, &[(b"foo", b"bar")]);
    image[4..8].copy_from_slice(&(2u32 << 16).to_le_bytes());
    assert!(matches!(Gettext::parse(&image), Err(Error::InvalidArgument(_))));
  }

  #[test]
  fn minor_revision_is_ignored() {
    let mut image = build_mo(true, &[(b"foo", b"bar")]);
    image[4..8].copy_from_slice(&((1u32 << 16) | 7).to_le_bytes());
    let text_domain = Gettext::parse(&image).unwrap();
    assert_eq!(text_domain.get("foo"), Some(&Translation::Singular("bar".to_string())));
  }

  #[test]
  fn rejects_truncated_tables() {
    let image = build_mo(true, &[(b"foo", b"bar")]);
    // cut the image in the middle of the offset tables
    assert!(matches!(Gettext::parse(&image[..32]), Err(Error::InvalidArgument(_))));
  }

  #[test]
  fn rejects_string_offsets_outside_the_image() {
    let mut image = build_mo(true, &[(b"foo", b"bar")]);
    let len = image.len();
    // point the original string table's offset past the end of the image
    image[32..36].copy_from_slice(&(len as u32 + 100).to_le_bytes());
    assert!(matches!(Gettext::parse(&image), Err(Error::InvalidArgument(_))));
  }

  #[test_log::test]
  fn loads_a_catalog_from_disk() {
    let dir = TempDir::new("gettext-loader").unwrap();
    let path = dir.path().join("de_DE.mo");
    fs::write(&path, build_mo(true, &[(b"foo", b"bar")])).unwrap();

    let text_domain = Gettext.load(&path).unwrap();
    assert_eq!(text_domain.get("foo"), Some(&Translation::Singular("bar".to_string())));
  }

  #[test]
  fn missing_file_is_an_invalid_argument_error() {
    let result = Gettext.load(Path::new("missing/de_DE.mo"));
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
  }
}
