//! Normalized name keys for the catalog's dimension tables.
//!
//! Each newtype can only be built through its normalizing constructor, so a
//! value in hand is always a valid lookup key.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

// ─── Ingredient ──────────────────────────────────────────────────────────────

/// An ingredient name: surrounding whitespace stripped, case preserved,
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IngredientName(String);

impl IngredientName {
  pub fn parse(raw: &str) -> Result<Self> {
    let key = raw.trim();
    if key.is_empty() {
      return Err(Error::EmptyIngredientName);
    }
    Ok(Self(key.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for IngredientName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Cocktail ────────────────────────────────────────────────────────────────

/// A cocktail name: surrounding whitespace stripped, never empty.
///
/// Identity in the catalog is `(CocktailName, SourceDataset)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CocktailName(String);

impl CocktailName {
  pub fn parse(raw: &str) -> Result<Self> {
    let key = raw.trim();
    if key.is_empty() {
      return Err(Error::EmptyCocktailName);
    }
    Ok(Self(key.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CocktailName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Glass type ──────────────────────────────────────────────────────────────

/// A glass type name in title case with single-space word separation.
///
/// `" old  fashioned "`, `"Old Fashioned"` and `"OLD FASHIONED"` all
/// normalize to `"Old Fashioned"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GlassName(String);

impl GlassName {
  /// Returns `None` for a missing or blank name: a cocktail may have no
  /// glass.
  pub fn normalize(raw: Option<&str>) -> Option<Self> {
    let words: Vec<String> = raw?.split_whitespace().map(title_case).collect();
    if words.is_empty() {
      return None;
    }
    Some(Self(words.join(" ")))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for GlassName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
/// An apostrophe between letters does not start a new run ("Collins' Glass").
fn title_case(word: &str) -> String {
  let mut out = String::with_capacity(word.len());
  let mut in_word = false;
  for c in word.chars() {
    if c.is_alphabetic() {
      if in_word {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      in_word = true;
    } else {
      out.push(c);
      in_word = in_word && c == '\'';
    }
  }
  out
}
