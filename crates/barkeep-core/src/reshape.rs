//! Reshaping source rows into staging rows.
//!
//! The wide format carries up to [`MAX_SLOTS`] numbered ingredient/measure
//! pairs per recipe; the long format is already one row per ingredient. Both
//! transforms are pure: the caller decides when and where to write.

use serde::Serialize;

use crate::catalog::{StagedBostonRow, StagedDrinkRow};

/// Number of numbered `strIngredientN` / `strMeasureN` column pairs.
pub const MAX_SLOTS: usize = 15;

// ─── Source rows ─────────────────────────────────────────────────────────────

/// One recipe from a wide-format export.
///
/// `ingredients[i]` and `measures[i]` hold slot `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WideRow {
  pub drink:        String,
  pub category:     Option<String>,
  pub instructions: Option<String>,
  pub glass:        Option<String>,
  pub ingredients:  [Option<String>; MAX_SLOTS],
  pub measures:     [Option<String>; MAX_SLOTS],
}

/// One cocktail/ingredient pair from a long-format export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongRow {
  pub name:              String,
  pub category:          Option<String>,
  pub ingredient:        Option<String>,
  pub measure:           Option<String>,
  /// Free-text sequence column; may be absent or non-numeric.
  pub ingredient_number: Option<String>,
}

/// A single populated ingredient slot of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeLine {
  pub cocktail_name:   String,
  pub ingredient_name: String,
  /// Free-form measure text; empty when the source had none.
  pub quantity:        String,
  /// 1-based slot index.
  pub order:           i64,
}

// ─── Transforms ──────────────────────────────────────────────────────────────

/// One line per populated slot, in slot order. A slot is populated when its
/// ingredient cell is non-empty after trimming; empty slots leave gaps in the
/// order numbering rather than being compacted.
pub fn reshape_wide(row: &WideRow) -> Vec<RecipeLine> {
  row
    .ingredients
    .iter()
    .zip(&row.measures)
    .enumerate()
    .filter_map(|(i, (ingredient, measure))| {
      let ingredient = ingredient.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
      Some(RecipeLine {
        cocktail_name:   row.drink.trim().to_owned(),
        ingredient_name: ingredient.to_owned(),
        quantity:        measure.as_deref().map(str::trim).unwrap_or_default().to_owned(),
        order:           i as i64 + 1,
      })
    })
    .collect()
}

/// Staging rows for one wide-format recipe.
///
/// A recipe without any populated slot still yields a single row with no
/// ingredient, so the cocktail itself reaches the catalog.
pub fn stage_wide(row: &WideRow) -> Vec<StagedDrinkRow> {
  let drink = row.drink.trim().to_owned();
  let base = StagedDrinkRow {
    drink,
    category:         non_blank(row.category.as_deref()),
    glass:            non_blank(row.glass.as_deref()),
    instructions:     non_blank(row.instructions.as_deref()),
    ingredient_order: None,
    ingredient:       None,
    measure:          None,
  };

  let lines = reshape_wide(row);
  if lines.is_empty() {
    return vec![base];
  }

  lines
    .into_iter()
    .map(|line| StagedDrinkRow {
      ingredient_order: Some(line.order),
      ingredient: Some(line.ingredient_name),
      measure: Some(line.quantity),
      ..base.clone()
    })
    .collect()
}

/// Long-format rows pass through with their cells trimmed.
pub fn stage_long(row: LongRow) -> StagedBostonRow {
  StagedBostonRow {
    name:              row.name.trim().to_owned(),
    category:          non_blank(row.category.as_deref()),
    ingredient_number: non_blank(row.ingredient_number.as_deref()),
    ingredient:        row.ingredient.map(|s| s.trim().to_owned()),
    measure:           row.measure.map(|s| s.trim().to_owned()),
  }
}

fn non_blank(cell: Option<&str>) -> Option<String> {
  cell.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn wide(drink: &str, slots: &[(usize, Option<&str>, Option<&str>)]) -> WideRow {
    let mut row = WideRow { drink: drink.into(), ..Default::default() };
    for &(slot, ingredient, measure) in slots {
      row.ingredients[slot - 1] = ingredient.map(Into::into);
      row.measures[slot - 1] = measure.map(Into::into);
    }
    row
  }

  #[test]
  fn skipped_slot_leaves_a_gap() {
    let row = wide("Martini", &[
      (1, Some("Gin"), Some("2 oz")),
      (2, None, Some("1 dash")),
      (3, Some("Vermouth"), Some("1 oz")),
    ]);

    let lines = reshape_wide(&row);
    assert_eq!(lines.len(), 2);
    assert_eq!((lines[0].ingredient_name.as_str(), lines[0].order), ("Gin", 1));
    assert_eq!((lines[1].ingredient_name.as_str(), lines[1].order), ("Vermouth", 3));
  }

  #[test]
  fn blank_ingredient_cells_are_not_populated() {
    let row = wide("Negroni", &[
      (1, Some("   "), Some("1 oz")),
      (2, Some(""), None),
      (15, Some(" Campari "), None),
    ]);

    let lines = reshape_wide(&row);
    assert_eq!(lines, vec![RecipeLine {
      cocktail_name:   "Negroni".into(),
      ingredient_name: "Campari".into(),
      quantity:        String::new(),
      order:           15,
    }]);
  }

  #[test]
  fn missing_measure_becomes_empty_quantity() {
    let row = wide("Gimlet", &[(1, Some("Gin"), None), (2, Some("Lime"), Some(" 1 oz "))]);
    let quantities: Vec<_> = reshape_wide(&row).into_iter().map(|l| l.quantity).collect();
    assert_eq!(quantities, vec!["", "1 oz"]);
  }

  #[test]
  fn every_populated_slot_contributes_its_index() {
    let mut row = WideRow { drink: "Everything".into(), ..Default::default() };
    for i in (0..MAX_SLOTS).step_by(2) {
      row.ingredients[i] = Some(format!("ing{i}"));
    }
    let orders: Vec<_> = reshape_wide(&row).into_iter().map(|l| l.order).collect();
    assert_eq!(orders, vec![1, 3, 5, 7, 9, 11, 13, 15]);
  }

  #[test]
  fn recipe_without_ingredients_stages_one_bare_row() {
    let row = WideRow {
      drink: " Water ".into(),
      glass: Some("highball glass".into()),
      ..Default::default()
    };
    let staged = stage_wide(&row);
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].drink, "Water");
    assert_eq!(staged[0].glass.as_deref(), Some("highball glass"));
    assert!(staged[0].ingredient.is_none());
    assert!(staged[0].ingredient_order.is_none());
  }

  #[test]
  fn staged_wide_rows_carry_recipe_attributes() {
    let mut row = wide("Daiquiri", &[(1, Some("Rum"), Some("2 oz")), (2, Some("Lime"), None)]);
    row.category = Some("Cocktail".into());
    row.instructions = Some("Shake.".into());

    let staged = stage_wide(&row);
    assert_eq!(staged.len(), 2);
    assert!(staged.iter().all(|r| r.category.as_deref() == Some("Cocktail")));
    assert!(staged.iter().all(|r| r.instructions.as_deref() == Some("Shake.")));
    assert_eq!(staged[1].ingredient_order, Some(2));
    assert_eq!(staged[1].measure.as_deref(), Some(""));
  }

  #[test]
  fn long_rows_pass_through_trimmed() {
    let staged = stage_long(LongRow {
      name:              " Gin Fizz ".into(),
      category:          Some("".into()),
      ingredient:        Some(" Gin ".into()),
      measure:           Some("1.5 oz".into()),
      ingredient_number: Some(" 1 ".into()),
    });
    assert_eq!(staged.name, "Gin Fizz");
    assert_eq!(staged.category, None);
    assert_eq!(staged.ingredient.as_deref(), Some("Gin"));
    assert_eq!(staged.ingredient_number.as_deref(), Some("1"));
  }
}
