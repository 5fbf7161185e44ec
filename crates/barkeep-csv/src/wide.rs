//! Reader for the wide `strDrink, …, strIngredient1..15, strMeasure1..15`
//! export.

use std::io;

use barkeep_core::reshape::{MAX_SLOTS, WideRow};
use csv::{ReaderBuilder, StringRecord};

use crate::{Error, Result};

/// Column positions resolved once from the header row. Only `strDrink` is
/// required; any other column may be absent and reads as empty.
struct WideColumns {
  drink:        usize,
  category:     Option<usize>,
  instructions: Option<usize>,
  glass:        Option<usize>,
  ingredients:  [Option<usize>; MAX_SLOTS],
  measures:     [Option<usize>; MAX_SLOTS],
}

impl WideColumns {
  fn locate(headers: &StringRecord) -> Result<Self> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    Ok(Self {
      drink:        find("strDrink").ok_or(Error::MissingColumn("strDrink"))?,
      category:     find("strCategory"),
      instructions: find("strInstructions"),
      glass:        find("strGlass"),
      ingredients:  std::array::from_fn(|i| find(format!("strIngredient{}", i + 1).as_str())),
      measures:     std::array::from_fn(|i| find(format!("strMeasure{}", i + 1).as_str())),
    })
  }

  fn row(&self, record: &StringRecord) -> WideRow {
    // Short (flexible) records and empty cells both read as missing.
    let cell = |idx: Option<usize>| {
      idx
        .and_then(|i| record.get(i))
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
    };

    WideRow {
      drink:        record.get(self.drink).unwrap_or_default().to_owned(),
      category:     cell(self.category),
      instructions: cell(self.instructions),
      glass:        cell(self.glass),
      ingredients:  std::array::from_fn(|i| cell(self.ingredients[i])),
      measures:     std::array::from_fn(|i| cell(self.measures[i])),
    }
  }
}

/// Read wide-format recipes from `reader`, one [`WideRow`] per CSV record.
///
/// Fails up front when the header lacks `strDrink`; each yielded item fails
/// independently on a malformed record.
pub fn read_wide<R: io::Read>(
  reader: R,
) -> Result<impl Iterator<Item = Result<WideRow>>> {
  let mut rdr = ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(reader);

  let columns = WideColumns::locate(rdr.headers()?)?;

  Ok(
    rdr
      .into_records()
      .map(move |record| Ok(columns.row(&record?))),
  )
}
