//! Splits program text into rows. The text is comma separated: each record is one row, the
//! mnemonic first and then its tokens. Cells may be quoted, surrounding whitespace is
//! dropped, and empty cells are skipped. Lines whose first character is `#` are comments.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::bytecode::Row;
use crate::error::Result;

pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
  let mut reader =
    ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .trim(Trim::All)
      .comment(Some(b'#'))
      .from_reader(text.as_bytes());

  let mut rows = Vec::new();
  for record in reader.records() {
    if let Some(row) = to_row(&record?) {
      rows.push(row);
    }
  }
  Ok(rows)
}

fn to_row(record: &StringRecord) -> Option<Row> {
  let mut cells = record.iter().filter(|cell| !cell.is_empty());
  let mnemonic = cells.next()?;
  // A whitespace-indented comment line is not caught by the reader.
  if mnemonic.starts_with('#') {
    return None;
  }

  let line = record.position().map_or(0, |position| position.line() as usize);
  Some(Row {
    line,
    mnemonic: mnemonic.to_string(),
    tokens: cells.map(str::to_string).collect(),
  })
}
