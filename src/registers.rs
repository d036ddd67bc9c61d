//! The flat register file the interpreter mutates, and the inclusive window of it that a
//! run reports.

use std::fmt::{Display, Formatter};
use std::io::Write;

use prettytable::{format as TableFormat, Table};

use crate::error::{Error, Result};

pub const REGISTER_COUNT: usize = 2048;

pub type Value = u64;

/// Fixed size, zero initialized. Every access is bounds checked.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisterFile {
  cells: Vec<Value>
}

impl RegisterFile {
  pub fn new() -> RegisterFile {
    RegisterFile { cells: vec![0; REGISTER_COUNT] }
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn get(&self, index: usize) -> Result<Value> {
    match self.cells.get(index) {
      Some(value) => Ok(*value),
      None        => Err(Error::RegisterOutOfRange { index, size: self.len() })
    }
  }

  pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
    let size = self.len();
    match self.cells.get_mut(index) {
      Some(cell) => {
        *cell = value;
        Ok(())
      }
      None => Err(Error::RegisterOutOfRange { index, size })
    }
  }

  /// Copies out registers `start..=end`.
  pub fn window(&self, start: usize, end: usize) -> Result<RegisterWindow> {
    check_window(start, end, self.len())?;
    Ok(RegisterWindow { start, values: self.cells[start..=end].to_vec() })
  }
}

impl Default for RegisterFile {
  fn default() -> Self {
    RegisterFile::new()
  }
}

/// Fails unless `start <= end < size`.
pub fn check_window(start: usize, end: usize, size: usize) -> Result<()> {
  match start <= end && end < size {
    true  => Ok(()),
    false => Err(Error::OutOfRange { start, end, size })
  }
}

/// A snapshot of consecutive registers, reported as `(index, value)` rows in ascending order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisterWindow {
  start  : usize,
  values : Vec<Value>,
}

impl RegisterWindow {
  pub fn start(&self) -> usize {
    self.start
  }

  pub fn end(&self) -> usize {
    self.start + self.values.len() - 1
  }

  pub fn get(&self, index: usize) -> Option<Value> {
    match (self.start()..=self.end()).contains(&index) {
      true  => Some(self.values[index - self.start]),
      false => None
    }
  }

  pub fn rows(&self) -> impl Iterator<Item = (usize, Value)> + '_ {
    let start = self.start;
    self.values.iter().enumerate().map(move |(offset, value)| (start + offset, *value))
  }

  pub fn to_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Register", ubl->"Value"]);

    for (index, value) in self.rows() {
      table.add_row(row![r->format!("[{}] =", index), value]);
    }
    table
  }

  /// Writes an `index,value` header followed by one line per register.
  pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["index", "value"]);
    for (index, value) in self.rows() {
      table.add_row(row![index, value]);
    }
    table.to_csv(out)
         .map(|_writer| ())
         .map_err(|e| Error::Report(e.to_string()))
  }
}

impl Display for RegisterWindow {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_table())
  }
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}
