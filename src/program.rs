//! Reading and writing program files.

use std::fs;
use std::path::Path;

use crate::bytecode::{from_bytes, to_bytes, Word};
use crate::error::Result;

/// Writes `words` to `path`, replacing any existing file, and returns the number of bytes written.
pub fn write_program<P: AsRef<Path>>(path: P, words: &[Word]) -> Result<usize> {
  let bytes = to_bytes(words);
  fs::write(path, &bytes)?;
  Ok(bytes.len())
}

pub fn read_program<P: AsRef<Path>>(path: P) -> Result<Vec<Word>> {
  let bytes = fs::read(path)?;
  from_bytes(&bytes)
}
