use bimap::BiMap;
use strum::IntoEnumIterator;

use super::instruction::{InstructionSpec, Opcode};
use super::Code;
use crate::error::{Error, Result};

/**
  The instruction table is a mapping between mnemonics and the opcode stored in a word's
  low six bits. It is derived once from the closed set of `Opcode`s and never changes
  afterward, so it is really just a convenience wrapper around a BiMap.
*/
pub struct InstructionTable {
  table: BiMap<&'static str, Code>
}

impl InstructionTable {

  fn new() -> InstructionTable {
    let mut table = BiMap::new();
    for opcode in Opcode::iter() {
      debug_assert!(opcode.spec().is_well_formed(), "{} has overlapping fields", opcode);
      table.insert(opcode.mnemonic(), opcode.code());
    }
    InstructionTable { table }
  }

  pub fn by_mnemonic(&self, mnemonic: &str) -> Result<&'static InstructionSpec> {
    match self.table.get_by_left(mnemonic) {
      Some(code) => self.by_code(*code),
      None       => Err(Error::UnknownMnemonic(mnemonic.to_string()))
    }
  }

  pub fn by_code(&self, code: Code) -> Result<&'static InstructionSpec> {
    Opcode::from_code(code).map(|opcode| opcode.spec())
  }
}

lazy_static! {
  pub static ref INSTRUCTION_TABLE: InstructionTable = InstructionTable::new();
}
