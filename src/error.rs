//! Every failure the assembler and interpreter can report. All of them abort the current run.

use thiserror::Error;

use crate::bytecode::Code;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  /// Assembly named an instruction that is not in the table.
  #[error("unknown mnemonic `{0}`")]
  UnknownMnemonic(String),

  /// The low six bits of a word match no opcode.
  #[error("unknown opcode {0}")]
  UnknownOpcode(Code),

  #[error("{mnemonic} requires field {field}")]
  MissingField {
    mnemonic: &'static str,
    field: &'static str,
  },

  /// The value does not fit in the bit range declared for the field.
  #[error("value {value} too large for field {field} of {mnemonic} ({width} bits)")]
  Overflow {
    mnemonic: &'static str,
    field: &'static str,
    value: u64,
    width: u32,
  },

  #[error("{mnemonic} has opcode {expected} but field A holds {found}")]
  OpcodeMismatch {
    mnemonic: &'static str,
    expected: Code,
    found: u64,
  },

  #[error("{mnemonic} has no field `{field}`")]
  UnknownField {
    mnemonic: &'static str,
    field: String,
  },

  /// Field A carries the opcode and is filled in by the assembler.
  #[error("field {0} is reserved for the opcode")]
  ReservedField(String),

  #[error("field {0} assigned more than once")]
  DuplicateField(&'static str),

  #[error("expected `field=value` or a `#` comment, found `{0}`")]
  MalformedToken(String),

  /// Binary input whose length is not a whole number of words.
  #[error("program is {length} bytes long, which is not a multiple of 8")]
  TruncatedWord { length: usize },

  #[error("{0} has no execution semantics")]
  UnimplementedOpcode(&'static str),

  #[error("register window [{start}, {end}] is outside the {size} registers")]
  OutOfRange {
    start: usize,
    end: usize,
    size: usize,
  },

  #[error("register {index} is outside the {size} registers")]
  RegisterOutOfRange { index: usize, size: usize },

  #[error("row {row}: {source}")]
  AtRow {
    row: usize,
    #[source]
    source: Box<Error>,
  },

  #[error("word {index}: {source}")]
  AtWord {
    index: usize,
    #[source]
    source: Box<Error>,
  },

  /// The source text is not valid comma separated rows.
  #[error("source: {0}")]
  Source(#[from] csv::Error),

  /// The register report could not be rendered.
  #[error("report: {0}")]
  Report(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl Error {
  pub fn at_row(self, row: usize) -> Error {
    Error::AtRow { row, source: Box::new(self) }
  }

  pub fn at_word(self, index: usize) -> Error {
    Error::AtWord { index, source: Box::new(self) }
  }

  /// Strips any row or word context.
  pub fn root(&self) -> &Error {
    match self {
      | Error::AtRow { source, .. }
      | Error::AtWord { source, .. } => source.root(),
      other => other,
    }
  }
}
