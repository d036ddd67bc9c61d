/*!
  This module is responsible for the encoding and decoding of binary instructions, both
  between field values and a single word and between words and the little-endian byte
  stream of a program file.
*/

use super::instruction::{FieldValues, InstructionSpec, OPCODE_FIELD};
use super::table::INSTRUCTION_TABLE;
use super::{Code, Word, WORD_BYTES};
use crate::error::{Error, Result};

/// The code of the instruction `word` encodes.
pub fn opcode_of(word: Word) -> Code {
  (word & OPCODE_FIELD.max_value()) as Code
}

/**
  Packs `values` into a word following the layout of `spec`. Every declared field must be
  present, fit in its width, and field `A` must equal the spec's code. Values for names the
  spec does not declare are ignored.
*/
pub fn encode(spec: &InstructionSpec, values: &FieldValues) -> Result<Word> {
  let mut word: Word = 0;

  for field in spec.fields {
    let value = match values.get(field.name) {
      Some(value) => *value,
      None => {
        return Err(Error::MissingField { mnemonic: spec.name(), field: field.name });
      }
    };

    if value > field.max_value() {
      return Err(Error::Overflow {
        mnemonic: spec.name(),
        field: field.name,
        value,
        width: field.width(),
      });
    }

    if field.name == OPCODE_FIELD.name && value != spec.code() as u64 {
      return Err(Error::OpcodeMismatch {
        mnemonic: spec.name(),
        expected: spec.code(),
        found: value,
      });
    }

    // Ranges are disjoint, so this never disturbs another field.
    word |= value << field.lo;
  }

  Ok(word)
}

/// Unpacks a word into its spec and the value of each declared field.
pub fn decode(word: Word) -> Result<(&'static InstructionSpec, FieldValues)> {
  let spec = INSTRUCTION_TABLE.by_code(opcode_of(word))?;
  let values =
    spec.fields
        .iter()
        .map(|field| (field.name, (word >> field.lo) & field.max_value()))
        .collect();
  Ok((spec, values))
}

/// Serializes words as consecutive 8 byte little-endian values.
pub fn to_bytes(words: &[Word]) -> Vec<u8> {
  words.iter().flat_map(|word| word.to_le_bytes().to_vec()).collect()
}

/// The inverse of `to_bytes`. There is no header; any trailing partial word is a framing error.
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<Word>> {
  if bytes.len() % WORD_BYTES != 0 {
    return Err(Error::TruncatedWord { length: bytes.len() });
  }

  let words =
    bytes.chunks_exact(WORD_BYTES)
         .map(|chunk| {
           let mut buffer = [0u8; WORD_BYTES];
           buffer.copy_from_slice(chunk);
           Word::from_le_bytes(buffer)
         })
         .collect();
  Ok(words)
}
