/*!

  The machine uses a 64 bit word, and every instruction is exactly one word. A program file
  is a sequence of words stored little-endian, 8 bytes each, with no header. The low six
  bits of every word hold the opcode (field `A`); the remaining operands occupy fixed,
  non-overlapping bit ranges that depend on the opcode. Bits outside any declared field
  are zero.

    LOAD_CONST (57):  [A:0-5][B:6-19][C:20-47]
    LOAD_MEM   (46):  [A:0-5][B:6-19][C:20-33]
    STORE_MEM  (11):  [A:0-5][B:6-19][C:20-33]
    ROR        (10):  [A:0-5][B:6-19][C:20-33][D:34-44][E:45-58]

  There are two representations of an unencoded instruction. `FieldValues` is the
  generic name-to-value form the assembler builds from text and the bit packer works on.
  `Instruction` is the typed form the interpreter executes, one variant per opcode, so
  that adding an opcode forces every `match` on it to be revisited.

*/

mod assembly;
mod binary;
mod instruction;
mod table;

pub use assembly::{assemble, format_word, hex_dump, Row};
pub use binary::{decode, encode, from_bytes, opcode_of, to_bytes};
pub use instruction::{
  Field, FieldValues, Immediate, Instruction, InstructionSpec, Opcode, RegisterIndex,
  LOAD_CONST, LOAD_MEM, OPCODE_FIELD, ROR, STORE_MEM,
};
pub use table::{InstructionTable, INSTRUCTION_TABLE};

// If you change this you must also change `to_bytes` and `from_bytes`.
pub type Word = u64;
pub const WORD_BYTES: usize = 8;

/// The six bit opcode in field `A`.
pub type Code = u8;
