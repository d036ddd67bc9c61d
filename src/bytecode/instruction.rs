use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumIter, IntoStaticStr};

use super::binary::{decode, encode};
use super::{Code, Word};
use crate::error::{Error, Result};

/// A register index, held in a 14 bit field.
pub type RegisterIndex = u16;
/// The immediate operand of `LOAD_CONST`, held in a 28 bit field.
pub type Immediate = u32;

/// Field name to value. Keys are always the `&'static` names of the spec's fields.
pub type FieldValues = BTreeMap<&'static str, u64>;

/**
  Opcodes of the machine. The discriminant is the six bit code stored in field `A`, so
  `TryFromPrimitive` is the code-to-opcode lookup and `IntoPrimitive` its inverse.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,       PartialEq,        Debug,         Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "LOAD_CONST")]
  LoadConst = 57,  // registers[B] = C
  #[strum(serialize = "LOAD_MEM")]
  LoadMem   = 46,  // registers[B] = registers[C]
  #[strum(serialize = "STORE_MEM")]
  StoreMem  = 11,  // registers[C] = registers[B]
  #[strum(serialize = "ROR")]
  Ror       = 10,
}

/// A named, inclusive bit range `[lo, hi]` of a word.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Field {
  pub name : &'static str,
  pub lo   : u32,
  pub hi   : u32,
}

/// The opcode always lives in the low six bits.
pub const OPCODE_FIELD: Field = Field::new("A", 0, 5);

/// An opcode together with the ordered layout of its fields.
#[derive(Eq, PartialEq, Debug, Hash)]
pub struct InstructionSpec {
  pub opcode : Opcode,
  pub fields : &'static [Field],
}

// region Instruction table

pub static LOAD_CONST: InstructionSpec = InstructionSpec {
  opcode: Opcode::LoadConst,
  fields: &[OPCODE_FIELD, Field::new("B", 6, 19), Field::new("C", 20, 47)],
};

pub static LOAD_MEM: InstructionSpec = InstructionSpec {
  opcode: Opcode::LoadMem,
  fields: &[OPCODE_FIELD, Field::new("B", 6, 19), Field::new("C", 20, 33)],
};

pub static STORE_MEM: InstructionSpec = InstructionSpec {
  opcode: Opcode::StoreMem,
  fields: &[OPCODE_FIELD, Field::new("B", 6, 19), Field::new("C", 20, 33)],
};

pub static ROR: InstructionSpec = InstructionSpec {
  opcode: Opcode::Ror,
  fields: &[
    OPCODE_FIELD,
    Field::new("B", 6, 19),
    Field::new("C", 20, 33),
    Field::new("D", 34, 44),
    Field::new("E", 45, 58),
  ],
};

// endregion

impl Opcode {
  pub fn code(&self) -> Code {
    Into::<Code>::into(*self)
  }

  pub fn mnemonic(&self) -> &'static str {
    Into::<&'static str>::into(*self)
  }

  pub fn spec(&self) -> &'static InstructionSpec {
    match self {
      Opcode::LoadConst => &LOAD_CONST,
      Opcode::LoadMem   => &LOAD_MEM,
      Opcode::StoreMem  => &STORE_MEM,
      Opcode::Ror       => &ROR,
    }
  }

  pub fn from_code(code: Code) -> Result<Opcode> {
    Opcode::try_from(code).map_err(|_| Error::UnknownOpcode(code))
  }
}

impl Field {
  pub const fn new(name: &'static str, lo: u32, hi: u32) -> Field {
    Field { name, lo, hi }
  }

  pub fn width(&self) -> u32 {
    self.hi - self.lo + 1
  }

  /// The largest value the field can hold, `2^width - 1`.
  pub fn max_value(&self) -> u64 {
    u64::max_value() >> (64 - self.width())
  }

  fn overlaps(&self, other: &Field) -> bool {
    self.lo <= other.hi && other.lo <= self.hi
  }
}

impl InstructionSpec {
  pub fn name(&self) -> &'static str {
    self.opcode.mnemonic()
  }

  pub fn code(&self) -> Code {
    self.opcode.code()
  }

  pub fn field(&self, name: &str) -> Option<&'static Field> {
    self.fields.iter().find(|field| field.name == name)
  }

  /// True when every field fits in a word, field `A` is the opcode field, and no two
  /// ranges overlap.
  pub fn is_well_formed(&self) -> bool {
    let in_word = self.fields.iter().all(|f| f.lo <= f.hi && f.hi < 64);
    let disjoint = self.fields.iter().enumerate().all(|(i, a)| {
      self.fields[i + 1..].iter().all(|b| !a.overlaps(b))
    });
    in_word && disjoint && self.fields.first() == Some(&OPCODE_FIELD)
  }
}

/**
  The unencoded form of an instruction, one variant per opcode. Each variant names its
  operands by role; the field letter each role is stored in is noted beside it.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Instruction {
  LoadConst {
    register : RegisterIndex, // B
    value    : Immediate,     // C
  },
  LoadMem {
    destination : RegisterIndex, // B
    source      : RegisterIndex, // C
  },
  /// Operand roles are reversed relative to `LoadMem`: B is read, C is written.
  StoreMem {
    source      : RegisterIndex, // B
    destination : RegisterIndex, // C
  },
  Ror {
    b: u16,
    c: u16,
    d: u16,
    e: u16,
  },
}

impl Instruction {
  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::LoadConst { .. } => Opcode::LoadConst,
      Instruction::LoadMem { .. }   => Opcode::LoadMem,
      Instruction::StoreMem { .. }  => Opcode::StoreMem,
      Instruction::Ror { .. }       => Opcode::Ror,
    }
  }

  /// Builds the instruction from field values, each of which must fit its field. Field `A`
  /// is not consulted.
  pub fn from_fields(opcode: Opcode, values: &FieldValues) -> Result<Instruction> {
    let spec = opcode.spec();
    let get = |name: &'static str| -> Result<u64> {
      let value = match values.get(name) {
        Some(value) => *value,
        None => return Err(Error::MissingField { mnemonic: spec.name(), field: name }),
      };
      match spec.field(name) {
        Some(field) if value > field.max_value() => Err(Error::Overflow {
          mnemonic: spec.name(),
          field: name,
          value,
          width: field.width(),
        }),
        _ => Ok(value),
      }
    };

    let instruction =
      match opcode {
        Opcode::LoadConst => Instruction::LoadConst {
          register : get("B")? as RegisterIndex,
          value    : get("C")? as Immediate,
        },
        Opcode::LoadMem => Instruction::LoadMem {
          destination : get("B")? as RegisterIndex,
          source      : get("C")? as RegisterIndex,
        },
        Opcode::StoreMem => Instruction::StoreMem {
          source      : get("B")? as RegisterIndex,
          destination : get("C")? as RegisterIndex,
        },
        Opcode::Ror => Instruction::Ror {
          b: get("B")? as u16,
          c: get("C")? as u16,
          d: get("D")? as u16,
          e: get("E")? as u16,
        },
      };
    Ok(instruction)
  }

  /// Every field of the instruction's spec, including the opcode field `A`.
  pub fn fields(&self) -> FieldValues {
    let mut values = FieldValues::new();
    values.insert(OPCODE_FIELD.name, self.opcode().code() as u64);
    match *self {
      Instruction::LoadConst { register, value } => {
        values.insert("B", register as u64);
        values.insert("C", value as u64);
      }
      Instruction::LoadMem { destination, source } => {
        values.insert("B", destination as u64);
        values.insert("C", source as u64);
      }
      Instruction::StoreMem { source, destination } => {
        values.insert("B", source as u64);
        values.insert("C", destination as u64);
      }
      Instruction::Ror { b, c, d, e } => {
        values.insert("B", b as u64);
        values.insert("C", c as u64);
        values.insert("D", d as u64);
        values.insert("E", e as u64);
      }
    }
    values
  }

  pub fn encode(&self) -> Result<Word> {
    encode(self.opcode().spec(), &self.fields())
  }

  pub fn decode(word: Word) -> Result<Instruction> {
    let (spec, values) = decode(word)?;
    Instruction::from_fields(spec.opcode, &values)
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let operands =
      self.fields()
          .iter()
          .filter(|(name, _)| **name != OPCODE_FIELD.name)
          .map(|(name, value)| format!("{}={}", name, value))
          .collect::<Vec<String>>()
          .join(", ");
    write!(f, "{}({})", self.opcode(), operands)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator;

  #[test]
  fn every_spec_is_well_formed() {
    for opcode in Opcode::iter() {
      let spec = opcode.spec();
      assert!(spec.is_well_formed(), "{} is malformed", spec.name());
      assert_eq!(spec.opcode, opcode);
      assert!(u64::from(spec.code()) <= OPCODE_FIELD.max_value());
    }
  }

  #[test]
  fn codes_and_mnemonics() {
    assert_eq!(Opcode::LoadConst.code(), 57);
    assert_eq!(Opcode::LoadMem.code(), 46);
    assert_eq!(Opcode::StoreMem.code(), 11);
    assert_eq!(Opcode::Ror.code(), 10);
    assert_eq!(Opcode::StoreMem.mnemonic(), "STORE_MEM");
    assert_eq!(format!("{}", Opcode::LoadConst), "LOAD_CONST");
    assert_eq!(Opcode::from_code(46).unwrap(), Opcode::LoadMem);
    assert!(matches!(Opcode::from_code(0), Err(Error::UnknownOpcode(0))));
  }

  #[test]
  fn field_widths() {
    assert_eq!(LOAD_CONST.field("C").unwrap().width(), 28);
    assert_eq!(ROR.field("D").unwrap().width(), 11);
    assert_eq!(OPCODE_FIELD.max_value(), 0x3F);
    assert_eq!(Field::new("X", 0, 63).max_value(), u64::max_value());
    assert!(LOAD_MEM.field("D").is_none());
  }

  #[test]
  fn overlapping_spec_is_rejected() {
    static BAD: InstructionSpec = InstructionSpec {
      opcode: Opcode::LoadConst,
      fields: &[OPCODE_FIELD, Field::new("B", 5, 10)],
    };
    assert!(!BAD.is_well_formed());
  }

  #[test]
  fn display_names_operands() {
    let instruction = Instruction::StoreMem { source: 5, destination: 9 };
    assert_eq!(instruction.to_string(), "STORE_MEM(B=5, C=9)");
  }

  #[test]
  fn typed_round_trip() {
    let program = [
      Instruction::LoadConst { register: 16383, value: (1 << 28) - 1 },
      Instruction::LoadMem { destination: 6, source: 5 },
      Instruction::StoreMem { source: 0, destination: 2047 },
      Instruction::Ror { b: 1, c: 2, d: 2047, e: 16383 },
    ];
    for instruction in program.iter() {
      let word = instruction.encode().unwrap();
      assert_eq!(word & 0x3F, instruction.opcode().code() as Word);
      assert_eq!(Instruction::decode(word).unwrap(), *instruction);
    }
  }

  #[test]
  fn from_fields_rejects_values_wider_than_the_field() {
    let mut values = FieldValues::new();
    values.insert("B", 70000);
    values.insert("C", 0);
    match Instruction::from_fields(Opcode::LoadConst, &values) {
      Err(Error::Overflow { field, value, width, .. }) => {
        assert_eq!(field, "B");
        assert_eq!(value, 70000);
        assert_eq!(width, 14);
      }
      other => panic!("expected an overflow, got {:?}", other),
    }

    values.insert("B", 1);
    values.insert("C", 1 << 28);
    assert!(matches!(
      Instruction::from_fields(Opcode::LoadConst, &values),
      Err(Error::Overflow { field: "C", width: 28, .. })
    ));
  }

  #[test]
  fn from_fields_requires_every_operand() {
    let mut values = FieldValues::new();
    values.insert("B", 5);
    assert!(matches!(
      Instruction::from_fields(Opcode::LoadMem, &values),
      Err(Error::MissingField { mnemonic: "LOAD_MEM", field: "C" })
    ));

    values.insert("C", 1);
    values.insert("D", 2);
    assert!(matches!(
      Instruction::from_fields(Opcode::Ror, &values),
      Err(Error::MissingField { mnemonic: "ROR", field: "E" })
    ));

    values.insert("E", 3);
    assert_eq!(
      Instruction::from_fields(Opcode::Ror, &values).unwrap(),
      Instruction::Ror { b: 5, c: 1, d: 2, e: 3 }
    );
  }

  #[test]
  fn typed_encode_checks_width() {
    let too_big = Instruction::LoadConst { register: 1 << 14, value: 0 };
    assert!(matches!(too_big.encode(), Err(Error::Overflow { field: "B", .. })));
  }
}
