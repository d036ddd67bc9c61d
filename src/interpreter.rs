//! Straight-line execution of a decoded program against a register file. There are no
//! jumps: the program counter advances by one per instruction and the run halts after the
//! last one.

use crate::bytecode::{Instruction, Word};
use crate::error::{Error, Result};
use crate::registers::{check_window, RegisterFile, RegisterWindow, REGISTER_COUNT};

pub struct Interpreter {
  program   : Vec<Instruction>,
  pc        : usize,          // Index of the next instruction
  registers : RegisterFile,
}

impl Interpreter {

  /**
    Decodes the whole program up front. A word with an unknown opcode rejects the program
    as a whole, so nothing executes unless every word decodes.
  */
  pub fn load(words: &[Word]) -> Result<Interpreter> {
    let program =
      words.iter()
           .enumerate()
           .map(|(index, word)| Instruction::decode(*word).map_err(|e| e.at_word(index)))
           .collect::<Result<Vec<Instruction>>>()?;
    Ok(Interpreter::with_program(program))
  }

  pub fn with_program(program: Vec<Instruction>) -> Interpreter {
    Interpreter {
      program,
      pc: 0,
      registers: RegisterFile::new(),
    }
  }

  pub fn program(&self) -> &[Instruction] {
    &self.program
  }

  pub fn registers(&self) -> &RegisterFile {
    &self.registers
  }

  pub fn is_halted(&self) -> bool {
    self.pc >= self.program.len()
  }

  /// Executes the instruction at the program counter. Returns `false` once halted.
  pub fn step(&mut self) -> Result<bool> {
    let instruction = match self.program.get(self.pc) {
      Some(instruction) => *instruction,
      None              => return Ok(false),
    };

    #[cfg(feature = "trace_execution")]
    eprintln!("{:>5}: {}", self.pc, instruction);

    self.execute(instruction).map_err(|e| e.at_word(self.pc))?;
    self.pc += 1;
    Ok(true)
  }

  /// Runs to the end of the program.
  pub fn run(&mut self) -> Result<()> {
    while self.step()? {}
    Ok(())
  }

  fn execute(&mut self, instruction: Instruction) -> Result<()> {
    match instruction {

      Instruction::LoadConst { register, value } => {
        self.registers.set(register as usize, value as u64)
      }

      Instruction::LoadMem { destination, source } => {
        let value = self.registers.get(source as usize)?;
        self.registers.set(destination as usize, value)
      }

      Instruction::StoreMem { source, destination } => {
        let value = self.registers.get(source as usize)?;
        self.registers.set(destination as usize, value)
      }

      Instruction::Ror { .. } => {
        Err(Error::UnimplementedOpcode(instruction.opcode().mnemonic()))
      }

    }
  }
}

/**
  Decodes and executes `words` on a fresh register file and returns registers
  `start..=end`. The window is checked before anything runs.
*/
pub fn run(words: &[Word], start: usize, end: usize) -> Result<RegisterWindow> {
  check_window(start, end, REGISTER_COUNT)?;
  let mut interpreter = Interpreter::load(words)?;
  interpreter.run()?;
  interpreter.registers().window(start, end)
}


#[cfg(test)]
mod tests {
  use super::*;

  fn words(program: &[Instruction]) -> Vec<Word> {
    program.iter().map(|instruction| instruction.encode().unwrap()).collect()
  }

  #[test]
  fn load_const() {
    let program = words(&[Instruction::LoadConst { register: 5, value: 100 }]);
    let window = run(&program, 5, 5).unwrap();
    assert_eq!(window.rows().collect::<Vec<_>>(), vec![(5, 100)]);
  }

  #[test]
  fn load_mem_copies_into_b() {
    let program = words(&[
      Instruction::LoadConst { register: 5, value: 100 },
      Instruction::LoadMem { destination: 6, source: 5 },
    ]);
    let window = run(&program, 5, 6).unwrap();
    assert_eq!(window.get(5), Some(100));
    assert_eq!(window.get(6), Some(100));
  }

  #[test]
  fn store_mem_copies_into_c() {
    let program = words(&[
      Instruction::LoadConst { register: 5, value: 7 },
      Instruction::StoreMem { source: 5, destination: 9 },
    ]);
    let window = run(&program, 5, 9).unwrap();
    assert_eq!(window.get(9), Some(7));
    assert_eq!(window.get(5), Some(7));
    assert_eq!(window.get(6), Some(0));
  }

  #[test]
  fn executes_in_order_and_halts() {
    let program = words(&[
      Instruction::LoadConst { register: 1, value: 1 },
      Instruction::LoadConst { register: 1, value: 2 },
      Instruction::LoadMem { destination: 2, source: 1 },
    ]);
    let mut interpreter = Interpreter::load(&program).unwrap();
    assert_eq!(interpreter.program().len(), 3);
    assert!(interpreter.step().unwrap());
    assert_eq!(interpreter.registers().get(1).unwrap(), 1);
    interpreter.run().unwrap();
    assert!(interpreter.is_halted());
    assert!(!interpreter.step().unwrap());
    assert_eq!(interpreter.registers().get(2).unwrap(), 2);
  }

  #[test]
  fn empty_program_reports_zeros() {
    let window = run(&[], 0, 3).unwrap();
    assert!(window.rows().all(|(_, value)| value == 0));
  }

  #[test]
  fn each_run_starts_from_zero() {
    let program = words(&[Instruction::LoadConst { register: 0, value: 42 }]);
    assert_eq!(run(&program, 0, 0).unwrap().get(0), Some(42));
    assert_eq!(run(&[], 0, 0).unwrap().get(0), Some(0));
  }

  #[test]
  fn unknown_opcode_rejects_whole_program() {
    let mut program = words(&[Instruction::LoadConst { register: 0, value: 1 }]);
    program.push(0x3F);
    match Interpreter::load(&program) {
      Err(Error::AtWord { index, source }) => {
        assert_eq!(index, 1);
        assert!(matches!(*source, Error::UnknownOpcode(63)));
      }
      Err(e) => panic!("unexpected error {}", e),
      Ok(_) => panic!("loaded a program with an unknown opcode"),
    }
  }

  #[test]
  fn ror_is_not_silently_skipped() {
    let program = words(&[
      Instruction::LoadConst { register: 0, value: 1 },
      Instruction::Ror { b: 0, c: 1, d: 2, e: 3 },
    ]);
    let error = run(&program, 0, 0).unwrap_err();
    assert!(matches!(error, Error::AtWord { index: 1, .. }));
    assert!(matches!(error.root(), Error::UnimplementedOpcode("ROR")));
  }

  #[test]
  fn register_operands_are_bounds_checked() {
    let program = words(&[Instruction::LoadConst { register: 3000, value: 1 }]);
    assert!(matches!(
      run(&program, 0, 0).unwrap_err().root(),
      Error::RegisterOutOfRange { index: 3000, .. }
    ));
    let program = words(&[Instruction::LoadMem { destination: 0, source: 16383 }]);
    assert!(run(&program, 0, 0).is_err());
  }

  #[test]
  fn window_is_checked_before_running() {
    let program = words(&[Instruction::Ror { b: 0, c: 0, d: 0, e: 0 }]);
    assert!(matches!(run(&program, 0, REGISTER_COUNT), Err(Error::OutOfRange { .. })));
    assert!(matches!(run(&program, 10, 9), Err(Error::OutOfRange { .. })));
  }
}
