use std::fs;
use std::path::PathBuf;
use std::process;

use bitasm::bytecode::assemble;
use bitasm::interpreter;
use bitasm::program::{read_program, write_program};
use bitasm::source::parse_rows;
use bitasm::Error;

fn scratch_file(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!("bitasm-{}-{}", process::id(), name))
}

const SOURCE: &str = "\
# copy a constant around
LOAD_CONST, B=5, C=100
LOAD_MEM, B=6, C=5
STORE_MEM, B=6, C=9, # registers[9] = registers[6]
";

#[test]
fn assembled_file_reloads_identically() {
  let words = assemble(&parse_rows(SOURCE).unwrap()).unwrap();
  let path = scratch_file("reload.bin");

  let size = write_program(&path, &words).unwrap();
  assert_eq!(size, words.len() * 8);
  assert_eq!(fs::metadata(&path).unwrap().len(), size as u64);

  let reloaded = read_program(&path).unwrap();
  fs::remove_file(&path).unwrap();
  assert_eq!(reloaded, words);
}

#[test]
fn assemble_then_interpret() {
  let words = assemble(&parse_rows(SOURCE).unwrap()).unwrap();
  let path = scratch_file("run.bin");
  write_program(&path, &words).unwrap();
  let program = read_program(&path).unwrap();
  fs::remove_file(&path).unwrap();

  let window = interpreter::run(&program, 5, 9).unwrap();
  assert_eq!(
    window.rows().collect::<Vec<_>>(),
    vec![(5, 100), (6, 100), (7, 0), (8, 0), (9, 100)]
  );
}

#[test]
fn truncated_file_is_rejected() {
  let words = assemble(&parse_rows("LOAD_CONST, B=1, C=2").unwrap()).unwrap();
  let path = scratch_file("truncated.bin");
  write_program(&path, &words).unwrap();

  let mut bytes = fs::read(&path).unwrap();
  bytes.truncate(5);
  fs::write(&path, &bytes).unwrap();

  let result = read_program(&path);
  fs::remove_file(&path).unwrap();
  assert!(matches!(result, Err(Error::TruncatedWord { length: 5 })));
}

#[test]
fn unknown_mnemonic_produces_no_words() {
  let rows = parse_rows("LOAD_CONST, B=1, C=2\nHALT\nLOAD_CONST, B=2, C=3").unwrap();
  match assemble(&rows) {
    Err(error) => {
      assert_eq!(error.to_string(), "row 2: unknown mnemonic `HALT`");
    }
    Ok(words) => panic!("assembled {} words", words.len()),
  }
}
