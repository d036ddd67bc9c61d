/*!
  An assembler and interpreter for a tiny fixed-width instruction set. Rows of
  `MNEMONIC, FIELD=VALUE, ...` are packed into 64 bit words, and a program of such words is
  executed against a flat array of registers, of which a window is reported.

  The pipeline is this:
  ```text
  text -> [`source::parse_rows`] -> `Row`s -> [`bytecode::assemble`] -> words ->⋯

  ⋯-> [`program::write_program`] -> file -> [`program::read_program`] -> words ->⋯

  ⋯-> [`interpreter::run`] -> `RegisterWindow`
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod error;
pub mod interpreter;
pub mod program;
pub mod registers;
pub mod source;

pub use error::{Error, Result};
