/*!
  The human readable form of a program is a list of rows, each a mnemonic followed by
  field assignments. This module turns rows into words, and words into the diagnostic
  byte listing.

  The grammar of a row, after it has been split into tokens, is:
    ```text
    <row>        ::= <mnemonic> (',' <token>)*
    <token>      ::= <assignment> <comment>? | <comment>
    <assignment> ::= <field> '=' <number>
    <number>     ::= <decimal> | '0x' <hexadecimal>
    <comment>    ::= '#' .*
    ```
  A comment ends the row and everything after it is ignored, including later tokens. Any
  other token is an error.
  Field `A` is never written by hand; it is filled in from the mnemonic.
*/

use nom::{
  branch::alt,
  bytes::complete::tag,
  character::complete::{
    alpha1,
    char as one_char,
    digit1,
    hex_digit1,
    space0
  },
  combinator::{all_consuming, map_res},
  sequence::{delimited, preceded, separated_pair},
  IResult
};

use super::binary::encode;
use super::instruction::{FieldValues, OPCODE_FIELD};
use super::table::INSTRUCTION_TABLE;
use super::Word;
use crate::error::{Error, Result};

const COMMENT_MARKER: char = '#';

/// One already tokenized source row. `line` is reported in errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
  pub line     : usize,
  pub mnemonic : String,
  pub tokens   : Vec<String>,
}

impl Row {
  pub fn new(line: usize, mnemonic: &str, tokens: &[&str]) -> Row {
    Row {
      line,
      mnemonic: mnemonic.to_string(),
      tokens: tokens.iter().map(|token| token.to_string()).collect(),
    }
  }
}

/// What one token holds: an assignment, a comment, or an assignment followed by a comment.
struct Token<'a> {
  assignment : Option<(&'a str, u64)>,
  ends_row   : bool,
}

fn number(input: &str) -> IResult<&str, u64> {
  alt((
    map_res(
      preceded(alt((tag("0x"), tag("0X"))), hex_digit1),
      |digits: &str| u64::from_str_radix(digits, 16)
    ),
    map_res(digit1, |digits: &str| digits.parse::<u64>()),
  ))(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, u64)> {
  all_consuming(
    separated_pair(
      delimited(space0, alpha1, space0),
      one_char('='),
      delimited(space0, number, space0),
    )
  )(input)
}

fn parse_token(token: &str) -> Result<Token<'_>> {
  let (body, ends_row) = match token.find(COMMENT_MARKER) {
    Some(at) => (token[..at].trim(), true),
    None     => (token.trim(), false),
  };
  if body.is_empty() && ends_row {
    return Ok(Token { assignment: None, ends_row });
  }
  match assignment(body) {
    Ok((_rest, pair)) => Ok(Token { assignment: Some(pair), ends_row }),
    Err(_e) => Err(Error::MalformedToken(token.to_string())),
  }
}

fn assemble_row(row: &Row) -> Result<Word> {
  let spec = INSTRUCTION_TABLE.by_mnemonic(row.mnemonic.trim())?;

  let mut values = FieldValues::new();
  values.insert(OPCODE_FIELD.name, spec.code() as u64);

  for token in row.tokens.iter() {
    let parsed = parse_token(token)?;

    if let Some((name, value)) = parsed.assignment {
      if name == OPCODE_FIELD.name {
        return Err(Error::ReservedField(name.to_string()));
      }
      let field = match spec.field(name) {
        Some(field) => field,
        None => {
          return Err(Error::UnknownField { mnemonic: spec.name(), field: name.to_string() });
        }
      };
      if values.insert(field.name, value).is_some() {
        return Err(Error::DuplicateField(field.name));
      }
    }

    if parsed.ends_row {
      break;
    }
  }

  encode(spec, &values)
}

/// Assembles every row in order. The first failing row aborts assembly and no words are
/// returned.
pub fn assemble(rows: &[Row]) -> Result<Vec<Word>> {
  rows.iter()
      .map(|row| {
        let word = assemble_row(row).map_err(|e| e.at_row(row.line))?;
        #[cfg(feature = "trace_execution")]
        eprintln!("row {:>4}: {:<10} -> {:#018X}", row.line, row.mnemonic, word);
        Ok(word)
      })
      .collect()
}

/// The 8 bytes of a word as `0xHH` tokens, most significant byte first.
pub fn format_word(word: Word) -> String {
  word.to_be_bytes()
      .iter()
      .map(|byte| format!("0x{:02X}", byte))
      .collect::<Vec<String>>()
      .join(" ")
}

/// One `format_word` line per instruction.
pub fn hex_dump(words: &[Word]) -> String {
  words.iter()
       .map(|word| format_word(*word))
       .collect::<Vec<String>>()
       .join("\n")
}
