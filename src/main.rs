use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use bitasm::bytecode::{assemble, hex_dump, Instruction};
use bitasm::interpreter;
use bitasm::program::{read_program, write_program};
use bitasm::source::parse_rows;
use bitasm::Result;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assembler and interpreter for a tiny 64 bit instruction set")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Packs source rows into a binary program.
  Assemble {
    /// Source file, one `MNEMONIC, FIELD=VALUE, ...` row per line
    src: PathBuf,
    /// Binary output file
    #[arg(required_unless_present = "dump")]
    out: Option<PathBuf>,
    /// Print each word as bytes instead of writing the binary
    #[arg(long, visible_alias = "test")]
    dump: bool,
  },
  /// Runs a binary program and reports registers `START..=END`.
  Interpret {
    program: PathBuf,
    start: usize,
    end: usize,
    /// Write the report as CSV to this file instead of printing a table
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Lists the instructions of a binary program.
  Disassemble {
    program: PathBuf,
  },
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {

    Command::Assemble { src, out, dump } => {
      let text = fs::read_to_string(&src)?;
      let words = assemble(&parse_rows(&text)?)?;
      match (dump, out) {
        (false, Some(out)) => {
          let size = write_program(&out, &words)?;
          println!("Wrote {} bytes to {}", size, out.display());
        }
        _ => {
          if !words.is_empty() {
            println!("{}", hex_dump(&words));
          }
        }
      }
    }

    Command::Interpret { program, start, end, output } => {
      let words = read_program(&program)?;
      let window = interpreter::run(&words, start, end)?;
      match output {
        Some(path) => {
          window.write_csv(fs::File::create(&path)?)?;
          println!("Wrote registers {}..={} to {}", window.start(), window.end(), path.display());
        }
        None       => print!("{}", window),
      }
    }

    Command::Disassemble { program } => {
      let words = read_program(&program)?;
      for (index, word) in words.iter().enumerate() {
        let instruction = Instruction::decode(*word).map_err(|e| e.at_word(index))?;
        println!("{:>5}: {:#018X}  {}", index, word, instruction);
      }
    }

  }
  Ok(())
}

fn main() {
  let cli = Cli::parse();
  if let Err(e) = run(cli) {
    eprintln!("Error: {}", e);
    process::exit(1);
  }
}
