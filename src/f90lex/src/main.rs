// f90lex/src/main.rs

use anyhow::Result;
use clap::Parser;
use f90lex::cli::{build_config, lex_file, Mode};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "f90lex")]
#[command(about = "Lossless lexer and preprocessor for free-form Fortran", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file to lex
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Mode::Roundtrip)]
    mode: Mode,

    /// Directory #include paths are resolved against
    #[arg(short = 'I', long, value_name = "DIR", env = "F90LEX_INCLUDE_ROOT")]
    include_root: Option<PathBuf>,

    /// Predefine a macro as NAME or NAME=BODY
    #[arg(short = 'D', long = "define", value_name = "NAME[=BODY]")]
    defines: Vec<String>,

    /// Deepest allowed #include nesting
    #[arg(long, value_name = "N")]
    max_include_depth: Option<usize>,

    /// Fail if the roundtrip output differs from the input
    #[arg(long)]
    check: bool,
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = build_config(cli.include_root, &cli.defines, cli.max_include_depth)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    lex_file(&cli.file, cli.mode, &config, cli.check, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
