//! The brioc command-line interface.
//!
//! Subcommands map onto the pipeline stages: `run` interprets a
//! program (the process exits with `main()`'s value), `build` emits
//! Java source, and `tokens` / `ast` dump intermediate representations
//! for debugging. Each invocation loads its source file into a
//! [`Session`], which drives the phases and renders diagnostics as
//! `file:line:col: message`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use brioc_drv::{Session, Value};
use clap::{Parser, Subcommand};
use num_traits::ToPrimitive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compiler and interpreter for the Brio language.
#[derive(Parser, Debug)]
#[command(name = "brioc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler and interpreter for the Brio language", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, env = "BRIOC_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interpret a program; the exit code is main()'s return value
    Run {
        /// Source file to run
        file: PathBuf,
    },

    /// Transpile a program to Java source
    Build {
        /// Source file to build
        file: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the token stream
    Tokens {
        /// Source file to lex
        file: PathBuf,
    },

    /// Dump the parsed AST
    Ast {
        /// Source file to parse
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Run { file } => cmd_run(&file),
        Commands::Build { file, output } => cmd_build(&file, output.as_deref()),
        Commands::Tokens { file } => cmd_tokens(&file),
        Commands::Ast { file } => cmd_ast(&file),
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    Ok(())
}

fn cmd_run(path: &Path) -> anyhow::Result<ExitCode> {
    let session = load(path)?;
    let mut stdout = io::stdout();
    let value = session
        .run(&mut stdout)
        .map_err(|err| anyhow::anyhow!(session.render(&err)))?;

    // The program's exit value is main()'s Integer result; anything
    // else (a main that fell off its end) exits cleanly.
    let code = match value {
        Value::Integer(n) => n.to_u8().unwrap_or(1),
        _ => 0,
    };
    Ok(ExitCode::from(code))
}

fn cmd_build(path: &Path, output: Option<&Path>) -> anyhow::Result<ExitCode> {
    let session = load(path)?;
    let java = session
        .compile()
        .map_err(|err| anyhow::anyhow!(session.render(&err)))?;

    match output {
        Some(out_path) => fs::write(out_path, java)
            .with_context(|| format!("failed to write {}", out_path.display()))?,
        None => print!("{}", java),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_tokens(path: &Path) -> anyhow::Result<ExitCode> {
    let session = load(path)?;
    let tokens = session
        .tokens()
        .map_err(|err| anyhow::anyhow!(session.render(&err)))?;
    for token in tokens {
        println!("{}", token);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_ast(path: &Path) -> anyhow::Result<ExitCode> {
    let session = load(path)?;
    let source = session
        .front()
        .map_err(|err| anyhow::anyhow!(session.render(&err)))?;
    println!("{:#?}", source);
    Ok(ExitCode::SUCCESS)
}

fn load(path: &Path) -> anyhow::Result<Session> {
    Session::load(path).with_context(|| format!("failed to read {}", path.display()))
}
