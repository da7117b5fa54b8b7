#![allow(dead_code)]

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Error};
use clap::{Parser, ValueEnum};

mod trace;

mod backend;
mod driver;
mod frontend;
mod midend;

mod hashmap_ooo_iter;

use driver::{CompileError, Program};
use frontend::TraceOrder;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum TraceLocation {
    #[value(name = "none")]
    NoTrace,
    Stdout,
    File,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<TraceLevel> for tracing::Level {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Trace => tracing::Level::TRACE,
            TraceLevel::Debug => tracing::Level::DEBUG,
            TraceLevel::Info => tracing::Level::INFO,
            TraceLevel::Warn => tracing::Level::WARN,
            TraceLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    /// Root-to-leaf, as the parser writes it
    Derivation,
    /// Bottom-up, one record per completed node
    Reduction,
}

impl From<Order> for TraceOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Derivation => TraceOrder::Derivation,
            Order::Reduction => TraceOrder::Reduction,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    /// Assembly for the downstream assembler
    Asm,
    /// The reconstructed syntax tree, as JSON
    Tree,
    /// Procedures, locals and frame offsets, as JSON
    Symbols,
}

/// Compiles a parser's reduction trace into assembly.
#[derive(Parser, Debug)]
#[clap(name = "wainc", version)]
struct CompilerArguments {
    /// Trace to compile; standard input when omitted
    input: Option<PathBuf>,

    /// Where to write the output; standard output when omitted
    #[clap(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Order of the records in the trace
    #[clap(long = "order", value_enum, default_value = "derivation")]
    order: Order,

    #[clap(long = "emit", value_enum, default_value = "asm")]
    emit: Emit,

    #[clap(long = "trace", value_enum, default_value = "none")]
    trace_location: TraceLocation,

    #[clap(long = "trace-level", value_enum, default_value = "warn")]
    trace_level: TraceLevel,

    #[clap(long = "trace-file", default_value = "most_recent")]
    trace_file: PathBuf,
}

fn init_tracing(arguments: &CompilerArguments) -> Result<(), Error> {
    let level = tracing::Level::from(arguments.trace_level);
    match arguments.trace_location {
        TraceLocation::NoTrace => (),
        TraceLocation::Stdout => {
            tracing_subscriber::fmt()
                .pretty()
                .with_writer(std::io::stdout)
                .with_max_level(level)
                .init();
        }
        TraceLocation::File => {
            let outfile = std::fs::File::create(&arguments.trace_file).with_context(|| {
                format!(
                    "Couldn't create trace file {}",
                    arguments.trace_file.display()
                )
            })?;
            let writer =
                tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::sync::Mutex::new(outfile));
            tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .with_max_level(level)
                .init();
        }
    }
    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<String, Error> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Couldn't read trace {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Couldn't read trace from standard input")?;
            Ok(text)
        }
    }
}

fn render(program: &Program, emit: Emit) -> Result<Result<String, CompileError>, Error> {
    Ok(match emit {
        Emit::Asm => program.assembly(),
        Emit::Tree => Ok(serde_json::to_string_pretty(program.tree())? + "\n"),
        Emit::Symbols => match program.symbols() {
            Ok(symbols) => Ok(serde_json::to_string_pretty(&symbols)? + "\n"),
            Err(error) => Err(error),
        },
    })
}

fn write_output(output: Option<&PathBuf>, text: &str) -> Result<(), Error> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Couldn't write output {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Couldn't write to standard output")
        }
    }
}

fn main() -> Result<(), Error> {
    let arguments = CompilerArguments::parse();
    init_tracing(&arguments)?;
    trace::debug!("{:?}", arguments);

    let text = read_input(arguments.input.as_ref())?;

    let compiled = match Program::from_trace(&text, arguments.order.into()) {
        Ok(program) => render(&program, arguments.emit)?,
        Err(error) => Err(error),
    };

    match compiled {
        Ok(output) => write_output(arguments.output.as_ref(), &output),
        Err(error) => {
            trace::error!("compilation failed: {}", error);
            eprintln!("ERROR: {}", error);
            std::process::exit(1);
        }
    }
}
