//! rill-drv - Interpreter Driver
//!
//! ============================================================================
//! DRIVER OVERVIEW
//! ============================================================================
//!
//! The driver is the entry point and orchestrator: it parses the command
//! line, initializes logging, and hands source text to the VM.
//!
//! ```text
//! argv
//!   │
//!   ├── no script ──▶ [REPL] ── line by line ──▶ Vm::interpret
//!   │
//!   ├── script ─────▶ [read file] ─────────────▶ Vm::interpret
//!   │                       │
//!   │                       └── --emit-bytecode ──▶ compile + disassemble
//!   │
//!   └── anything else ──▶ usage banner, exit 64
//! ```
//!
//! EXIT CODES:
//! -----------
//! | Code | Meaning                        |
//! |------|--------------------------------|
//! | 0    | success                        |
//! | 64   | command-line usage error       |
//! | 65   | compile error                  |
//! | 70   | runtime error                  |
//! | 74   | could not read the source file |
//!
//! STREAMS:
//! --------
//! Program output (`print`) goes to stdout; every diagnostic (compile
//! errors, runtime errors, stack traces, log output) goes to stderr, so
//! piped program output stays clean.
//!
//! LOGGING:
//! --------
//! `RILL_LOG` selects tracing levels (`RILL_LOG=rill_vm=trace` streams
//! per-instruction dispatch). Logging is off by default.

mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rill_runtime::debug::disassemble_chunk;
use rill_runtime::{Heap, Obj, ObjRef, Value};
use rill_util::Handler;
use rill_vm::{InterpretError, Vm};

/// Usage banner printed on argument errors, styled after classic Unix
/// interpreters: the one-line description, the invocation, the modes.
const USAGE: &str = "\
Rill - stack-based bytecode interpreter for the Rill language.

Usage: rill [filepath]

Options:
    repl - Run the interpreter without any arguments to open a live repl.
    filepath - Provide a path to a .rl file to compile and run it.
";

#[derive(Parser, Debug)]
#[command(name = "rill", version, about = "Interpreter for the Rill scripting language")]
struct Cli {
    /// Script to run; omit to start the REPL.
    script: Option<PathBuf>,

    /// Compile only and print the disassembled bytecode.
    #[arg(long)]
    emit_bytecode: bool,
}

/// Parses the command line and runs the requested mode; returns the
/// process exit code.
pub fn run() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprint!("{USAGE}");
            return ExitCode::from(64);
        }
    };

    match cli.script {
        Some(script) if cli.emit_bytecode => emit_bytecode(&script),
        Some(script) => run_file(&script),
        None => match repl::run_repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("repl error: {err:#}");
                ExitCode::from(74)
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RILL_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs a script file to completion, mapping the outcome to an exit code.
fn run_file(path: &Path) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::from(74);
    };

    let mut vm = Vm::new();
    match vm.interpret(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(InterpretError::Compile(_)) => ExitCode::from(65),
        Err(InterpretError::Runtime(_)) => ExitCode::from(70),
    }
}

/// Compiles a script and prints its bytecode without executing it.
fn emit_bytecode(path: &Path) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::from(74);
    };

    let mut heap = Heap::new();
    let mut handler = Handler::new();
    let script = match rill_compile::compile(&source, &mut heap, &mut handler) {
        Ok(script) => script,
        Err(_) => return ExitCode::from(65),
    };

    // The script first, then every function it transitively carries in
    // its constant pools, in discovery order.
    let mut worklist = vec![script];
    let mut index = 0;
    while index < worklist.len() {
        let handle = worklist[index];
        index += 1;
        let function = heap.function(handle);
        worklist.extend(function.chunk.constants.iter().filter_map(|&constant| {
            nested_function(&heap, constant)
        }));
        print!("{}", disassemble_chunk(&function.chunk, &chunk_name(&heap, handle), &heap));
    }
    ExitCode::SUCCESS
}

fn nested_function(heap: &Heap, constant: Value) -> Option<ObjRef> {
    let r = constant.as_obj()?;
    matches!(heap.get(r), Obj::Fun(_)).then_some(r)
}

fn chunk_name(heap: &Heap, function: ObjRef) -> String {
    match heap.function(function).name {
        Some(name) => format!("<fn {}>", heap.string(name).chars),
        None => "<script>".to_string(),
    }
}

fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(_) => {
            eprintln!("Couldn't open file : '{}'", path.display());
            None
        }
    }
}
