//! Interactive read-eval-print loop.
//!
//! One VM lives for the whole session, so definitions persist from line
//! to line. Errors of both kinds have already been printed by the time
//! `interpret` returns; the loop just moves on to the next line.

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use rill_vm::Vm;

const PROMPT: &str = ">>> ";

pub(crate) fn run_repl() -> anyhow::Result<()> {
    info!("starting repl");

    let mut editor = DefaultEditor::new().context("initializing line editor")?;
    let mut vm = Vm::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                // Diagnostics were already printed; the session goes on.
                let _ = vm.interpret(&line);
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                println!();
                return Ok(());
            }
            Err(err) => return Err(err).context("reading input line"),
        }
    }
}
