//! End-to-end tests over the `rill` binary: the canonical scenarios, the
//! exit-code contract, and the stdout/stderr split.

use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

/// Writes a script into a fresh temp dir and returns its path (keeping
/// the dir alive alongside).
fn script(source: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("script.rl");
    let mut file = std::fs::File::create(&path).expect("create script");
    file.write_all(source.as_bytes()).expect("write script");
    (dir, path)
}

fn rill() -> Command {
    Command::cargo_bin("rill").expect("binary builds")
}

#[test]
fn test_arithmetic_precedence() {
    let (_dir, path) = script("print 1 + 2 * 3;");
    rill().arg(&path).assert().success().stdout("'7'\n");
}

#[test]
fn test_string_concatenation() {
    let (_dir, path) = script("let a = \"foo\"; let b = \"bar\"; print a + b;");
    rill().arg(&path).assert().success().stdout("\"foobar\"\n");
}

#[test]
fn test_for_loop_sum() {
    let (_dir, path) =
        script("let n = 0; for (let i = 0; i < 5; i = i + 1) { n = n + i; } print n;");
    rill().arg(&path).assert().success().stdout("'10'\n");
}

#[test]
fn test_recursive_factorial() {
    let (_dir, path) =
        script("fn fact(n) { if (n < 2) return 1; return n * fact(n - 1); } print fact(5);");
    rill().arg(&path).assert().success().stdout("'120'\n");
}

#[test]
fn test_undefined_variable_exits_70() {
    let (_dir, path) = script("print x;");
    rill()
        .arg(&path)
        .assert()
        .code(70)
        .stdout("")
        .stderr(predicate::str::contains("Undefined variable 'x'"));
}

#[test]
fn test_add_type_error_exits_70() {
    let (_dir, path) = script("1 + \"a\";");
    rill()
        .arg(&path)
        .assert()
        .code(70)
        .stderr(predicate::str::contains(
            "Operands must be two strings or two numbers",
        ));
}

#[test]
fn test_compile_error_exits_65() {
    let (_dir, path) = script("let = 1;");
    rill()
        .arg(&path)
        .assert()
        .code(65)
        .stdout("")
        .stderr(predicate::str::contains("[line 1] Error"));
}

#[test]
fn test_compile_error_names_the_lexeme() {
    let (_dir, path) = script("print 1\nprint 2;");
    rill().arg(&path).assert().code(65).stderr(predicate::str::contains(
        "[line 2] Error at 'print': Expected ';' after value.",
    ));
}

#[test]
fn test_runtime_error_has_stack_trace() {
    let (_dir, path) = script("fn inner() { return missing; }\nfn outer() { return inner(); }\nouter();");
    rill()
        .arg(&path)
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Undefined variable 'missing'"))
        .stderr(predicate::str::contains("in inner()"))
        .stderr(predicate::str::contains("in outer()"))
        .stderr(predicate::str::contains("in script"));
}

#[test]
fn test_missing_file_exits_74() {
    rill()
        .arg("definitely/not/here.rl")
        .assert()
        .code(74)
        .stderr(predicate::str::contains("Couldn't open file : '"));
}

#[test]
fn test_extra_arguments_exit_64_with_usage() {
    rill()
        .args(["one.rl", "two.rl"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Usage: rill [filepath]"));
}

#[test]
fn test_program_output_and_diagnostics_are_split() {
    // Output printed before the runtime error stays on stdout; the error
    // goes to stderr.
    let (_dir, path) = script("print 1; print missing;");
    rill()
        .arg(&path)
        .assert()
        .code(70)
        .stdout("'1'\n")
        .stderr(predicate::str::contains("Undefined variable 'missing'"));
}

#[test]
fn test_truthiness_of_zero_pinned_end_to_end() {
    let (_dir, path) = script("if (0) print \"truthy\"; else print \"falsey\";");
    rill().arg(&path).assert().success().stdout("\"falsey\"\n");
}

#[test]
fn test_emit_bytecode_disassembles_without_running() {
    let (_dir, path) = script("fn add(a, b) { return a + b; } print add(1, 2);");
    rill()
        .arg("--emit-bytecode")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("== <script> =="))
        .stdout(predicate::str::contains("== <fn add> =="))
        .stdout(predicate::str::contains("OP_RETURN"))
        // Not executed: the program's own output must not appear.
        .stdout(predicate::str::contains("'3'").not());
}

#[test]
fn test_emit_bytecode_on_broken_script_exits_65() {
    let (_dir, path) = script("print ;");
    rill()
        .arg("--emit-bytecode")
        .arg(&path)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Expected expression."));
}

#[test]
fn test_repl_interprets_lines_and_keeps_state() {
    rill()
        .write_stdin("let a = 20;\nprint a + 1;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'21'"));
}

#[test]
fn test_repl_survives_errors() {
    rill()
        .write_stdin("print missing;\nprint 2;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'2'"))
        .stderr(predicate::str::contains("Undefined variable 'missing'"));
}

#[test]
fn test_multiline_script_reports_correct_line() {
    let (_dir, path) = script("print 1;\nprint 2;\nprint missing;\n");
    rill()
        .arg(&path)
        .assert()
        .code(70)
        .stderr(predicate::str::contains("[line 3] in script"));
}
