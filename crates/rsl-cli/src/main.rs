//! Command-line runner for RSL programs.
//!
//! Pipeline: read the source file, lex, parse, then interpret starting
//! from `main`. Compile errors are reported together (up to the error
//! cap); runtime errors stop execution and print a stack trace.

use clap::Parser as CliParser;
use rsl_eval::{EvalError, Interpreter, TextTracer};
use rsl_lexer::Lexer;
use rsl_parser::Parser;
use rsl_types::{CompileErrors, ErrorCode, RslError, SourceFile, Span};
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_USAGE: u8 = 1;
const EXIT_COMPILE: u8 = 2;
const EXIT_RUNTIME: u8 = 3;

#[derive(CliParser)]
#[command(name = "rsl", version, about = "Run RSL robot programs")]
struct Cli {
    /// The program file to execute.
    program: PathBuf,

    /// Write a call trace of user functions to this file.
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Echo robot and obstacle changes as text on stdout.
    #[arg(long)]
    txt_trace: bool,

    /// Report compile errors as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run(cli: &Cli) -> Result<(), u8> {
    let file_name = cli.program.display().to_string();
    let source = fs::read_to_string(&cli.program).map_err(|e| {
        eprintln!("error: cannot read {file_name}: {e}");
        EXIT_USAGE
    })?;
    let source_file = SourceFile::new(&file_name, &source);

    let lexed = Lexer::new(&source_file).lex();
    let result = Parser::new(lexed.tokens, &source_file).parse();
    let mut errors = lexed.errors;
    errors.extend(result.errors);
    if errors.has_errors() {
        report_compile_errors(&errors, cli.json);
        return Err(EXIT_COMPILE);
    }
    let program = result.program.ok_or_else(|| {
        eprintln!("error: {file_name}: empty program");
        EXIT_COMPILE
    })?;

    let mut interp = match Interpreter::new(&program) {
        Ok(interp) => interp,
        Err(e) => {
            report_load_error(&file_name, &e, cli.json);
            return Err(EXIT_COMPILE);
        }
    };
    interp = interp.with_txt_trace(cli.txt_trace);
    if let Some(trace_path) = &cli.trace {
        let file = fs::File::create(trace_path).map_err(|e| {
            eprintln!("error: cannot create {}: {e}", trace_path.display());
            EXIT_USAGE
        })?;
        interp = interp.with_tracer(Box::new(TextTracer::new(BufWriter::new(file))));
    }

    if let Err(e) = interp.run() {
        eprintln!("runtime error: {e}");
        eprint!("{}", interp.stack_trace());
        return Err(EXIT_RUNTIME);
    }
    Ok(())
}

/// Prints collected compile errors, human-readable or as JSON.
fn report_compile_errors(errors: &CompileErrors, json: bool) {
    if json {
        match serde_json::to_string_pretty(errors) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: cannot serialize errors: {e}"),
        }
        return;
    }
    for error in &errors.errors {
        eprintln!("{error}");
        if !error.source_line.is_empty() {
            eprintln!("    {}", error.source_line.trim_end());
        }
    }
    let hidden = errors.total_errors.saturating_sub(errors.errors.len());
    if hidden > 0 {
        eprintln!("... and {hidden} more errors");
    }
}

/// Converts a load failure (duplicate function, missing `main`) into
/// the structured error format used for compile errors.
fn report_load_error(file_name: &str, error: &EvalError, json: bool) {
    let code = match error {
        EvalError::DuplicateFunction { .. } => ErrorCode::DUPLICATE_FUNCTION,
        _ => ErrorCode::MISSING_MAIN,
    };
    let rsl_error = RslError::new(file_name, code, error.to_string(), Span::point(1, 1), "");
    let mut errors = CompileErrors::empty();
    errors.push_error(rsl_error);
    report_compile_errors(&errors, json);
}
