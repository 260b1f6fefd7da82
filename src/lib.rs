#![allow(clippy::needless_return)]

//! Nex is a dynamically typed, object-oriented scripting language with
//! lexical scoping, first-class functions, and single-inheritance classes.
//! This crate is a tree-walk interpreter for it: source text is scanned
//! into tokens, parsed into an AST, statically resolved, and then walked
//! directly by the interpreter. There is no bytecode stage.
//!
//! ## Scanning
//! [`scanner::Scanner`] turns source text into a flat token stream. It is
//! a hand-written state machine over a peekable character iterator.
//! Lexical problems (an unterminated string, an unrecognized character)
//! are reported as [`error::ScanError`]; the scanner keeps going after a
//! bad token so a single pass can surface more than one problem.
//!
//! ## Parsing
//! [`parser::Parser`] is a recursive-descent parser that turns the token
//! stream into a list of [`stmt::Stmt`]. Statements do not produce a
//! value; [`expr::Expr`] nodes do, evaluating to an [`object::Object`].
//! Syntax errors are reported as [`error::ParseError`] and recovered from
//! by synchronizing on the next statement boundary, so a single parse can
//! surface more than one mistake.
//!
//! ## Resolving
//! [`resolver::Resolver`] performs a static pass over the AST before any
//! of it runs, binding every variable reference to the lexical scope
//! distance the interpreter should use and rejecting constructs that
//! parse fine but are never legal — `ret` outside a function, `this`
//! outside a class, a variable read from its own initializer. These are
//! reported as [`error::ResolveError`]; the pipeline does not reach the
//! interpreter if any were raised.
//!
//! ## Interpreting
//! [`interpreter::Interpreter`] walks the resolved AST and evaluates it.
//! It owns the live [`environment::Environment`] chain and the resolver's
//! locals side table. Problems that can only be caught while a program
//! runs — dividing by zero, calling something that is not callable — are
//! reported as [`error::RuntimeError`], which unwinds straight to
//! [`Nex::run_file`]/[`Nex::run_prompt`] without being caught partway.

use std::fs;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use expr::NodeId;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The script file passed on the command line could not be opened.
pub const EXIT_FILE_NOT_FOUND: i32 = 10;
/// Source failed to lex, parse, or resolve.
pub const EXIT_STATIC_ERROR: i32 = 65;
/// The program raised an uncaught runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;
/// Invalid command-line invocation.
pub const EXIT_USAGE: i32 = 64;

/// What stage a single run of the scan/parse/resolve/interpret pipeline
/// stopped at. Only the REPL cares about the distinction between a
/// lex/parse error (drop the line, keep going) and a resolver error
/// (the pipeline does not recover from this one).
enum RunResult {
    Completed,
    LexOrParseError,
    ResolveError,
}

/// Owns the persistent interpreter state across REPL lines, or for the
/// single run of a script file.
pub struct Nex {
    interpreter: Interpreter,
    // Carried across `run` calls so node ids never repeat within a
    // session: the interpreter's locals table is keyed by id and persists
    // across REPL lines, so two lines parsed from id 0 could collide and
    // clobber an earlier line's still-alive closure.
    next_id: NodeId,
}

impl Nex {
    pub fn new() -> Self {
        Nex { interpreter: Interpreter::new(), next_id: 0 }
    }

    /// Reads `path` as UTF-8 source and runs it once. Returns the process
    /// exit code the caller should use.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                log::error!("nex: could not open '{path}': {err}");
                return EXIT_FILE_NOT_FOUND;
            }
        };

        match self.run(&source) {
            RunResult::LexOrParseError | RunResult::ResolveError => EXIT_STATIC_ERROR,
            RunResult::Completed if error::did_runtime_error() => EXIT_RUNTIME_ERROR,
            RunResult::Completed => 0,
        }
    }

    /// Runs an interactive read-eval-print loop. Each line gets a fresh
    /// scanner, parser, and resolver, but the interpreter (and therefore
    /// its global environment) persists across lines. A lex or parse
    /// error drops the offending line; a resolver error ends the session
    /// with exit code 65, matching the non-interactive pipeline.
    pub fn run_prompt(&mut self) -> i32 {
        println!("Nex {}", env!("CARGO_PKG_VERSION"));

        let mut editor = DefaultEditor::new().expect("line editor should initialize over a real terminal");
        let history_path = history_path();
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        let exit_code = loop {
            match editor.readline("$ ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());

                    match self.run(&line) {
                        RunResult::ResolveError => break EXIT_STATIC_ERROR,
                        RunResult::LexOrParseError | RunResult::Completed => {}
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break 0,
                Err(err) => {
                    log::error!("nex: readline error: {err}");
                    break 0;
                }
            }
        };

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        exit_code
    }

    fn run(&mut self, source: &str) -> RunResult {
        error::reset_error();

        let tokens = Scanner::new(source).scan_tokens();
        if error::did_error() {
            return RunResult::LexOrParseError;
        }

        let mut parser = Parser::new(tokens, self.next_id);
        let statements = parser.parse();
        self.next_id = parser.next_available_id();
        if error::did_error() {
            return RunResult::LexOrParseError;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements);
        if error::did_error() {
            return RunResult::ResolveError;
        }

        self.interpreter.interpret(&statements);
        RunResult::Completed
    }
}

impl Default for Nex {
    fn default() -> Self {
        Self::new()
    }
}

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".nex_history"))
}

#[cfg(test)]
mod test {
    use super::*;

    /// A REPL session runs many lines through a fresh `Parser` each time
    /// while one `Interpreter` (and its locals table) persists for the
    /// whole session. If node ids reset to 0 per line, a later line can
    /// hand out an id a still-alive closure from an earlier line already
    /// depends on, clobbering its resolved depth.
    #[test]
    fn node_ids_stay_unique_across_lines_so_earlier_closures_keep_resolving() {
        let mut nex = Nex::new();

        assert!(matches!(
            nex.run("func make(n) { func inner() { ret n; } ret inner; } let c = make(42);"),
            RunResult::Completed
        ));
        assert!(!error::did_runtime_error());

        // Reuses small node ids a second time; before the fix this line's
        // `Variable` node for `y` collided with the still-live node id
        // `inner`'s `n` read resolved to on the previous line.
        assert!(matches!(nex.run("{ let y = 1; print(y); }"), RunResult::Completed));
        assert!(!error::did_runtime_error());

        assert!(matches!(nex.run("print(c());"), RunResult::Completed));
        assert!(!error::did_runtime_error(), "closure lookup corrupted by colliding node ids across REPL lines");
    }
}
