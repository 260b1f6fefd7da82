use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error as ThisError;

use crate::object::Object;
use crate::token::{Token, Type};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Checks if an error occurred during scanning, parsing, resolving or running.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::SeqCst) || HAD_RUNTIME_ERROR.load(Ordering::SeqCst)
}

/// Checks if an error occurred during the interpret phase specifically.
pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::SeqCst)
}

/// Resets the error flags. Used by the REPL between lines.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::SeqCst);
    HAD_RUNTIME_ERROR.store(false, Ordering::SeqCst);
}

/// Every diagnostic type implements this so callers can report without
/// caring which phase produced it.
pub trait Error {
    /// Prints the diagnostic to stderr and flips the relevant flag.
    fn throw(&self);
}

/// An error raised while turning source text into tokens.
#[derive(Debug, ThisError)]
#[error("[line {line}] Error : {message}")]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("{self}");
        HAD_ERROR.store(true, Ordering::SeqCst);
    }
}

/// An error raised while building the AST from tokens.
#[derive(Debug, ThisError)]
#[error("[line {}] Error {}: {message}", self.token.line(), self.at())]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    fn at(&self) -> String {
        if self.token.r#type == Type::Eof {
            "at end".to_string()
        } else {
            format!("at '{}'", self.token.lexeme)
        }
    }
}

impl Error for ParseError {
    fn throw(&self) {
        eprintln!("{self}");
        HAD_ERROR.store(true, Ordering::SeqCst);
    }
}

/// An error raised while resolving variable scopes, prior to execution.
#[derive(Debug, ThisError)]
#[error("[line {line}] Error : {message}")]
pub struct ResolveError {
    pub line: usize,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        eprintln!("{self}");
        HAD_ERROR.store(true, Ordering::SeqCst);
    }
}

/// An error raised while evaluating the AST.
#[derive(Debug, Clone, ThisError)]
#[error("{message} [line {}]", self.token.line())]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        RuntimeError { token, message: message.into() }
    }
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!("{self}");
        HAD_RUNTIME_ERROR.store(true, Ordering::SeqCst);
    }
}

/// Anything that can interrupt statement execution: either a genuine
/// runtime error or a `ret` unwinding towards its call frame.
#[derive(Debug, Clone)]
pub enum Unwind {
    Error(RuntimeError),
    Return(Object),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}
