use std::fmt;

use thiserror::Error;

use crate::runtime::value::ObjectHolder;

/// User-visible evaluation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Expected a class instance, got {type_name}")]
    ExpectedInstance { type_name: &'static str },
    #[error("Unknown method '{method}' for class {class}")]
    UnknownMethod { method: String, class: String },
    #[error("{operation} is not supported for these operands")]
    UnsupportedOperands { operation: &'static str },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Cannot compare objects for {comparison}")]
    CannotCompare { comparison: &'static str },
    #[error("Return outside of a method body")]
    ReturnOutsideMethod,
    #[error("Output stream error")]
    OutputStream,
}

impl From<fmt::Error> for RuntimeError {
    fn from(_: fmt::Error) -> Self {
        RuntimeError::OutputStream
    }
}

/// Early termination of an `execute` call: a `return` unwinding to its
/// enclosing method body, or a runtime failure unwinding to the driver.
///
/// Both ride the `Err` channel so `?` propagates them, but only `Error` is
/// ever user-visible; `Return` is consumed by the method body that owns it.
#[derive(Debug, Clone)]
pub enum Unwind {
    Return(ObjectHolder),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

impl From<fmt::Error> for Unwind {
    fn from(error: fmt::Error) -> Self {
        Unwind::Error(error.into())
    }
}

pub type ExecResult = Result<ObjectHolder, Unwind>;
