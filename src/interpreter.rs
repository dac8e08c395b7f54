//! Embedding facade.
//!
//! A parsed program is some root statement; running it means executing that
//! statement against an initially empty closure and a `Context` supplying
//! the output stream. Errors abort evaluation at the first failure and
//! surface at this boundary.

use anyhow::Result;

use crate::ast::Statement;
use crate::runtime::{Closure, Context, ObjectHolder, RuntimeError, StringContext, Unwind};

pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Runs `program` with a fresh empty closure and returns everything it
    /// printed. Output produced before a failure is discarded; use
    /// [`Interpreter::run_with_context`] to keep it.
    pub fn run(&self, program: &Statement) -> Result<String> {
        let mut context = StringContext::new();
        self.run_with_context(program, &mut context)?;
        Ok(context.into_output())
    }

    /// Runs `program` against a caller-supplied context. Output already
    /// written to the context stays there when evaluation fails.
    pub fn run_with_context(
        &self,
        program: &Statement,
        context: &mut dyn Context,
    ) -> std::result::Result<ObjectHolder, RuntimeError> {
        let mut closure = Closure::new();
        match program.execute(&mut closure, context) {
            Ok(result) => Ok(result),
            Err(Unwind::Return(_)) => Err(RuntimeError::ReturnOutsideMethod),
            Err(Unwind::Error(error)) => Err(error),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
