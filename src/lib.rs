//! `mython` interpreter core.
//!
//! High-level layout:
//! - frontend: `lexer` turns Mython source text into an indentation-aware
//!   token stream (`token`) for an external recursive-descent parser
//! - `runtime`: the dynamic object model behind shared nullable handles
//! - `ast`: syntax tree nodes and their tree-walking evaluation
//! - `interpreter`: the embedding facade a program driver runs against
pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod runtime;
pub mod token;
