//! Compilation of facade statements into the SQL AST
//!
//! - [`predicate`]: the predicate-builder protocol and its AST-backed builder
//! - [`filter`]: walks filter trees and flat expression lists into a builder
//! - [`statement`]: assembles select, insert, update and delete statements
//! - [`registry`]: the per-dialect [`Compiler`] and its shared registry

pub mod filter;
pub mod predicate;
mod registry;
pub mod statement;

pub use registry::Compiler;
