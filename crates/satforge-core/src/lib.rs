//! satforge-core — Exam data model, question store, selector, and assembler.
//!
//! This crate defines the fundamental types and the assembly pipeline that
//! the rest of satforge builds on. Everything here is synchronous and pure:
//! the selector, assembler, and their data types never touch the network or
//! (beyond the corpus/plan loading helpers) the filesystem.

pub mod assembler;
pub mod corpus;
pub mod error;
pub mod model;
pub mod plan;
pub mod selector;
pub mod store;
