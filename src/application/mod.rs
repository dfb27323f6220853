//! Unsigned transaction pipeline: instruction assembly, message building and
//! response formatting. Nothing in here signs or submits a transaction.

pub mod app;
pub mod builder;
pub mod formatter;
pub mod instructions;
