//! Error taxonomy.
//!
//! `InvalidInput` is the only error kind: too few points or indices, or a
//! malformed index array. It is detected synchronously at the start of a
//! call and no partial result is ever returned. Numerically degenerate
//! inputs (0/1/2-dimensional point clouds) are not errors; they produce a
//! well-defined, possibly zero-extent box.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MinBoxError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
