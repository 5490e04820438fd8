// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error taxonomy.
//!
//! Every error aborts the current encode/decode call in full. Registries are
//! never mutated by a failing call, so a caller may simply report the failure
//! and move on to the next request.

use thiserror::Error;

/// Errors produced by the registries, the encoders and the decoder.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Registration-time bug (unregistered namespace prefix, conflicting
    /// namespace or tag registration). Never recovered at request time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The incoming markup cannot be mapped onto a resource (unknown element
    /// type, missing identity-forming attributes, malformed XML or GURN).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Caller-supplied or data-model inconsistency (href collision, value
    /// that does not match its property type, dangling reference).
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// The persistence collaborator rejected a save.
    #[error("Persistence error: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Coarse error class, used by RPC layers to pick a failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Schema,
    Consistency,
    Persistence,
}

impl CodecError {
    /// Class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Configuration(_) => ErrorKind::Configuration,
            CodecError::Schema(_) => ErrorKind::Schema,
            CodecError::Consistency(_) => ErrorKind::Consistency,
            CodecError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        CodecError::Configuration(msg.into())
    }

    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        CodecError::Schema(msg.into())
    }

    pub(crate) fn consistency(msg: impl Into<String>) -> Self {
        CodecError::Consistency(msg.into())
    }
}

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CodecError>;
