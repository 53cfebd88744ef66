// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type.
//!
//! Lookups that find nothing (no match, nothing to remove) are not errors; they return
//! `None` or do nothing.

use thiserror::Error;

/// Errors surfaced by the delegator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The host reports no way to attach native listeners.
    #[error("host cannot attach native event listeners")]
    ListenersUnsupported,
    /// An event type string was empty.
    #[error("event type must not be empty")]
    EmptyEventType,
    /// A [`Config`](crate::config::Config) failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
