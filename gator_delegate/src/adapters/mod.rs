// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hosts for concrete documents.
//!
//! Enabled via feature flags to keep the core free of any particular DOM.

#[cfg(feature = "dom_adapter")]
pub mod dom;
