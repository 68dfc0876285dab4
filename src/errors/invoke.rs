// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Terminal errors returned by `Chain::invoke`.

use thiserror::Error;

/// Failures that end an invocation without a response.
///
/// Handler errors never appear here: during advancement they are routed
/// through the chain's recovery handler. Only a failing recovery handler or
/// a failure to encode the final response reaches the invoke caller, and
/// encoding failures bypass recovery entirely.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The recovery handler itself returned an error.
    #[error("recovery handler failed: {source}")]
    Recovery {
        #[source]
        source: anyhow::Error,
    },

    /// The final response value could not be encoded.
    #[error("failed to encode response: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },
}
