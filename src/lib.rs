// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod chain;      // chain builder + invoke entry point
pub mod context;    // per-invocation context: cursor, store, delegation
pub mod errors;     // error handling
pub mod event;      // payload and proxy event types
pub mod observability;
pub mod signal;     // upstream cancellation/deadline source
pub mod traits;     // handler seams
