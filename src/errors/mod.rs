// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod invoke;
mod signal;

pub use invoke::InvokeError;
pub use signal::SignalError;
