// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

pub const CHARSET_UTF8: &str = "charset=UTF-8";

pub const MIME_APPLICATION_JSON: &str = "application/json";
pub const MIME_APPLICATION_JSON_CHARSET_UTF8: &str = "application/json; charset=UTF-8";
pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const MIME_TEXT_PLAIN_CHARSET_UTF8: &str = "text/plain; charset=UTF-8";
