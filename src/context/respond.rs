// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Response-building helpers layered over [`Context::respond`].
//!
//! These are formatting glue: the chain core only needs a serializable
//! outcome value. Each helper builds a proxy response event, converts it to
//! a value, and finalizes the invocation.

use std::collections::HashMap;

use anyhow::Context as _;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::context::Context;
use crate::event::consts::{
    HEADER_CONTENT_TYPE, MIME_APPLICATION_JSON_CHARSET_UTF8, MIME_TEXT_PLAIN_CHARSET_UTF8,
};
use crate::event::ProxyResponse;
use crate::traits::HandlerResult;

impl Context {
    /// Respond with a JSON body and halt the chain.
    pub fn json<T: Serialize>(&self, status_code: u16, body: &T) -> HandlerResult {
        let body =
            serde_json::to_string(body).context("failed to encode JSON response body")?;
        self.proxy_response(status_code, MIME_APPLICATION_JSON_CHARSET_UTF8, body, false)
    }

    /// Respond with a plain-text body and halt the chain.
    pub fn text(&self, status_code: u16, body: impl Into<String>) -> HandlerResult {
        self.proxy_response(status_code, MIME_TEXT_PLAIN_CHARSET_UTF8, body.into(), false)
    }

    /// Respond with a base64-encoded binary body and halt the chain.
    pub fn base64(&self, status_code: u16, body: &[u8]) -> HandlerResult {
        self.proxy_response(
            status_code,
            MIME_TEXT_PLAIN_CHARSET_UTF8,
            STANDARD.encode(body),
            true,
        )
    }

    fn proxy_response(
        &self,
        status_code: u16,
        content_type: &str,
        body: String,
        is_base64_encoded: bool,
    ) -> HandlerResult {
        let res = ProxyResponse {
            status_code,
            headers: HashMap::from([(
                HEADER_CONTENT_TYPE.to_string(),
                content_type.to_string(),
            )]),
            body,
            is_base64_encoded,
        };
        let value =
            serde_json::to_value(&res).context("failed to encode proxy response")?;
        self.respond(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::context::Context;
    use crate::event::consts::{HEADER_CONTENT_TYPE, MIME_APPLICATION_JSON_CHARSET_UTF8};
    use crate::event::{Payload, ProxyResponse};
    use crate::signal::Signal;
    use crate::traits::{DefaultErrHandler, Handler};

    fn bare_context() -> Context {
        Context::new(
            Payload::default(),
            Arc::from(Vec::<Arc<dyn Handler>>::new()),
            Arc::new(DefaultErrHandler),
            Signal::new(),
        )
    }

    #[test]
    fn json_builds_a_response_and_aborts() {
        let ctx = bare_context();
        let value = ctx.json(200, &json!({"ok": true})).unwrap();
        let res: ProxyResponse = serde_json::from_value(value).unwrap();

        assert!(ctx.is_aborted());
        assert_eq!(res.status_code, 200);
        assert_eq!(res.body, r#"{"ok":true}"#);
        assert_eq!(
            res.headers.get(HEADER_CONTENT_TYPE).unwrap(),
            MIME_APPLICATION_JSON_CHARSET_UTF8
        );
        assert!(!res.is_base64_encoded);
    }

    #[test]
    fn text_builds_a_plain_body() {
        let ctx = bare_context();
        let value = ctx.text(404, "not found").unwrap();
        let res: ProxyResponse = serde_json::from_value(value).unwrap();

        assert_eq!(res.status_code, 404);
        assert_eq!(res.body, "not found");
    }

    #[test]
    fn base64_encodes_the_body_and_sets_the_flag() {
        let ctx = bare_context();
        let value = ctx.base64(200, b"binary\x00data").unwrap();
        let res: ProxyResponse = serde_json::from_value(value).unwrap();

        assert!(res.is_base64_encoded);
        assert_eq!(res.body, "YmluYXJ5AGRhdGE=");
    }
}
