#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod logs;

pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_content_type, assert_status_ok, parse_json_body};
pub(crate) use logs::capture_error_logs;
