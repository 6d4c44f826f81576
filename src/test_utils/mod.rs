#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_error_message, get_header, parse_json_body};
pub(crate) use state::get_test_state;
