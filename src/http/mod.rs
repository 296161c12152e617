//! HTTP protocol layer module
//!
//! Response builders and content-type detection, independent of the
//! template logic.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_file_response, build_health_response, build_html_response,
    build_not_found_detail_response, build_options_response, build_text_response, HttpResponse,
};
