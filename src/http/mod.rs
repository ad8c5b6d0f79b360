//! HTTP surface module
//!
//! MIME resolution and response builders shared by the request handler.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_500_response, build_page_response,
};
