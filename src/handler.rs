//! Request handler module
//!
//! The synchronous request callback: map a request path to a store
//! lookup and a lookup result to a response. The root path is aliased to
//! `/index.html`; every other path is looked up verbatim.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::rc::Rc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::store::{Page, PageReader};

const INDEX_PATH: &str = "/index.html";

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    reader: Rc<PageReader>,
    remote_addr: SocketAddr,
    access_log: bool,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let request_path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let response = match method {
        Method::GET | Method::HEAD => load_page(&reader, &request_path, is_head),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    if access_log {
        logger::log_access(&AccessLogEntry {
            remote_addr: remote_addr.ip().to_string(),
            method: method.to_string(),
            path: request_path,
            status: response.status().as_u16(),
            body_bytes: body_len(&response),
        });
    }

    Ok(response)
}

/// Resolve a request path against the store and pick the response shape.
fn load_page(reader: &PageReader, request_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    let lookup_path = if request_path == "/" {
        INDEX_PATH
    } else {
        request_path
    };

    match reader.load(lookup_path) {
        Ok(Some(page)) => {
            let mime_type = page.mime_type().to_string();
            http::build_page_response(&mime_type, Bytes::from(page.into_content()), is_head)
        }
        Ok(None) => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Lookup of '{lookup_path}' failed: {e}"));
            http::build_500_response()
        }
    }
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}
