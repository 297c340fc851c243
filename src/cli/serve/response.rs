//! Writing router and host responses to tiny_http.

use crate::log;
use crate::route::{AssetResponse, Body};
use anyhow::{Result, anyhow};
use std::{fs::File, io::Read};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Write `response` to `request`. HEAD requests get the headers only.
pub fn respond(request: Request, response: AssetResponse) -> Result<()> {
    let AssetResponse {
        status,
        headers,
        body,
    } = response;
    let headers = headers
        .iter()
        .map(|(name, value)| make_header(name, value))
        .collect::<Result<Vec<_>>>()?;

    if is_head_request(&request) {
        return send(request, Response::empty(StatusCode(status)), headers);
    }

    match body {
        Body::Empty => send(request, Response::empty(StatusCode(status)), headers),
        Body::Bytes(bytes) => send(
            request,
            Response::from_data(bytes).with_status_code(StatusCode(status)),
            headers,
        ),
        Body::File(path) => match File::open(&path) {
            Ok(file) => send(
                request,
                Response::from_file(file).with_status_code(StatusCode(status)),
                headers,
            ),
            Err(e) => {
                log!("serve"; "failed to open {}: {}", path.display(), e);
                send(request, Response::empty(StatusCode(404)), Vec::new())
            }
        },
    }
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    let response = Response::from_data(b"503 Service Unavailable".to_vec())
        .with_status_code(StatusCode(503));
    let headers = vec![make_header(
        crate::route::CONTENT_TYPE,
        crate::utils::mime::types::PLAIN,
    )?];
    send(request, response, headers)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send<R: Read>(request: Request, mut response: Response<R>, headers: Vec<Header>) -> Result<()> {
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_header() {
        let header = make_header("Cache-Control", "max-age=60").unwrap();
        assert!(header.field.equiv("cache-control"));
        assert_eq!(header.value.as_str(), "max-age=60");
        // Header values must be ASCII
        assert!(make_header("X-Name", "café").is_err());
    }
}
