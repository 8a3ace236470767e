//! Virtual-file delivery with HTTP range requests.
//!
//! Every byte served here flows through the virtual file server:
//! descriptor documents from the memory family, media from the disk
//! family. Media responses honor range requests so renderers can seek.

use crate::server::{error_response, AppContext};
use crate::vfs::{self, OpenMode, WebFile};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use bytes::Bytes;
use dircast_common::Error;
use futures::Stream;
use std::io::SeekFrom;

const STREAM_CHUNK: u64 = 64 * 1024;

pub fn web_routes() -> Router<AppContext> {
    Router::new()
        .route("/web/cds.xml", get(cds_description))
        .route("/web/cms.xml", get(cms_description))
        .route("/web/:id", get(stream_media))
}

async fn cds_description(
    State(ctx): State<AppContext>,
) -> std::result::Result<Response, (StatusCode, String)> {
    serve_document(&ctx, vfs::CDS_LOCATION).await
}

async fn cms_description(
    State(ctx): State<AppContext>,
) -> std::result::Result<Response, (StatusCode, String)> {
    serve_document(&ctx, vfs::CMS_LOCATION).await
}

/// Serve a generated document fully from its memory-backed handle.
async fn serve_document(
    ctx: &AppContext,
    location: &'static str,
) -> std::result::Result<Response, (StatusCode, String)> {
    let snapshot = ctx.state.snapshot();

    let (info, contents) = tokio::task::spawn_blocking(move || {
        let catalog = snapshot.as_deref();
        let info = vfs::stat(catalog, location)?;
        let mut handle = vfs::open(catalog, location, OpenMode::Read)?;
        let mut contents = Vec::with_capacity(info.length.max(0) as usize);
        std::io::Read::read_to_end(&mut handle, &mut contents)?;
        handle.close()?;
        Ok::<_, Error>((info, contents))
    })
    .await
    .map_err(|e| error_response(Error::internal(e.to_string())))?
    .map_err(error_response)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, info.content_type)
        .header(header::CONTENT_LENGTH, contents.len().to_string())
        .body(Body::from(contents))
        .map_err(|e| error_response(Error::internal(e.to_string())))
}

/// Serve media bytes for a catalog item, with range support.
async fn stream_media(
    State(ctx): State<AppContext>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> std::result::Result<Response, (StatusCode, String)> {
    let snapshot = ctx
        .state
        .snapshot()
        .ok_or_else(|| error_response(Error::no_such_object(id)))?;

    let range_header = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let virtual_path = format!("{}/{}", crate::VIRTUAL_DIR, id);

    // stat + open + seek are blocking disk work.
    let prepared = tokio::task::spawn_blocking(move || {
        let catalog = Some(snapshot.as_ref());
        let info = vfs::stat(catalog, &virtual_path)?;
        if !info.is_readable {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file is not readable",
            )));
        }

        let file_size = info.length.max(0) as u64;
        let range = range_header
            .as_deref()
            .and_then(|s| parse_range_header(s, file_size));

        let mut handle = vfs::open(catalog, &virtual_path, OpenMode::Read)?;
        if let Some((start, _)) = range {
            handle.seek(SeekFrom::Start(start))?;
        }

        Ok::<_, Error>((handle, file_size, range))
    })
    .await
    .map_err(|e| error_response(Error::internal(e.to_string())))?
    .map_err(error_response)?;

    let (handle, file_size, range) = prepared;

    let response = match range {
        Some((start, end)) => {
            // Partial content response
            let length = end - start + 1;
            let body = Body::from_stream(body_stream(handle, length));

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
        }
        None => {
            // Full file response
            let body = Body::from_stream(body_stream(handle, file_size));

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, file_size.to_string())
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
        }
    };

    response.map_err(|e| error_response(Error::internal(e.to_string())))
}

/// Chunked reads from a virtual file handle, each on a blocking task.
///
/// The stream ends after `length` bytes, on EOF, or after the first read
/// error.
fn body_stream(handle: WebFile, length: u64) -> impl Stream<Item = std::io::Result<Bytes>> + Send {
    futures::stream::unfold((Some(handle), length), |(handle, remaining)| async move {
        let mut handle = handle?;
        if remaining == 0 {
            return None;
        }

        let want = remaining.min(STREAM_CHUNK) as usize;
        let joined = tokio::task::spawn_blocking(move || {
            let mut buf = vec![0u8; want];
            let read = std::io::Read::read(&mut handle, &mut buf).map(|n| {
                buf.truncate(n);
                buf
            });
            (read, handle)
        })
        .await;

        match joined {
            Ok((Ok(buf), handle)) => {
                if buf.is_empty() {
                    return None;
                }
                let n = buf.len() as u64;
                Some((Ok(Bytes::from(buf)), (Some(handle), remaining - n)))
            }
            Ok((Err(e), _)) => Some((Err(e), (None, 0))),
            Err(e) => Some((Err(std::io::Error::other(e)), (None, 0))),
        }
    })
}

/// Parse HTTP Range header.
///
/// Supports formats:
/// - bytes=0-499
/// - bytes=500-999
/// - bytes=500-
/// - bytes=-500 (last 500 bytes)
fn parse_range_header(header: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }
    let header = header.strip_prefix("bytes=")?;

    let parts: Vec<&str> = header.split('-').collect();
    if parts.len() != 2 {
        return None;
    }

    let start = parts[0].trim();
    let end = parts[1].trim();

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500 (last 500 bytes)
        (true, false) => {
            let suffix_len: u64 = end.parse().ok()?;
            let start = file_size.saturating_sub(suffix_len);
            Some((start, file_size - 1))
        }
        // bytes=500- (from 500 to end)
        (false, true) => {
            let start: u64 = start.parse().ok()?;
            if start >= file_size {
                return None;
            }
            Some((start, file_size - 1))
        }
        // bytes=0-499
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if start >= file_size {
                return None;
            }
            let end = end.min(file_size - 1);
            if start > end {
                return None;
            }
            Some((start, end))
        }
        // bytes=- (invalid)
        (true, true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_header_full_range() {
        assert_eq!(parse_range_header("bytes=0-499", 1000), Some((0, 499)));
    }

    #[test]
    fn test_parse_range_header_open_end() {
        assert_eq!(parse_range_header("bytes=500-", 1000), Some((500, 999)));
    }

    #[test]
    fn test_parse_range_header_suffix() {
        assert_eq!(parse_range_header("bytes=-200", 1000), Some((800, 999)));
    }

    #[test]
    fn test_parse_range_header_clamped() {
        assert_eq!(parse_range_header("bytes=0-2000", 1000), Some((0, 999)));
    }

    #[test]
    fn test_parse_range_header_invalid_start() {
        assert_eq!(parse_range_header("bytes=1500-", 1000), None);
    }

    #[test]
    fn test_parse_range_header_invalid_format() {
        assert_eq!(parse_range_header("bytes=-", 1000), None);
        assert_eq!(parse_range_header("bytes=abc-def", 1000), None);
    }

    #[test]
    fn test_parse_range_header_empty_file() {
        assert_eq!(parse_range_header("bytes=0-", 0), None);
    }
}
