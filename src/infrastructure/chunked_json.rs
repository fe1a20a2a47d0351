// Length-prefixed JSON frames for the streaming dashboard
use crate::domain::dashboard::StreamMessage;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Response body that writes one frame per message received on `rx` and
/// ends when every sender is gone.
pub fn framed_response(mut rx: mpsc::Receiver<StreamMessage>, compress: bool) -> Response {
    let frames = async_stream::stream! {
        while let Some(message) = rx.recv().await {
            yield serialize_chunk(&message, compress).await;
        }
    };

    // Frames are compressed individually, so no Content-Encoding on the response.
    (
        [(header::CONTENT_TYPE, CONTENT_TYPE), (header::CACHE_CONTROL, "no-cache")],
        Body::from_stream(frames),
    )
        .into_response()
}

/// Serialize a single message to a frame: 4-byte big-endian length, then the
/// JSON payload, brotli-compressed when `compress` is set.
pub async fn serialize_chunk(msg: &StreamMessage, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg)?;

    let payload = if compress {
        let mut encoder = BrotliEncoder::new(std::io::Cursor::new(json));
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await?;
        compressed
    } else {
        json
    };

    let length = u32::try_from(payload.len())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "frame too large"))?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Whether the request's `Accept-Encoding` allows brotli frames.
pub fn accepts_brotli(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|enc| enc.trim().starts_with("br")))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::CompletionEvent;
    use async_compression::tokio::bufread::BrotliDecoder;
    use axum::http::HeaderMap;

    fn complete() -> StreamMessage {
        StreamMessage::Complete(CompletionEvent {
            total_charts: 2,
            failed_charts: 0,
            duration_ms: 12,
        })
    }

    fn split_frame(frame: &[u8]) -> (usize, &[u8]) {
        let length = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        (length, &frame[4..])
    }

    #[tokio::test]
    async fn test_plain_frame() {
        let frame = serialize_chunk(&complete(), false).await.unwrap();
        let (length, payload) = split_frame(&frame);
        assert_eq!(length, payload.len());

        let json: serde_json::Value = serde_json::from_slice(payload).unwrap();
        assert_eq!(json["type"], "complete");
        assert_eq!(json["totalCharts"], 2);
    }

    #[tokio::test]
    async fn test_compressed_frame() {
        let frame = serialize_chunk(&complete(), true).await.unwrap();
        let (length, payload) = split_frame(&frame);
        assert_eq!(length, payload.len());

        let mut decoder = BrotliDecoder::new(payload);
        let mut json = Vec::new();
        decoder.read_to_end(&mut json).await.unwrap();
        let message: StreamMessage = serde_json::from_slice(&json).unwrap();
        assert_eq!(message, complete());
    }

    #[tokio::test]
    async fn test_response_frames_every_message() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(complete()).await.unwrap();
        tx.send(complete()).await.unwrap();
        drop(tx);

        let response = framed_response(rx, false);
        assert_eq!(response.headers()[header::CONTENT_TYPE], CONTENT_TYPE);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let (first, rest) = split_frame(&body);
        let (second, rest) = split_frame(&rest[first..]);
        assert_eq!(first, second);
        assert_eq!(rest.len(), second);
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));
        headers.insert(header::ACCEPT_ENCODING, "gzip, deflate, br".parse().unwrap());
        assert!(accepts_brotli(&headers));
        headers.insert(header::ACCEPT_ENCODING, "gzip".parse().unwrap());
        assert!(!accepts_brotli(&headers));
    }
}
