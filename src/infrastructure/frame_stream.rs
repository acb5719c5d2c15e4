// Chunked frame streaming utilities
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

pub const FRAME_CONTENT_TYPE: &str = "application/x-wind-frames";

/// Create a chunked streaming response of length-prefixed JSON messages
pub async fn chunked_frame_stream<S, T>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(&msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // No Content-Encoding: each chunk is compressed on its own, not the HTTP body
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single message to a chunk: 4-byte big-endian length, then payload
pub async fn serialize_chunk<T: Serialize>(
    msg: &T,
    compress: bool,
) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg).map_err(std::io::Error::other)?;

    let payload = if compress {
        let cursor = std::io::Cursor::new(json);
        let mut encoder = BrotliEncoder::new(cursor);
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await?;
        compressed
    } else {
        json
    };

    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Stream `initial` followed by every broadcast message until the sender goes away
pub async fn stream_from_receiver<T>(
    initial: T,
    mut rx: broadcast::Receiver<T>,
    compress: bool,
) -> impl IntoResponse
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    let stream = async_stream::stream! {
        yield initial;
        loop {
            match rx.recv().await {
                Ok(msg) => yield msg,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Frame stream subscriber lagged by {} messages", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    match chunked_frame_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::BrotliDecoder;

    #[derive(Serialize)]
    struct Probe {
        wind: f64,
    }

    #[tokio::test]
    async fn test_plain_chunk_framing() {
        let chunk = serialize_chunk(&Probe { wind: 4.5 }, false).await.unwrap();
        let body = br#"{"wind":4.5}"#;

        assert_eq!(&chunk[..4], &(body.len() as u32).to_be_bytes());
        assert_eq!(&chunk[4..], &body[..]);
    }

    #[tokio::test]
    async fn test_compressed_chunk_round_trips() {
        let chunk = serialize_chunk(&Probe { wind: 12.0 }, true).await.unwrap();
        let length = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(length, chunk.len() - 4);

        let mut decoder = BrotliDecoder::new(std::io::Cursor::new(chunk[4..].to_vec()));
        let mut json = String::new();
        decoder.read_to_string(&mut json).await.unwrap();
        assert_eq!(json, r#"{"wind":12.0}"#);
    }
}
