use std::collections::VecDeque;

use futures_util::stream::{self, Stream};
use gloo_net::http::Request;
use shared_types::{parse_chunk, ChatRequest, RemoteConfig, SseDecoder, SseEvent, StreamChunk, StreamError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, ReadableStreamDefaultReader};

use crate::interop::js_error_message;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse JSON: {0}")]
    Decode(String),

    #[error("Response has no body")]
    EmptyBody,

    #[error("Failed to read response: {0}")]
    Read(String),

    #[error("Request was aborted")]
    Aborted,

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Path prefix of the backend.
///
/// Requests stay same-origin: the backend serves this app itself and has no
/// CORS layer, and `dx serve` proxies `/api` to it (see `Dioxus.toml`).
pub const API_PREFIX: &str = "/api";

pub fn api_url(endpoint: &str) -> String {
    format!("{}/{}", API_PREFIX, endpoint.trim_start_matches('/'))
}

/// `GET /api/configure`
pub async fn fetch_remote_config() -> Result<RemoteConfig, ApiError> {
    let url = api_url("configure");

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status(),
            body: response.text().await.unwrap_or_default(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// `POST /api/chat`, returning the streamed response once headers arrived
pub async fn open_chat_stream(
    request: &ChatRequest,
    signal: &AbortSignal,
) -> Result<ChatStream, ApiError> {
    let url = api_url("chat");

    let sent = Request::post(&url)
        .abort_signal(Some(signal))
        .json(request)
        .map_err(|e| ApiError::Request(e.to_string()))?
        .send()
        .await;
    let response = match sent {
        Ok(response) => response,
        Err(_) if signal.aborted() => return Err(ApiError::Aborted),
        Err(e) => return Err(ApiError::Request(e.to_string())),
    };

    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status(),
            body: response.text().await.unwrap_or_default(),
        });
    }

    let body = response.body().ok_or(ApiError::EmptyBody)?;
    let reader = body
        .get_reader()
        .unchecked_into::<ReadableStreamDefaultReader>();

    Ok(ChatStream {
        reader,
        signal: signal.clone(),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    })
}

/// Chunks of one `/api/chat` response body
pub struct ChatStream {
    reader: ReadableStreamDefaultReader,
    signal: AbortSignal,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    finished: bool,
}

impl ChatStream {
    /// Next decoded chunk; `None` after `[DONE]` or the end of the body.
    ///
    /// Undecodable payloads surface as [`ApiError::Stream`] and the stream
    /// stays usable.
    pub async fn next_chunk(&mut self) -> Option<Result<StreamChunk, ApiError>> {
        loop {
            match self.pending.pop_front() {
                Some(SseEvent::Data(payload)) => {
                    return Some(parse_chunk(&payload).map_err(ApiError::from));
                }
                Some(SseEvent::Done) => {
                    self.finished = true;
                    self.pending.clear();
                    let _ = self.reader.cancel();
                    return None;
                }
                None if self.finished => return None,
                None => {}
            }

            match self.read().await {
                Ok(Some(bytes)) => self.pending.extend(self.decoder.push(&bytes)),
                Ok(None) => {
                    self.finished = true;
                    self.pending.extend(self.decoder.finish());
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<StreamChunk, ApiError>> {
        stream::unfold(self, |mut chat| async move {
            let item = chat.next_chunk().await?;
            Some((item, chat))
        })
    }

    async fn read(&self) -> Result<Option<Vec<u8>>, ApiError> {
        let result = match JsFuture::from(self.reader.read()).await {
            Ok(result) => result,
            Err(_) if self.signal.aborted() => return Err(ApiError::Aborted),
            Err(e) => return Err(ApiError::Read(js_error_message(&e))),
        };

        let done = js_sys::Reflect::get(&result, &"done".into())
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(true);
        if done {
            return Ok(None);
        }

        let value = js_sys::Reflect::get(&result, &"value".into())
            .map_err(|e| ApiError::Read(js_error_message(&e)))?;
        Ok(Some(js_sys::Uint8Array::new(&value).to_vec()))
    }
}
