#![allow(dead_code)]

use actix_web::http::{header, StatusCode};
use actix_web::{web, App, HttpRequest, HttpResponse};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::Mutex;

use support_relay::entities::{RelayRequest, StreamChunk};

#[derive(Debug, Clone)]
pub enum Reply {
    Stream(Vec<Vec<u8>>),
    /// Sends the chunks, then keeps the connection open without data.
    StreamThenHang(Vec<Vec<u8>>),
    Status(u16, &'static str),
}

#[derive(Default)]
pub struct Seen {
    pub requests: Mutex<Vec<(Option<String>, RelayRequest)>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl Seen {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> (Option<String>, RelayRequest) {
        self.requests.lock().unwrap()[index].clone()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or(Reply::Status(500, "{}"))
        }
    }
}

pub struct FakeRelay {
    pub server: actix_test::TestServer,
    pub seen: web::Data<Seen>,
}

impl FakeRelay {
    pub fn url(&self) -> String {
        self.server.url("/functions/v1/support-chat")
    }
}

async fn relay(seen: web::Data<Seen>, req: HttpRequest, body: web::Json<RelayRequest>) -> HttpResponse {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.requests.lock().unwrap().push((auth, body.into_inner()));

    let to_bytes = |chunks: Vec<Vec<u8>>| {
        stream::iter(chunks.into_iter().map(|c| Ok::<_, actix_web::Error>(Bytes::from(c))))
    };
    match seen.next_reply() {
        Reply::Stream(chunks) => {
            HttpResponse::Ok().content_type("text/event-stream").streaming(to_bytes(chunks))
        }
        Reply::StreamThenHang(chunks) => HttpResponse::Ok()
            .content_type("text/event-stream")
            .streaming(to_bytes(chunks).chain(stream::pending())),
        Reply::Status(code, body) => HttpResponse::build(StatusCode::from_u16(code).unwrap())
            .content_type("application/json")
            .body(body),
    }
}

/// Relay stand-in answering successive requests with `replies`; the last
/// reply repeats.
pub fn start_relay(replies: Vec<Reply>) -> FakeRelay {
    let seen = web::Data::new(Seen::default());
    *seen.replies.lock().unwrap() = replies.into();
    let state = seen.clone();
    let server = actix_test::start(move || {
        App::new()
            .app_data(state.clone())
            .route("/functions/v1/support-chat", web::post().to(relay))
    });
    FakeRelay { server, seen }
}

pub fn sse(fragments: &[&str]) -> Vec<u8> {
    let mut body = String::from(": keep-alive\n\n");
    for fragment in fragments {
        let chunk = StreamChunk::with_content(*fragment);
        body.push_str(&format!("data: {}\n\n", serde_json::to_string(&chunk).unwrap()));
    }
    body.push_str("data: [DONE]\n\n");
    body.into_bytes()
}

pub fn split_every(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size).map(<[u8]>::to_vec).collect()
}

/// Accepts TCP connections and never writes a byte back. Returns the base
/// URL.
pub async fn start_silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}
