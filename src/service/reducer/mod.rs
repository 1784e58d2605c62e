//! Client-side reduction of the relayed event stream.

pub mod decoder;
pub mod sse;
pub mod stream_reducer;

pub use decoder::Utf8Decoder;
pub use sse::{classify_line, SseLine};
pub use stream_reducer::StreamReducer;
