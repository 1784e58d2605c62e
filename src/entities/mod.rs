pub mod chunk;
pub mod conversation;
pub mod message;

pub use chunk::{Delta, GatewayRequest, RelayRequest, StreamChoice, StreamChunk};
pub use conversation::{conversation_title, Conversation, StoredMessage};
pub use message::{Message, Role};
