//! 中继服务实现
//!
//! 本模块负责把客户端对话转发到托管的聊天补全网关：
//! - 注入固定的系统提示词
//! - 以流式请求调用上游网关
//! - 将上游状态码映射为结构化错误

pub mod error;
pub mod gateway;
pub mod prompt;

pub use error::RelayError;
pub use gateway::{compose_messages, GatewayClient, RelayStream};
pub use prompt::SYSTEM_PROMPT;
