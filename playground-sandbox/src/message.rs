//! Cross-context message schema: `{ type: "console", logType, content }`.
//!
//! Parsing is forward compatible: payloads with any other `type` are ignored rather
//! than rejected, since unrelated messages share the same channel.

use crate::error::{SandboxError, SandboxResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator carried by every console relay message.
pub const CONSOLE_MESSAGE_TYPE: &str = "console";

/// The console entry point that produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Error,
    Warn,
    Info,
}

/// Display category of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Warning,
    Error,
}

impl ConsoleLevel {
    pub fn kind(self) -> LogKind {
        match self {
            ConsoleLevel::Log | ConsoleLevel::Info => LogKind::Info,
            ConsoleLevel::Warn => LogKind::Warning,
            ConsoleLevel::Error => LogKind::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Error => "error",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleMessage {
    pub log_type: ConsoleLevel,
    pub content: String,
}

impl ConsoleMessage {
    pub fn new(log_type: ConsoleLevel, content: impl Into<String>) -> Self {
        Self {
            log_type,
            content: content.into(),
        }
    }

    /// The exact payload the shim posts for this message.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "type": CONSOLE_MESSAGE_TYPE,
            "logType": self.log_type.as_str(),
            "content": self.content,
        })
    }
}

/// Classification of one inbound cross-context message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Console(ConsoleMessage),
    /// Not a console message (other `type`, no `type`, or not an object).
    Ignored,
    /// Tagged `console` but the rest of the payload does not match the schema.
    Malformed(String),
}

pub struct RelayMessage;

impl RelayMessage {
    pub fn from_value(value: &Value) -> Inbound {
        let tag = value.get("type").and_then(Value::as_str);
        if tag != Some(CONSOLE_MESSAGE_TYPE) {
            return Inbound::Ignored;
        }
        match ConsoleMessage::deserialize(value) {
            Ok(msg) => Inbound::Console(msg),
            Err(e) => Inbound::Malformed(e.to_string()),
        }
    }

    /// Raw JSON text variant; unparseable text is ignored like any foreign message.
    pub fn from_json_str(raw: &str) -> Inbound {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => Self::from_value(&v),
            Err(_) => Inbound::Ignored,
        }
    }

    /// Strict variant: anything that is not a well-formed console message is an error.
    pub fn parse_console(value: &Value) -> SandboxResult<ConsoleMessage> {
        match Self::from_value(value) {
            Inbound::Console(msg) => Ok(msg),
            Inbound::Ignored => Err(SandboxError::MalformedMessage(
                "not a console message".to_string(),
            )),
            Inbound::Malformed(reason) => Err(SandboxError::MalformedMessage(reason)),
        }
    }
}
