//! Host side of the code playground.
//!
//! Owns the isolated rendering surface, the ordered console log fed by relayed
//! messages, and the timed interview session wrapped around them.

pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod interview;
pub mod log;
pub mod observability;
pub mod playlists;
pub mod session;
pub mod storage;
pub mod surface;

pub use clock::SessionClock;
pub use config::HostConfig;
pub use error::{HostError, HostResult};
pub use host::IsolationHost;
pub use interview::{new_session_store, InterviewSession, SessionStore};
pub use log::{ConsoleLog, LogEntry};
pub use playlists::{Playlist, PlaylistBook};
pub use session::{Session, SessionAction, SessionSnapshot, SessionState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use surface::{MemorySurface, Surface};
