#![forbid(unsafe_code)]

pub mod codec;
pub mod repository;
pub mod sqlite;

pub use codec::{decode_state, encode_state};
pub use repository::{InMemoryStore, SessionStore, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
