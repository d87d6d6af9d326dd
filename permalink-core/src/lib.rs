//! Compact, URL-safe encoding of editor state.
//!
//! Text is deflated ([`deflate`]), turned into a URL-safe token ([`token`]),
//! and stored in query parameters. [`sync`] binds those parameters to the
//! application's document and canvas.

pub mod config;
pub mod deflate;
pub mod pack;
pub mod query;
pub mod store;
pub mod sync;
pub mod token;
pub mod watch;

pub use config::{ConfigError, SyncConfig};
pub use deflate::{compress, decompress, CorruptStreamError};
pub use pack::{pack, unpack, DecodeError, Packer};
pub use query::{QueryError, QueryString};
pub use store::{MemoryUrlStore, UrlStore, UrlStoreError};
pub use sync::{update_query_param, LoadReport, Param, ParamOutcome, StateSlot, StateSync};
pub use token::{decode_token, encode_token, MalformedTokenError};
pub use watch::QueryWatcher;
