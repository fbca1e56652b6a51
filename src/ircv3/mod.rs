//! IRCv3 extensions used by the client: batches and server-time.

pub mod batch;
pub mod server_time;

pub use self::batch::{Batch, BatchBuffer, Route};
pub use self::server_time::parse_server_time;
