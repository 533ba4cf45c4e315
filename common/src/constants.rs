/// Maximum payload carried by a single chunk record.
pub const CHUNK_SIZE: usize = 500;

/// `prev_hash` of the first chunk of every file.
pub const GENESIS_PREV_HASH: &str = "0";

/// Identifier the server reports on `/health`. Clients refuse to talk to a
/// server that answers with anything else.
pub const SERVER_ID: &str = "8dbaaa72-ff7a-4f95-887c-e3109e577edd";

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
