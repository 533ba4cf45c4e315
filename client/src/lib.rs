mod utils;
mod server_client;

pub use utils::{health_check, server_url, DEFAULT_SERVER_URL};
pub use server_client::{check_file, check_integrity, list_files, send_file};
