use std::path::PathBuf;

use docchat_engine::DEFAULT_BASE_URL;
use super::logging::{LogDestination, LogLevel};

/// Terminal client for asking questions about uploaded PDF documents.
#[derive(clap::Parser, Debug)]
#[command(name = "docchat", version, about)]
pub struct Args {
    /// Base URL of the document and query service.
    #[arg(long, env = "DOCCHAT_SERVER_URL", default_value = DEFAULT_BASE_URL)]
    pub server_url: String,

    /// Where log records go; the terminal is shared with the chat.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Read size for streamed uploads, in KiB.
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..))]
    pub upload_chunk_kib: u32,

    /// PDF files to upload at startup.
    pub upload: Vec<PathBuf>,
}
