use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const DEFAULT_URL: &str = "http://127.0.0.1:8082";

#[derive(Parser)]
#[command(
    name = "cairn",
    about = "Cairn — chunked content-addressable storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the storage server
    Serve(ServeArgs),
    /// Upload a file as a chunk stream and print its etag
    Put(PutArgs),
    /// Download an object by its etag
    Get(GetArgs),
    /// Upload a file in one call (whole-object path)
    PutObject(PutObjectArgs),
    /// Download an object stored via the whole-object path
    GetObject(GetObjectArgs),
    /// Check server health
    Health(HealthArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct PutArgs {
    /// File to upload
    pub path: PathBuf,
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,
    /// Chunk size for the upload stream, in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

#[derive(Args)]
pub struct GetArgs {
    /// Etag to retrieve
    pub etag: String,
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct PutObjectArgs {
    /// File to upload
    pub path: PathBuf,
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,
}

#[derive(Args)]
pub struct GetObjectArgs {
    /// Etag to retrieve
    pub etag: String,
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct HealthArgs {
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,
}
