use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "drive",
    about = "Mini Cloud-Drive: upload files and browse the catalog",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Upload a local file
    Upload(UploadArgs),
    /// List uploaded files, newest first
    List(ListArgs),
    /// Show one file record
    Show(ShowArgs),
    /// Delete a file and its record
    Delete(DeleteArgs),
    /// Show catalog totals
    Stats(StatsArgs),
    /// Report blobs without records and records without blobs
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on; overrides the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML server configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct UploadArgs {
    pub path: PathBuf,
    /// Content type to record; nothing is recorded when omitted
    #[arg(long)]
    pub mime: Option<String>,
    /// Name to record instead of the file's own name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    pub storage_path: String,
}

#[derive(Args)]
pub struct StatsArgs {}

#[derive(Args)]
pub struct CheckArgs {}
