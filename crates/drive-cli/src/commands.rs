use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;

use drive_sdk::{Bootstrap, DriveContext, UploadError};
use drive_server::{DriveServer, ServerConfig};
use drive_types::{format_file_size, CatalogStats, FileRecord};

use crate::cli::*;

static DRIVE: Bootstrap = Bootstrap::new();

fn context() -> anyhow::Result<Arc<DriveContext>> {
    Ok(DRIVE.from_env()?)
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Upload(args) => cmd_upload(args, format),
        Command::List(_) => cmd_list(format),
        Command::Show(args) => cmd_show(args, format),
        Command::Delete(args) => cmd_delete(args),
        Command::Stats(_) => cmd_stats(format),
        Command::Check(_) => cmd_check(format),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("reading server config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let ctx = context()?;
    println!(
        "{} Serving bucket {} on {}",
        "✓".green().bold(),
        ctx.config().storage_bucket.bold(),
        config.bind_addr.to_string().cyan()
    );
    tracing::info!(
        bind = %config.bind_addr,
        bucket = %ctx.config().storage_bucket,
        collection = %ctx.config().collection,
        "starting server"
    );
    let server = DriveServer::new(config, ctx.shared_service());
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

fn upload_name(path: &Path, name: Option<String>) -> anyhow::Result<String> {
    match name {
        Some(name) => Ok(name),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display())),
    }
}

/// Read `path` only once its size on disk fits under `limit`.
fn read_upload_file(path: &Path, limit: u64) -> anyhow::Result<Vec<u8>> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("reading {}", path.display()))?
        .len();
    if size > limit {
        return Err(UploadError::FileTooLarge { size, limit }.into());
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn cmd_upload(args: UploadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let name = upload_name(&args.path, args.name)?;
    let ctx = context()?;
    let content = read_upload_file(&args.path, ctx.service().max_file_size_bytes())?;
    tracing::debug!(path = %args.path.display(), size = content.len(), "read upload");

    let record = ctx.service().upload(&content, &name, args.mime.as_deref())?;
    tracing::info!(id = %record.id, key = %record.storage_path, "upload complete");
    match format {
        OutputFormat::Json => print_json(&record),
        OutputFormat::Text => {
            println!("{} Uploaded {}", "✓".green().bold(), record.original_name.bold());
            print!("{}", render_record(&record));
            Ok(())
        }
    }
}

fn cmd_list(format: OutputFormat) -> anyhow::Result<()> {
    let records = context()?.service().try_list()?;
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Text => {
            print!("{}", render_list(&records));
            Ok(())
        }
    }
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let record = context()?
        .service()
        .find(&args.id)
        .with_context(|| format!("no file with id {}", args.id))?;
    match format {
        OutputFormat::Json => print_json(&record),
        OutputFormat::Text => {
            println!("{}", record.original_name.bold());
            print!("{}", render_record(&record));
            Ok(())
        }
    }
}

fn cmd_delete(args: DeleteArgs) -> anyhow::Result<()> {
    context()?.service().delete(&args.id, &args.storage_path)?;
    tracing::info!(id = %args.id, key = %args.storage_path, "delete complete");
    println!("{} Deleted {}", "✓".green().bold(), args.storage_path.yellow());
    Ok(())
}

fn cmd_stats(format: OutputFormat) -> anyhow::Result<()> {
    let stats = context()?.service().stats();
    match format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            print!("{}", render_stats(&stats));
            Ok(())
        }
    }
}

fn cmd_check(format: OutputFormat) -> anyhow::Result<()> {
    let ctx = context()?;
    let orphans = ctx.service().find_orphan_blobs()?;
    let dangling = ctx.service().find_dangling_records()?;
    tracing::debug!(orphans = orphans.len(), dangling = dangling.len(), "check finished");
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "orphan_blobs": orphans,
            "dangling_records": dangling,
        })),
        OutputFormat::Text => {
            print!("{}", render_check(&orphans, &dangling));
            Ok(())
        }
    }
}

// ---- Text rendering ----

fn render_record(record: &FileRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("  ID:       {}\n", record.id.yellow()));
    out.push_str(&format!("  Size:     {}\n", format_file_size(record.size_bytes)));
    out.push_str(&format!("  Type:     {}\n", record.mime_type_or_unknown()));
    out.push_str(&format!(
        "  Uploaded: {}\n",
        record.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("  Path:     {}\n", record.storage_path));
    out.push_str(&format!("  URL:      {}\n", record.download_url.blue()));
    out
}

fn render_list(records: &[FileRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", "No files uploaded yet.".dimmed());
    }
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{}  {:>10}  {}  {}\n",
            record.id.yellow(),
            format_file_size(record.size_bytes),
            record.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            record.original_name.bold(),
        ));
        out.push_str(&format!("    {}\n", record.storage_path.dimmed()));
    }
    out
}

fn render_stats(stats: &CatalogStats) -> String {
    format!(
        "Files:      {}\nTotal size: {} ({} MB)\n",
        stats.total_files.to_string().bold(),
        format_file_size(stats.total_size_bytes),
        stats.total_size_mb
    )
}

fn render_check(orphans: &[String], dangling: &[FileRecord]) -> String {
    if orphans.is_empty() && dangling.is_empty() {
        return format!("{} Blobs and records agree.\n", "✓".green().bold());
    }
    let mut out = String::new();
    for key in orphans {
        out.push_str(&format!("{} {}\n", "orphan blob:".red(), key));
    }
    for record in dangling {
        out.push_str(&format!(
            "{} {} -> {}\n",
            "dangling record:".red(),
            record.id,
            record.storage_path
        ));
    }
    out
}
