use std::io::Write;

use anyhow::{bail, Context};
use blobtree_overlay::ObjectStore;
use blobtree_repo::RepoConfig;
use blobtree_types::Digest;
use colored::Colorize;
use tracing::info;

use crate::cli::*;

/// Bytes of a payload shown in log lines.
const PREVIEW_LEN: usize = 32;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    if cli.url.trim().is_empty() {
        bail!("URL to database not given or empty. Use `--url` or the CRATEDB_SQLALCHEMY_URL environment variable");
    }
    let config = match &cli.config {
        Some(path) => RepoConfig::load(path)
            .with_context(|| format!("reading configuration from {}", path.display()))?,
        None => RepoConfig::default(),
    };
    let mut store = ObjectStore::open(&cli.url, config.client)?;

    match cli.command {
        Command::Upload(args) => cmd_upload(&mut store, args),
        Command::Download(args) => cmd_download(&mut store, args),
        Command::Delete(args) => cmd_delete(&mut store, args),
        Command::List(args) => cmd_list(&mut store, args),
        Command::Example => cmd_example(&mut store),
    }
}

fn cmd_upload(store: &mut ObjectStore, args: UploadArgs) -> anyhow::Result<()> {
    if !args.path.is_file() {
        bail!("Path does not exist: {}", args.path.display());
    }
    let payload = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let key = args
        .key
        .unwrap_or_else(|| args.path.to_string_lossy().into_owned());

    let mut session = store.session()?;
    let digest = session.upload(&key, &payload)?;
    println!("{} {} {}", "✓".green().bold(), key.bold(), digest.to_string().yellow());
    println!("OK");
    Ok(())
}

fn cmd_download(store: &mut ObjectStore, args: DownloadArgs) -> anyhow::Result<()> {
    let session = store.session()?;
    let payload = if args.digest {
        let digest: Digest = args.key.parse().context("parsing digest")?;
        session.digest_store().download(&digest)?
    } else {
        session.download(&args.key)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &payload)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} {} bytes → {}", "✓".green().bold(), payload.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&payload)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_delete(store: &mut ObjectStore, args: DeleteArgs) -> anyhow::Result<()> {
    let mut session = store.session()?;
    if args.digest {
        let digest: Digest = args.key.parse().context("parsing digest")?;
        session.digest_store().delete(&digest)?;
    } else {
        session.delete(&args.key)?;
    }
    println!("{} Deleted {}", "✓".green().bold(), args.key.bold());
    Ok(())
}

fn cmd_list(store: &mut ObjectStore, args: ListArgs) -> anyhow::Result<()> {
    let session = store.session()?;
    let mut entries = session.list(args.path.as_deref().unwrap_or(""))?;
    entries.sort();

    if entries.is_empty() {
        println!("No objects.");
    }
    for entry in entries {
        if entry.is_dir {
            println!("{:>10}  {}/", "-".dimmed(), entry.path.blue().bold());
        } else {
            println!("{:>10}  {}", entry.size.unwrap_or(0), entry.path);
        }
    }
    Ok(())
}

/// Round trip a sample payload through the store.
fn cmd_example(store: &mut ObjectStore) -> anyhow::Result<()> {
    let path = "/path/to/file";
    let content = b"An example payload.";

    info!("Uploading: {}", preview(content));
    let mut session = store.session()?;
    let digest = session.upload(path, content)?;
    info!("Identifier: {digest}");

    let downloaded = session.download(path)?;
    info!("Downloaded: {}", preview(&downloaded));

    session.delete(path)?;
    info!("Deleted.");
    Ok(())
}

/// Render at most [`PREVIEW_LEN`] bytes of `payload` for display.
fn preview(payload: &[u8]) -> String {
    let shown = &payload[..payload.len().min(PREVIEW_LEN)];
    let text = String::from_utf8_lossy(shown);
    if payload.len() > PREVIEW_LEN {
        format!("{text:?}...")
    } else {
        format!("{text:?}")
    }
}
