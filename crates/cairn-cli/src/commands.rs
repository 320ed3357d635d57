use anyhow::Context;
use bytes::Bytes;
use colored::Colorize;

use cairn_client::CasClient;
use cairn_server::{CasServer, ServerConfig};
use cairn_types::Etag;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Put(args) => cmd_put(args).await,
        Command::Get(args) => cmd_get(args).await,
        Command::PutObject(args) => cmd_put_object(args).await,
        Command::GetObject(args) => cmd_get_object(args).await,
        Command::Health(args) => cmd_health(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    CasServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_put(args: PutArgs) -> anyhow::Result<()> {
    let mut client = CasClient::new(&args.url);
    if let Some(chunk_size) = args.chunk_size {
        client = client.with_chunk_size(chunk_size);
    }
    let etag = client
        .put_stream_file(&args.path)
        .await
        .with_context(|| format!("uploading {}", args.path.display()))?;
    println!("{etag}");
    Ok(())
}

async fn cmd_get(args: GetArgs) -> anyhow::Result<()> {
    let etag = parse_etag(&args.etag)?;
    let client = CasClient::new(&args.url);
    match &args.output {
        Some(path) => {
            let mut file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("creating {}", path.display()))?;
            client.get_stream_to(&etag, &mut file).await?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            client.get_stream_to(&etag, &mut stdout).await?;
        }
    }
    Ok(())
}

async fn cmd_put_object(args: PutObjectArgs) -> anyhow::Result<()> {
    let data = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("reading {}", args.path.display()))?;
    let client = CasClient::new(&args.url);
    let etag = client.put_object(Bytes::from(data)).await?;
    println!("{etag}");
    Ok(())
}

async fn cmd_get_object(args: GetObjectArgs) -> anyhow::Result<()> {
    let etag = parse_etag(&args.etag)?;
    let client = CasClient::new(&args.url);
    let data = client.get_object(&etag).await?;
    match &args.output {
        Some(path) => tokio::fs::write(path, &data)
            .await
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&data).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

async fn cmd_health(args: HealthArgs) -> anyhow::Result<()> {
    let client = CasClient::new(&args.url);
    let health = client.health().await.context("server unreachable")?;
    println!(
        "{} {} (v{}, protocol v{})",
        "✓".green(),
        health.status.bold(),
        health.version,
        health.protocol_version
    );
    Ok(())
}

fn parse_etag(s: &str) -> anyhow::Result<Etag> {
    Etag::from_hex(s).with_context(|| format!("invalid etag: {s}"))
}
