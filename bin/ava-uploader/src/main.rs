//! ---
//! ava_section: "01-core-functionality"
//! ava_subsection: "binary"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Binary entrypoint for the telemetry uploader."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use ava_common::config::{AppConfig, LoadedAppConfig};
use ava_common::{init_tracing, LogFormat};
use ava_logging::{ava_error, ava_info, LogContext};
use ava_net::{ConnectionManager, ReconnectPolicy, TungsteniteConnector};
use ava_sim::{TelemetryGenerator, CHANNEL_TABLE};
use ava_wire::Reading;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

mod runner;

use runner::{RunSummary, Shutdown, Uploader};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Synthetic AVA-02 telemetry uploader",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to a TOML configuration file")]
    config: Option<PathBuf>,

    #[arg(long, env = "WS_URL", help = "WebSocket endpoint (ws:// or wss://)")]
    url: Option<String>,

    #[arg(long, help = "Seed for the telemetry generator")]
    seed: Option<u64>,

    #[arg(long, value_enum, help = "Console log format")]
    log_format: Option<CliLogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::StructuredJson,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Stream simulated driving data as JSON bundles")]
    Drive,
    #[command(about = "Send the fixed test bundle once")]
    TestBundle,
    #[command(about = "Send one bundle built from the given ids and values")]
    Custom {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u32>,
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        values: Vec<i64>,
    },
    #[command(about = "Stream binary packets, one channel per tick")]
    Channels,
    #[command(about = "Stream the throttle, brake and RPM bench pattern")]
    Bench,
    #[command(about = "Print the channel table and exit")]
    ListChannels,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let LoadedAppConfig { mut config, source } = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.override_url(url)?;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    init_tracing("ava-uploader", &config.logging)?;
    info!(
        endpoint = %config.endpoint.url,
        config = %source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_owned()),
        "configuration loaded"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let manager = ConnectionManager::new(
        TungsteniteConnector::new(config.endpoint.connect_timeout),
        config.endpoint.url.clone(),
        ReconnectPolicy::new(config.reconnect.delay),
    );
    let mut uploader = Uploader::new(manager, Shutdown::new(shutdown_rx));
    let outcome = run(&mut uploader, &config, cli.command).await;
    let link = uploader.finish().await;

    let context = LogContext::new().with_endpoint(&config.endpoint.url);
    match outcome {
        Ok(summary) => {
            ava_info!(
                context = context.with_tick(summary.ticks),
                "uploader stopped after {} frames ({} resent, {} bytes, interrupted: {}), goodbye",
                summary.frames,
                summary.resends,
                link.bytes_sent,
                summary.interrupted
            );
            Ok(())
        }
        Err(err) => {
            ava_error!(
                context = context,
                "uploader failed after {} frames: {err:#}",
                link.frames_sent
            );
            Err(err)
        }
    }
}

async fn run(
    uploader: &mut Uploader<TungsteniteConnector>,
    config: &AppConfig,
    command: Commands,
) -> Result<RunSummary> {
    match command {
        Commands::Drive => {
            let sensor_ids: [u32; 4] = config
                .bundle
                .sensor_ids
                .as_slice()
                .try_into()
                .context("bundle.sensor_ids must hold exactly four ids")?;
            let mut generator = seeded_generator(config);
            uploader
                .drive(&mut generator, sensor_ids, config.bundle.interval)
                .await
        }
        Commands::TestBundle => uploader.send_bundle(&runner::test_bundle()).await,
        Commands::Custom { ids, values } => {
            uploader.send_bundle(&Reading::new(ids, values)).await
        }
        Commands::Channels => {
            let mut generator = seeded_generator(config);
            uploader.channels(&mut generator, config.packet.interval).await
        }
        Commands::Bench => uploader.bench(config.packet.bench_interval).await,
        Commands::ListChannels => {
            for spec in &CHANNEL_TABLE {
                println!("{:>2}  {:<18} {} byte(s)", spec.id, spec.name, spec.length);
            }
            Ok(RunSummary::default())
        }
    }
}

fn seeded_generator(config: &AppConfig) -> TelemetryGenerator {
    let generator = TelemetryGenerator::new(config.simulation.seed);
    info!(seed = generator.seed(), "telemetry generator ready");
    generator
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn custom_accepts_comma_lists_and_negative_values() {
        let cli = Cli::try_parse_from([
            "ava-uploader",
            "custom",
            "--ids",
            "1,2,192",
            "--values",
            "-5,512,70000",
        ])
        .unwrap();
        match cli.command {
            Commands::Custom { ids, values } => {
                assert_eq!(ids, vec![1, 2, 192]);
                assert_eq!(values, vec![-5, 512, 70000]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse() {
        let cli = Cli::try_parse_from([
            "ava-uploader",
            "--url",
            "ws://127.0.0.1:9000/api/ws/send",
            "--seed",
            "7",
            "--log-format",
            "json",
            "bench",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("ws://127.0.0.1:9000/api/ws/send"));
        assert_eq!(cli.seed, Some(7));
        assert!(matches!(cli.log_format, Some(CliLogFormat::Json)));
        assert!(matches!(cli.command, Commands::Bench));
    }
}
