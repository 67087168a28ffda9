//! saavy_cast - run the synth engine with a local console listener.
//!
//! Audio goes to the default output device, control updates are printed as
//! JSON lines on stdout, and JSON control messages are read from stdin:
//!
//! ```text
//! {"message":"seq","gate":{"index":0,"value":1}}
//! {"message":"trigger","value":440}
//! ```
//!
//! Run with: cargo run --bin saavy_cast -- --bpm 100

mod audio;
mod console;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use saavy_cast::{
    broadcast::{Connection, ConnectionId, TransportEvent},
    engine::{Engine, EngineConfig},
};

use console::ConsoleConnection;

#[derive(Parser)]
#[command(name = "saavy_cast")]
#[command(about = "Real-time synth voice streamed to listeners")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sequencer tempo, overrides the config file
    #[arg(long)]
    bpm: Option<f64>,

    /// VCO base frequency in Hz, overrides the config file
    #[arg(long)]
    freq: Option<f64>,

    /// Do not open an audio device
    #[arg(long)]
    no_audio: bool,

    /// Log filter (e.g. "debug", "saavy_cast=trace"); defaults to RUST_LOG or "info"
    #[arg(long)]
    log_level: Option<String>,

    /// Stop after this many seconds
    #[arg(short, long)]
    duration: Option<f64>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).wrap_err("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // stdout carries control updates, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(bpm) = cli.bpm {
        config.sequencer.bpm = bpm;
    }
    if let Some(freq) = cli.freq {
        config.oscillator.vco_frequency = freq;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build tokio runtime")?;

    let result = runtime.block_on(run(cli, config));
    // The stdin reader sits on a blocking thread that never wakes up on its own.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run(cli: Cli, config: EngineConfig) -> EyreResult<()> {
    // Keep the stream alive for the whole run.
    let (console, _stream) = if cli.no_audio {
        (ConsoleConnection::new(None), None)
    } else {
        let (producer, consumer) = audio::ring();
        let stream = audio::start_output(consumer)?;
        (ConsoleConnection::new(Some(producer)), Some(stream))
    };
    let console_id = console.id();

    let (events_tx, events_rx) = mpsc::channel(64);
    events_tx
        .send(TransportEvent::Connected(Box::new(console)))
        .await
        .map_err(|_| color_eyre::eyre::eyre!("engine event channel closed"))?;

    tokio::spawn(read_stdin(events_tx, console_id));

    info!(
        bpm = config.sequencer.bpm,
        vco = config.oscillator.vco_frequency,
        "starting engine"
    );
    let engine = Engine::new(config);

    match cli.duration {
        Some(secs) => {
            let limit = Duration::try_from_secs_f64(secs).wrap_err("invalid --duration")?;
            let _ = tokio::time::timeout(limit, engine.run(events_rx)).await;
            info!("duration elapsed, stopping");
        }
        None => {
            tokio::select! {
                _ = engine.run(events_rx) => {}
                signal = tokio::signal::ctrl_c() => {
                    signal.wrap_err("failed to listen for ctrl-c")?;
                    info!("interrupted, stopping");
                }
            }
        }
    }

    Ok(())
}

/// Forward each stdin line to the engine as a control message.
async fn read_stdin(events: mpsc::Sender<TransportEvent>, from: ConnectionId) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(text)) if text.trim().is_empty() => continue,
            Ok(Some(text)) => {
                if events.send(TransportEvent::Message { from, text }).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(%err, "stdin read failed");
                break;
            }
        }
    }
}
