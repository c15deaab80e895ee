use anyhow::Context;
use clap::Parser;
use memory::{DRIVE_PREFIX, DebugDir, RECORDING_PREFIX, create_session};
use motor::{Actuator, LoggingLines, StopHandle};
use rover::{
    Autopilot, AutopilotArgs, Cli, LoggingSpeaker, Mode, NoopRecognizer, RecordArgs, Recorder, WatchArgs,
    Watcher, init_logging, spawn_key_reader,
};
use sensor::Camera;
use std::io::BufReader;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{error, info, warn};
use vision::Classifier;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let camera = cli.camera.open().context("opening camera")?;
    match cli.mode {
        Mode::Autopilot(args) => autopilot(camera, args).await,
        Mode::Record(args) => record(camera, args).await,
        Mode::Watch(args) => watch(camera, args).await,
    }
}

async fn autopilot(camera: Box<dyn Camera>, args: AutopilotArgs) -> anyhow::Result<()> {
    let config = args.config().context("invalid thresholds")?;
    let classifier = Classifier::load(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;
    let session = create_session(&args.drives, DRIVE_PREFIX).context("creating drive session")?;
    let debug = DebugDir::open(&args.debug_dir).context("opening debug directory")?;

    let mut pilot = Autopilot::new(camera, classifier, Actuator::new(LoggingLines), session, debug, config);
    let running = Arc::new(AtomicBool::new(true));
    handle_interrupt(running.clone(), pilot.stop_handle());

    let steps = tokio::task::spawn_blocking(move || pilot.run(&running)).await??;
    info!(steps, "autopilot finished");
    Ok(())
}

async fn record(camera: Box<dyn Camera>, args: RecordArgs) -> anyhow::Result<()> {
    let session =
        create_session(&args.sequences, RECORDING_PREFIX).context("creating recording session")?;
    let mut recorder = Recorder::new(camera, Actuator::new(LoggingLines), session, args.config());
    let running = Arc::new(AtomicBool::new(true));
    handle_interrupt(running.clone(), recorder.stop_handle());

    info!("keys: w forward, s backward, a left, d right, x stop, z save and quit");
    let keys = spawn_key_reader(BufReader::new(std::io::stdin()));
    let written = tokio::task::spawn_blocking(move || recorder.run_keys(&keys, &running)).await??;
    info!(path = %written.display(), "sequence saved");
    Ok(())
}

async fn watch(camera: Box<dyn Camera>, args: WatchArgs) -> anyhow::Result<()> {
    let mut watcher = Watcher::new(camera, &args.photos, NoopRecognizer, LoggingSpeaker)
        .context("creating photo directory")?
        .with_interval(args.interval)
        .with_capacity(args.buffer);
    watcher
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "cannot listen for interrupt");
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(())
}

/// Halt the motors and end the loop on Ctrl-C. A second Ctrl-C exits at once.
fn handle_interrupt(running: Arc<AtomicBool>, stop: StopHandle) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for interrupt");
            return;
        }
        warn!("interrupt received, stopping");
        running.store(false, Ordering::SeqCst);
        if let Err(e) = stop.stop() {
            error!(error = %e, "failed to halt motors");
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("second interrupt, exiting");
            std::process::exit(130);
        }
    });
}
