//! Kagami - Webcam-to-humanoid retargeting service
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kagami::{
    config::Config,
    retarget::Retargeter,
    rig::NormalizedRig,
    solver::SolverReceiver,
    status::AppPhase,
    AppState,
};

/// Kagami - webcam-to-humanoid retargeting service
#[derive(Parser, Debug)]
#[command(name = "kagami", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solver feed port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable the solver feed (manual expression mode only)
    #[arg(long)]
    no_tracking: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", kagami::NAME, kagami::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(&args))?;

    info!("Kagami stopped");
    Ok(())
}

async fn run(args: &Args) -> anyhow::Result<()> {
    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.tracking.port = port;
    }
    if args.no_tracking {
        config.tracking.enabled = false;
    }

    config.validate()?;

    info!("Solver feed: {}", config.tracking.enabled);
    info!("Render tick rate: {} Hz", config.render.tick_hz);

    let tracking_enabled = config.tracking.enabled;
    let auto_start = config.tracking.auto_start;
    let rig_profile = config.rig.profile.clone();

    // Create shared application state
    let state = AppState::new(config);

    // "Load" the rig: the in-memory normalized rig stands in for a GPU model
    let rig = build_rig(&rig_profile)?;
    info!("Rig ready: {} bones", rig.bone_count());
    state.model_ready();

    // Start the render loop
    let render_state = Arc::clone(&state);
    tokio::spawn(async move {
        run_render_loop(render_state, rig).await;
    });

    // Start the solver feed
    if tracking_enabled {
        if auto_start {
            state.start_tracking();
        }
        let feed_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_solver_feed(Arc::clone(&feed_state)).await {
                error!("Solver feed error: {}", e);
                // The feed never came up; don't leave the session half-open
                feed_state.stop_tracking();
            }
        });
    } else {
        info!("Solver feed disabled, running in manual expression mode");
    }

    // Wait for Ctrl+C / SIGTERM
    shutdown_signal().await;
    info!("Shutdown signal received");
    state.shutdown();

    // Give tasks a moment to clean up
    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(())
}

fn build_rig(profile: &str) -> anyhow::Result<NormalizedRig> {
    match profile {
        "full" => Ok(NormalizedRig::full()),
        "upper-body" => Ok(NormalizedRig::upper_body()),
        other => Err(kagami::error::RigError::UnknownProfile(other.to_string()).into()),
    }
}

/// Receive solver datagrams and feed the shared retargeting state.
async fn run_solver_feed(state: Arc<AppState>) -> kagami::Result<()> {
    let tracking_config = state.config.read().await.tracking.clone();

    let mut receiver = SolverReceiver::new(&tracking_config);
    receiver.start()?;

    let mut shutdown_rx = state.subscribe_shutdown();

    loop {
        // Capture the generation before the solve result is taken off the
        // socket so a stop_tracking() in between invalidates this frame
        let generation = state.retargeting.generation();

        tokio::select! {
            result = receiver.process() => {
                match result {
                    Ok(Some(frame)) => {
                        state.frame_received();
                        state.ingest_frame(generation, frame);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Solver feed error: {}", e);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Solver feed shutting down");
                break;
            }
        }

        // Small yield to avoid busy-spinning when no data arrives
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    receiver.stop();
    state.stop_tracking();
    Ok(())
}

/// Tick the retargeting pipeline at the configured rate.
async fn run_render_loop(state: Arc<AppState>, mut rig: NormalizedRig) {
    let tick_hz = state.config.read().await.render.tick_hz;
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / tick_hz as f64));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut retargeter = Retargeter::new();
    let mut shutdown_rx = state.subscribe_shutdown();
    let mut last_tick = Instant::now();

    info!("Render loop started at {} Hz", tick_hz);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let dt = (now - last_tick).as_secs_f32();
                last_tick = now;

                // Rig not ready: skip the whole tick
                if state.phase() == AppPhase::ModelLoading {
                    continue;
                }

                let snapshot = state.retargeting.snapshot();
                let sliders = state.config.read().await.sliders;
                retargeter.tick(
                    &mut rig,
                    &snapshot,
                    &sliders,
                    state.video_attached(),
                    dt,
                );
            }
            _ = shutdown_rx.recv() => {
                info!("Render loop shutting down");
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
