//! # Actuation Simulator
//!
//! Replays a scripted driving scenario through a full controller session at
//! the 100 Hz tick rate: config load, encoder verification, then one
//! `drive_tick` per tick against an in-memory loopback bus.
//!
//! `--realtime` paces ticks on the wall clock and runs until Ctrl-C when
//! `--ticks 0`. `--dump` writes one JSON line per tick to stdout.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use actuation_common::consts::TICK_RATE_HZ;
use actuation_common::controller::message::OutboundMessage;
use actuation_common::controller::state::{AppliedActuators, WindDownPhase};
use actuation_common::config::{ConfigLoader, LogLevel};
use actuation_common::controller::vehicle::VehicleConfig;
use actuation_controller::config::{load_config, log_directive};
use actuation_controller::host::{LoopbackTransport, PlainEncoder, drive_tick, verify_encoder};
use actuation_controller::scenario::Scenario;
use actuation_controller::session::init_session;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Buses attached to the loopback transport.
const SIM_BUSES: u8 = 6;

/// Actuation simulator: scripted scenarios through a controller session
#[derive(Parser, Debug)]
#[command(name = "actuation_sim")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Replay a driving scenario through the actuation command layer")]
struct Args {
    /// Vehicle configuration TOML.
    #[arg(default_value = "config/vehicle_legacy.toml")]
    config: PathBuf,

    /// Session identifier used in logs.
    #[arg(long, default_value = "sim-0")]
    vehicle_id: String,

    /// Scenario to replay.
    #[arg(long, value_enum, default_value_t = Scenario::Cruise)]
    scenario: Scenario,

    /// Ticks to run (0 = until Ctrl-C, requires --realtime).
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Pace ticks at the control rate instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Write one JSON line per tick to stdout.
    #[arg(long)]
    dump: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

/// One `--dump` line.
#[derive(Serialize)]
struct TickRecord<'a> {
    tick: u64,
    speed: f64,
    applied: AppliedActuators,
    wind_down: WindDownPhase,
    flags: u8,
    messages: &'a [OutboundMessage],
}

fn main() {
    let args = Args::parse();
    // Level only; the full load and its errors come after tracing is up.
    let configured = VehicleConfig::load(&args.config)
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, configured);

    info!("Actuation simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.ticks == 0 && !args.realtime {
        return Err("--ticks 0 runs forever and requires --realtime".into());
    }

    let loaded = load_config(&args.config)?;
    let mut handle = init_session(&args.vehicle_id, &loaded.config)?;
    let encoder = PlainEncoder::new();
    verify_encoder(&handle, &encoder)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut transport = LoopbackTransport::new(SIM_BUSES);
    let mut vehicle = args.scenario.vehicle();
    let period = Duration::from_secs(1) / TICK_RATE_HZ;
    let mut next_wake = Instant::now();
    let total = if args.ticks == 0 { u64::MAX } else { args.ticks };
    let span = if args.ticks == 0 { 2 * u64::from(TICK_RATE_HZ) * 60 } else { args.ticks };

    info!(
        scenario = ?args.scenario,
        ticks = args.ticks,
        realtime = args.realtime,
        "Entering tick loop"
    );

    let mut tick = 0u64;
    while tick < total && running.load(Ordering::SeqCst) {
        let intent = args.scenario.intent(tick % span, span, &vehicle);
        transport.set_state(vehicle.snapshot(0));

        let output = drive_tick(&mut handle, &mut transport, &encoder, &intent)?;
        vehicle.step(&output.applied, &intent);
        transport.take_published();

        if args.dump {
            let record = TickRecord {
                tick,
                speed: vehicle.speed,
                applied: output.applied,
                wind_down: output.state.wind_down,
                flags: output.flags.bits(),
                messages: &output.messages,
            };
            println!("{}", serde_json::to_string(&record)?);
        }

        tick += 1;
        if args.realtime {
            next_wake += period;
            if let Some(remaining) = next_wake.checked_duration_since(Instant::now()) {
                std::thread::sleep(remaining);
            }
        }
    }

    let summary = handle.close();
    info!(
        ticks = summary.stats.tick_count,
        messages = summary.stats.messages,
        max_messages = summary.stats.max_messages,
        clamped_ticks = summary.stats.clamped_ticks,
        avg_tick_ns = summary.stats.avg_tick_ns(),
        "Simulation complete"
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let directive = log_directive(configured, args.verbose);

    // RUST_LOG, when set, takes precedence.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // Logs go to stderr so --dump output stays clean.
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
