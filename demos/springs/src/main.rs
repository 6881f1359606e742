//! springs: drives a damped spring chain to rest with the settle loop.
//!
//! The chain starts with seeded random displacements.  The scheduler steps
//! it once per display refresh (paced by a `FrameDriver`) until it settles,
//! then the demo kicks the middle particle and calls `update()` to wake the
//! loop again, `--kicks` times.
//!
//! ```text
//! RUST_LOG=debug cargo run -p springs -- --particles 12 --trace out/springs.csv
//! ```

mod chain;
mod trace;


use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use settle_core::LoopConfig;
use settle_frame::{DriverStats, FrameDriver, ManualFrameSource};
use settle_loop::{Callback, ErrorCallback, LoopBuilder};

use chain::{ChainParams, SpringChain};
use trace::TraceWriter;

/// Frame cap applied when the loop is not optimized (it never goes idle).
const CONTINUOUS_FRAME_CAP: u64 = 600;

#[derive(Parser, Debug)]
#[command(name = "springs", about = "Drive a damped spring chain to equilibrium")]
struct Args {
    /// Number of particles in the chain.
    #[arg(long, default_value_t = 8)]
    particles: usize,

    #[arg(long, default_value_t = 40.0)]
    stiffness: f64,

    #[arg(long, default_value_t = 4.0)]
    damping: f64,

    /// Initial random displacement amplitude.
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,

    /// Convergence threshold for displacement and velocity.
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Keep animating at equilibrium (equilibrium callbacks never fire).
    #[arg(long)]
    no_optimize: bool,

    /// Times to kick the chain after it settles.
    #[arg(long, default_value_t = 1)]
    kicks: u32,

    /// JSON file with a `LoopConfig`; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a CSV trace of every step here.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Override `refresh_rate_hz`.
    #[arg(long)]
    hz: Option<u32>,

    /// Override `max_frames` (per driver run).
    #[arg(long)]
    max_frames: Option<u64>,

    /// Fire refreshes back to back instead of sleeping between them.
    #[arg(long)]
    unpaced: bool,
}

fn load_config(args: &Args) -> Result<LoopConfig> {
    let mut config: LoopConfig = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LoopConfig::default(),
    };
    if let Some(hz) = args.hz {
        config.refresh_rate_hz = hz;
    }
    if args.max_frames.is_some() {
        config.max_frames = args.max_frames;
    }
    if args.no_optimize && config.max_frames.is_none() {
        config.max_frames = Some(CONTINUOUS_FRAME_CAP);
    }
    Ok(config)
}

fn add(total: &mut DriverStats, run: DriverStats) {
    total.frames += run.frames;
    total.callbacks += run.callbacks;
    total.elapsed += run.elapsed;
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    // 1. The system to drive.
    let mut chain = SpringChain::new(ChainParams {
        particles: args.particles,
        stiffness: args.stiffness,
        damping:   args.damping,
        dt:        1.0 / config.refresh_rate_hz.max(1) as f64,
        tolerance: args.tolerance,
        optimized: !args.no_optimize,
    })?;
    chain.jitter(args.amplitude, args.seed)?;
    info!(
        "chain: {} particles, max displacement {:.4}",
        chain.particles(),
        chain.max_displacement()
    );

    // 2. Optional trace output.
    let trace = match &args.trace {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            Some(Rc::new(RefCell::new(TraceWriter::create(path)?)))
        }
        None => None,
    };

    // 3. Scheduler over a host-pumped frame queue.
    let frames = ManualFrameSource::new();
    let scheduler = LoopBuilder::new(chain, frames.clone())
        .config(config.clone())
        .on_error(ErrorCallback::new(|err| warn!("loop error: {err}")))
        .build()?;
    let sim = scheduler.simulation();

    if let Some(trace) = &trace {
        let (writer, chain) = (Rc::clone(trace), Rc::clone(&sim));
        scheduler.on_update(Callback::fallible(move || {
            writer.borrow_mut().write_state(&chain.borrow())
        }));
        let (writer, chain) = (Rc::clone(trace), Rc::clone(&sim));
        scheduler.on_equilibrium(Callback::fallible(move || {
            writer.borrow_mut().write_settle(&chain.borrow())
        }));
    }
    {
        let chain = Rc::clone(&sim);
        scheduler.on_equilibrium(Callback::new(move || {
            let chain = chain.borrow();
            info!("settled at step {} (max displacement {:.2e})", chain.steps(), chain.max_displacement());
        }));
    }

    // 4. Run: settle, then kick and wake.
    let mut driver = FrameDriver::from_config(frames, &config)?.paced(!args.unpaced);
    scheduler.play();
    let mut total = driver.run();

    let middle = args.particles / 2;
    for kick in 1..=args.kicks {
        if !scheduler.is_settled() {
            break;
        }
        info!("kick {kick}: particle {middle}");
        sim.borrow_mut().kick(middle, 2.0);
        scheduler.update();
        add(&mut total, driver.run());
    }

    if let Some(err) = scheduler.take_error() {
        eprintln!("last loop error: {err}");
    }
    if let Some(trace) = &trace {
        trace.borrow_mut().finish()?;
    }

    // 5. Summary.
    let stats = scheduler.stats();
    println!();
    println!("Frames fired      : {}", total.frames);
    println!("Iterations        : {}", stats.iterations);
    println!("Frames requested  : {}", stats.frames_requested);
    println!("Settle events     : {}", stats.settle_events);
    println!("Errors            : {}", stats.errors);
    println!("Wall time         : {:.3} s", total.elapsed.as_secs_f64());
    if let Some(trace) = &trace {
        println!("Trace rows        : {}", trace.borrow().rows());
    }
    println!("Final state       : {}, settled={}", scheduler.phase(), scheduler.is_settled());

    Ok(())
}
