// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! cadence - Run a demo conference and inspect recorded containers
//!
//! `cadence run` supervises a heartbeat module against a monitor feedback
//! component (optionally recording the conference); `cadence dump` prints a
//! recording, resolved through the demo type registry.

mod demo;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cadence::runtime::{Cycles, ModuleIdentity, RunResult, RuntimeEnvironment, Supervisor};
use cadence::{Container, KeyValueConfiguration};
use clap::{Parser, Subcommand};
use colored::*;
use parking_lot::Mutex;

use demo::{HeartbeatModule, Monitor, Recorder};

/// Time-triggered module supervisor
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(version)]
#[command(about = "Supervise time-triggered modules and inspect recordings")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the demo conference
    Run {
        /// Conference id
        #[arg(long, default_value = "111")]
        cid: u32,

        /// Heartbeat module instance identifier
        #[arg(long)]
        id: Option<u32>,

        /// Heartbeat frequency in Hz
        #[arg(long, default_value = "10")]
        freq: f32,

        /// Monitor frequency in Hz
        #[arg(long, default_value = "2")]
        monitor_freq: f32,

        /// Number of cycles (0 = until Ctrl+C)
        #[arg(short = 'n', long, default_value = "50")]
        cycles: u64,

        /// Configuration file (key = value lines)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Record every container to this file
        #[arg(short, long)]
        record: Option<PathBuf>,
    },

    /// Print the containers of a recording
    Dump {
        /// Recording written by `run --record`
        input: PathBuf,

        /// Show tags and wire kinds instead of resolved field names
        #[arg(long)]
        raw: bool,

        /// Stop after this many containers (0 = all)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let result = match args.command {
        Command::Run {
            cid,
            id,
            freq,
            monitor_freq,
            cycles,
            config,
            record,
        } => run(cid, id, freq, monitor_freq, cycles, config, record),
        Command::Dump { input, raw, limit } => dump(&input, raw, limit),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(
    cid: u32,
    id: Option<u32>,
    freq: f32,
    monitor_freq: f32,
    cycles: u64,
    config: Option<PathBuf>,
    record: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &config {
        Some(path) => KeyValueConfiguration::from_file(path)?,
        None => KeyValueConfiguration::new(),
    };

    let mut identity = ModuleIdentity::new("heartbeat", cid).with_frequency(freq);
    if let Some(id) = id {
        identity = identity.with_identifier(id);
    }

    let heartbeat = Arc::new(Mutex::new(HeartbeatModule::new(identity)));
    let monitor = Arc::new(Mutex::new(Monitor::new(monitor_freq)));
    let mut env = RuntimeEnvironment::new();
    env.add_module(Arc::clone(&heartbeat));
    env.add_feedback(Arc::clone(&monitor));

    let recorder = match &record {
        Some(path) => {
            let recorder = Arc::new(Mutex::new(Recorder::create(path, freq)?));
            env.add_feedback(Arc::clone(&recorder));
            Some(recorder)
        }
        None => None,
    };

    let mut supervisor = Supervisor::new(cid, config);
    let stop = supervisor.stop_handle();
    ctrlc::set_handler(move || stop.stop())?;

    println!(
        "{} conference {} | heartbeat {} Hz | monitor {} Hz | {}",
        "cadence".cyan().bold(),
        cid,
        freq,
        monitor_freq,
        if cycles == 0 {
            "until Ctrl+C".to_string()
        } else {
            format!("{} cycles", cycles)
        }
    );

    let started = Instant::now();
    supervisor.setup();
    let result = supervisor.run(&mut env, Cycles::from(cycles));
    supervisor.tear_down();

    let stats = supervisor.statistics();
    let status = if result == RunResult::Ok {
        result.to_string().green().bold()
    } else {
        result.to_string().red().bold()
    };
    println!("{} after {:.2?}", status, started.elapsed());
    println!("  cycles          {}", stats.cycles);
    println!("  deadline misses {}", stats.deadline_misses);
    for (name, code) in &stats.exit_codes {
        println!("  {:<15} {}", name, code);
    }
    let heartbeat = heartbeat.lock();
    println!(
        "  heartbeats      {} sent, {} seen by monitor, {} reports back",
        heartbeat.sequence(),
        monitor.lock().heartbeats(),
        heartbeat.reports()
    );
    if let (Some(recorder), Some(path)) = (recorder, record) {
        println!(
            "  recorded        {} containers to {}",
            recorder.lock().written(),
            path.display()
        );
    }

    if result == RunResult::Ok {
        Ok(())
    } else {
        Err(format!("run finished with {}", result).into())
    }
}

fn dump(input: &Path, raw: bool, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let registry = demo::registry()?;
    let mut reader = BufReader::new(File::open(input)?);
    let mut count = 0usize;

    while let Some(container) = Container::read_from(&mut reader)? {
        if limit > 0 && count >= limit {
            break;
        }
        count += 1;
        print_container(&registry, &container, raw, count)?;
    }

    eprintln!("{} {} container(s)", "---".dimmed(), count);
    Ok(())
}

fn print_container(
    registry: &cadence::TypeRegistry,
    container: &Container,
    raw: bool,
    index: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = registry
        .long_name(container.data_type())
        .unwrap_or("<unknown>");
    println!(
        "{} {} {} (id {}) from {} sent {}",
        format!("#{}", index).dimmed(),
        container
            .sample_time_stamp()
            .format_yyyymmdd_hhmmss_ms()
            .dimmed(),
        name.cyan(),
        container.data_type(),
        container.sender_stamp(),
        container.sent_time_stamp()
    );

    if !raw {
        let (message, found) = registry.resolve(container);
        if found {
            for (field, value) in message.to_tuples() {
                println!("  {} = {}", field.yellow(), value);
            }
            return Ok(());
        }
    }

    for field in container.deserializer()?.raw_fields() {
        let label = registry
            .field_name(container.data_type(), field.tag)
            .map_or_else(|| field.tag.to_string(), str::to_string);
        println!("  {} [{}] = {}", label.yellow(), field.kind, field.value);
    }
    Ok(())
}
