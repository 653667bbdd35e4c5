use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use lc3_rs::{CpuConfig, Machine, ReservedOpcodePolicy, RunOutcome, StdConsole};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run LC-3 program images")]
struct Opts {
    /// Stop with an error on reserved opcodes instead of skipping them
    #[arg(long)]
    strict: bool,
    /// Give up after this many instructions
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,
    /// Print the final register state as JSON on stderr
    #[arg(long)]
    dump_state: bool,
    /// Images are loaded in order into the same memory
    #[arg(value_name = "IMAGE", required = true, num_args = 1..)]
    images: Vec<PathBuf>,
}

/// Puts the host terminal in raw mode for as long as it lives.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enter raw terminal mode")?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let cfg = CpuConfig {
        reserved_opcodes: if opts.strict {
            ReservedOpcodePolicy::Fault
        } else {
            ReservedOpcodePolicy::Ignore
        },
        step_limit: opts.max_steps,
        ..CpuConfig::default()
    };

    let interactive = std::io::stdin().is_terminal();
    let mut vm = Machine::new(cfg, StdConsole::new().raw_terminal(interactive));

    // Every image must load before anything runs
    for path in &opts.images {
        vm.load_image_file(path)
            .with_context(|| format!("failed to load image: {}", path.display()))?;
    }

    let outcome = {
        let _raw = if interactive {
            Some(RawMode::enable()?)
        } else {
            None
        };
        vm.run()
    };

    if opts.dump_state {
        eprintln!("{}", serde_json::to_string_pretty(&vm.snapshot())?);
    }

    match outcome? {
        RunOutcome::Halted { .. } => Ok(()),
        RunOutcome::StepLimit { steps } => {
            anyhow::bail!("step limit reached after {steps} instruction(s)")
        }
    }
}
