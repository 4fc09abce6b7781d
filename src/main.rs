mod logging;
mod report;

use std::{path::PathBuf, time::Instant};

use clap::Parser;
use lazy_static::lazy_static;
use rv32_ils::{
    Emulator, SimConfig,
    config::{
        arch_config::WordType,
        ram_config::{DEFAULT_PC_VALUE, DEFAULT_SP_VALUE},
        sim_config::DEFAULT_MAX_CYCLES,
    },
};

use crate::{logging::LogLevel, report::Report};

lazy_static! {
    static ref cli_args: Args = Args::parse();
}

/// Accepts `0x`-prefixed hex or plain decimal.
fn parse_word(text: &str) -> Result<WordType, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => WordType::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid value `{}`: {}", text, e))
}

#[derive(Parser, Debug)]
#[command(version, about = "RV32IM instruction-level simulator", long_about = None)]
struct Args {
    /// Path of the hex ROM image.
    #[arg(default_value = "firmware.hex")]
    path: PathBuf,

    /// Stop after this many cycles.
    #[arg(short, long = "max-cycles", default_value_t = DEFAULT_MAX_CYCLES)]
    max_cycles: u64,

    /// Initial stack pointer (x2).
    #[arg(long, value_parser = parse_word, default_value_t = DEFAULT_SP_VALUE)]
    sp: WordType,

    /// Reset pc.
    #[arg(long, value_parser = parse_word, default_value_t = DEFAULT_PC_VALUE)]
    pc: WordType,

    /// Trace every executed instruction. Implies `--loglevel trace`.
    #[arg(short = 'g', long = "debug", default_value_t = false)]
    debug: bool,

    /// Switch log level.
    #[arg(value_enum, long = "loglevel", default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() {
    let level = if cli_args.debug {
        LogLevel::Trace
    } else {
        cli_args.log_level
    };
    let _logger_handle = match logging::init(level) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logger: {}", e);
            None
        }
    };

    let config = SimConfig::new()
        .initial_sp(cli_args.sp)
        .reset_pc(cli_args.pc)
        .max_cycles(cli_args.max_cycles)
        .trace(cli_args.debug);

    let mut emulator = match Emulator::from_hex_file(&cli_args.path, config) {
        Ok(emulator) => emulator,
        Err(e) => {
            eprintln!("{}: {}", cli_args.path.display(), e);
            std::process::exit(1);
        }
    };

    let now = Instant::now();
    emulator.run();
    let elapsed = now.elapsed();

    print!("{}", Report(emulator.board()));
    println!("Used time: {}s", elapsed.as_secs_f32());
}
