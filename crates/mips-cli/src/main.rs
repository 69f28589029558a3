//! CLI entry point for the `mips-emu` interpreter binary.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use mips_core::{
    dump_memory, dump_registers, run_inspect, AddressRange, AddressSpace, DumpError, MemoryDump,
    ObjectImage, RunConfig, StopReason, TraceEvent, TraceSink, DEFAULT_INSTRUCTION_LIMIT,
};
#[cfg(test)]
use tempfile as _;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(
    name = "mips-emu",
    version,
    about = "Run a MIPS object file and dump the final machine state",
    after_help = "Examples:\n  mips-emu fib.obj\n  mips-emu fib.obj -m 0x10000000:0x10000024\n  mips-emu loop.obj -n 100 -d"
)]
struct Cli {
    /// Object file to load.
    file: PathBuf,

    /// Inclusive memory range to dump.
    #[arg(short, long, value_name = "BEGIN:END")]
    memory: Option<AddressRange>,

    /// Dump state after every executed instruction.
    #[arg(short, long)]
    dump_each_tick: bool,

    /// Maximum number of instructions to execute.
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_INSTRUCTION_LIMIT)]
    instructions: u32,
}

/// Logs run-loop events through `tracing`.
#[derive(Debug, Default)]
struct LogSink;

impl TraceSink for LogSink {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionRetired { pc, word } => {
                debug!("{pc:#010x}: {word:#010x}");
            }
            TraceEvent::FaultRaised { pc, cause } => {
                info!(code = cause.as_u8(), "{pc:#010x}: {cause}");
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn render(state: &AddressSpace, memory: Option<AddressRange>) -> Result<String, DumpError> {
    let mut text = dump_registers(state);
    text.push('\n');
    if let Some(range) = memory {
        text.push_str(&dump_memory(state, range)?);
        text.push('\n');
    }
    Ok(text)
}

fn run_emulator(cli: &Cli) -> Result<(), i32> {
    let image = match ObjectImage::read(&cli.file) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };
    let mut state = image.into_address_space();

    // Segment sizes are fixed, so a range that fits now fits for the whole run.
    if let Some(range) = cli.memory {
        if let Err(e) = MemoryDump::new(&state, range) {
            eprintln!("error: {e}");
            return Err(1);
        }
    }

    info!(
        text = state.text_size(),
        data = state.data_size(),
        "loaded {}",
        cli.file.display()
    );

    let config = RunConfig::with_limit(cli.instructions);
    let outcome = run_inspect(&mut state, &config, &mut LogSink, |space| {
        if cli.dump_each_tick {
            if let Ok(text) = render(space, cli.memory) {
                print!("{text}");
            }
        }
    });
    debug!(steps = outcome.steps, stop = ?outcome.stop, "run finished");

    if let StopReason::Fault(cause) = outcome.stop {
        eprintln!("warning: {cause} at pc {:#x}", state.pc());
    }

    match render(&state, cli.memory) {
        Ok(text) => {
            print!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(1)
        }
    }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if error.use_stderr() => {
            let _ = error.print();
            process::exit(1);
        }
        Err(error) => error.exit(),
    };

    let exit_code = match run_emulator(&cli) {
        Ok(()) => 0,
        Err(code) => code,
    };

    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mips_core::Address;

    #[test]
    fn parses_file_with_defaults() {
        let cli = Cli::try_parse_from(["mips-emu", "fib.obj"]).expect("file alone should parse");

        assert_eq!(
            cli,
            Cli {
                file: PathBuf::from("fib.obj"),
                memory: None,
                dump_each_tick: false,
                instructions: u32::MAX,
            }
        );
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from([
            "mips-emu",
            "-m",
            "0x10000000:0x10000024",
            "-d",
            "-n",
            "12",
            "fib.obj",
        ])
        .expect("short flags should parse");

        assert_eq!(
            cli.memory,
            Some(AddressRange {
                start: Address::data(0),
                end: Address::data(0x24),
            })
        );
        assert!(cli.dump_each_tick);
        assert_eq!(cli.instructions, 12);
    }

    #[test]
    fn parses_long_flags() {
        let cli = Cli::try_parse_from([
            "mips-emu",
            "fib.obj",
            "--memory",
            "0x400000:0x400008",
            "--dump-each-tick",
            "--instructions",
            "7",
        ])
        .expect("long flags should parse");

        assert_eq!(cli.memory.map(|range| range.end), Some(Address::text(8)));
        assert!(cli.dump_each_tick);
        assert_eq!(cli.instructions, 7);
    }

    #[test]
    fn rejects_missing_file() {
        assert!(Cli::try_parse_from(["mips-emu"]).is_err());
    }

    #[test]
    fn rejects_extra_positional() {
        assert!(Cli::try_parse_from(["mips-emu", "a.obj", "b.obj"]).is_err());
    }

    #[test]
    fn rejects_malformed_range() {
        assert!(Cli::try_parse_from(["mips-emu", "a.obj", "-m", "0x10000000"]).is_err());
        assert!(Cli::try_parse_from(["mips-emu", "a.obj", "-m", "10:0x20"]).is_err());
    }

    #[test]
    fn rejects_negative_limit() {
        assert!(Cli::try_parse_from(["mips-emu", "a.obj", "-n", "-1"]).is_err());
    }

    #[test]
    fn log_sink_accepts_every_event_kind() {
        let mut sink = LogSink;
        sink.on_event(TraceEvent::InstructionRetired {
            pc: 0x0040_0000,
            word: 0x2401_0001,
        });
        sink.on_event(TraceEvent::FaultRaised {
            pc: 0x0040_0004,
            cause: mips_core::TickError::InvalidInstruction,
        });
    }

    #[test]
    fn render_appends_memory_after_blank_line() {
        let state = AddressSpace::new(&[0; 4], &[0, 0, 0, 7]);
        let range = AddressRange {
            start: Address::data(0),
            end: Address::data(0),
        };

        let text = render(&state, Some(range)).expect("range fits");

        assert!(text.starts_with("Current register values:\n"));
        assert!(text.contains("R31: 0x0\n\nMemory content [0x10000000..0x10000000]:\n"));
        assert!(text.ends_with("0x10000000: 0x7\n\n"));
    }

    #[test]
    fn render_without_range_is_registers_then_blank_line() {
        let state = AddressSpace::new(&[0; 4], &[]);
        let text = render(&state, None).expect("no range");
        assert_eq!(text, format!("{}\n", dump_registers(&state)));
    }
}
