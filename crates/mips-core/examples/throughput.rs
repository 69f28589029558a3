//! Interpreter throughput harness.
//!
//! Measures retired instructions per second for a few representative
//! instruction mixes.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -p mips-core --release --example throughput
//! ```

#![allow(clippy::pedantic)]

use mips_core::{run, AddressSpace, NoopTraceSink, RunConfig, StopReason, TEXT_BASE};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

use std::time::{Duration, Instant};

const BATCH: u32 = 100_000;

const fn r_word(funct: u32, rs: u32, rt: u32, rd: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | funct
}

const fn i_word(opcode: u32, rs: u32, rt: u32, immediate: u16) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | immediate as u32
}

const fn j_to_start() -> u32 {
    (0x02 << 26) | ((TEXT_BASE >> 2) & 0x03FF_FFFF)
}

fn program(words: &[u32], data_len: usize) -> AddressSpace {
    let text: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
    AddressSpace::new(&text, &vec![0; data_len])
}

#[derive(Debug, Clone, Copy)]
struct BenchmarkResult {
    name: &'static str,
    instructions: u64,
    elapsed: Duration,
}

impl BenchmarkResult {
    fn instructions_per_second(&self) -> f64 {
        self.instructions as f64 / self.elapsed.as_secs_f64()
    }
}

fn measure(name: &'static str, mut state: AddressSpace, duration: Duration) -> BenchmarkResult {
    let config = RunConfig::with_limit(BATCH);
    let start = Instant::now();
    let mut instructions = 0_u64;

    while start.elapsed() < duration {
        let outcome = run(&mut state, &config, &mut NoopTraceSink);
        instructions += u64::from(outcome.steps);
        if outcome.stop != StopReason::InstructionLimit {
            eprintln!("{name}: stopped early with {:?}", outcome.stop);
            break;
        }
    }

    BenchmarkResult {
        name,
        instructions,
        elapsed: start.elapsed(),
    }
}

fn alu_loop() -> AddressSpace {
    program(
        &[
            i_word(0x09, 1, 1, 1),
            r_word(0x21, 1, 2, 2),
            r_word(0x23, 2, 1, 3),
            r_word(0x24, 2, 3, 4),
            r_word(0x25, 2, 3, 5),
            r_word(0x27, 4, 5, 6),
            r_word(0x2B, 1, 2, 7),
            j_to_start(),
        ],
        0,
    )
}

fn memory_loop() -> AddressSpace {
    program(
        &[
            i_word(0x0F, 0, 8, 0x1000),
            i_word(0x2B, 8, 1, 0),
            i_word(0x23, 8, 2, 0),
            i_word(0x28, 8, 2, 4),
            i_word(0x20, 8, 3, 4),
            i_word(0x09, 1, 1, 1),
            j_to_start(),
        ],
        16,
    )
}

fn branch_loop() -> AddressSpace {
    program(
        &[
            i_word(0x09, 1, 1, 1),
            i_word(0x0C, 1, 2, 0x3),
            i_word(0x05, 2, 0, 0xFFFD),
            i_word(0x04, 0, 0, 0xFFFC),
        ],
        0,
    )
}

fn main() {
    let duration = Duration::from_secs(1);
    let results = [
        measure("alu", alu_loop(), duration),
        measure("memory", memory_loop(), duration),
        measure("branch", branch_loop(), duration),
    ];

    println!("{:<10} {:>14} {:>16}", "mix", "instructions", "instr/sec");
    for result in &results {
        println!(
            "{:<10} {:>14} {:>16.0}",
            result.name,
            result.instructions,
            result.instructions_per_second()
        );
    }
}
