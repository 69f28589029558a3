#![no_main]

use libfuzzer_sys::fuzz_target;
use mips_core::{
    dump_registers, parse_word, run, AddressSpace, Decoder, NoopTraceSink, RunConfig, StopReason,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let word = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    if let Ok(instruction) = Decoder::decode(word) {
        assert_eq!(instruction.encode(), word);
    }

    let split = usize::from(data[0]).min(data.len());
    let (text, rest) = data.split_at(split);
    let mut state = AddressSpace::new(text, rest);
    let before = state.clone();

    let outcome = run(&mut state, &RunConfig::with_limit(256), &mut NoopTraceSink);
    if outcome.steps == 0 && matches!(outcome.stop, StopReason::Fault(_)) {
        assert_eq!(state, before);
    }
    let _ = dump_registers(&state);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_word(text);
    }
});
