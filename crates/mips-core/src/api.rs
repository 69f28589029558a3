//! Host-facing run loop, configuration, and trace hooks.

use crate::execute::step;
use crate::{AddressSpace, TickError};

/// Default instruction limit: effectively unbounded.
pub const DEFAULT_INSTRUCTION_LIMIT: u32 = u32::MAX;

/// Run loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunConfig {
    /// Maximum number of ticks attempted by one [`run`] call.
    pub instruction_limit: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            instruction_limit: DEFAULT_INSTRUCTION_LIMIT,
        }
    }
}

impl RunConfig {
    /// Configuration that stops after `instruction_limit` ticks.
    #[must_use]
    pub const fn with_limit(instruction_limit: u32) -> Self {
        Self { instruction_limit }
    }
}

/// Deterministic events emitted at tick boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// A tick retired one instruction.
    InstructionRetired {
        /// Program counter the word was fetched from.
        pc: u32,
        /// Raw instruction word.
        word: u32,
    },
    /// A tick was rejected.
    FaultRaised {
        /// Program counter at the time of the tick.
        pc: u32,
        /// Rejection kind.
        cause: TickError,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Why a [`run`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The program counter reached the end of the text segment.
    Terminated,
    /// The configured instruction limit was reached first.
    InstructionLimit,
    /// A tick was rejected; the state is as it was before that tick.
    Fault(TickError),
}

/// Aggregated outcome of one [`run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of retired instructions.
    pub steps: u32,
    /// Condition that ended the run.
    pub stop: StopReason,
}

/// Ticks until termination, the instruction limit, or the first error.
pub fn run(state: &mut AddressSpace, config: &RunConfig, sink: &mut dyn TraceSink) -> RunOutcome {
    run_inspect(state, config, sink, |_| {})
}

/// Like [`run`], calling `inspect` with the state after every retired instruction.
pub fn run_inspect<F>(
    state: &mut AddressSpace,
    config: &RunConfig,
    sink: &mut dyn TraceSink,
    mut inspect: F,
) -> RunOutcome
where
    F: FnMut(&AddressSpace),
{
    let mut steps = 0;

    let stop = loop {
        if state.is_terminated() {
            break StopReason::Terminated;
        }
        if steps >= config.instruction_limit {
            break StopReason::InstructionLimit;
        }

        let pc = state.pc();
        match step(state) {
            Ok(retired) => {
                steps += 1;
                sink.on_event(TraceEvent::InstructionRetired {
                    pc: retired.pc,
                    word: retired.word,
                });
                inspect(state);
            }
            Err(cause) => {
                sink.on_event(TraceEvent::FaultRaised { pc, cause });
                break StopReason::Fault(cause);
            }
        }
    };

    RunOutcome { steps, stop }
}

#[cfg(test)]
mod tests {
    use super::{
        run, run_inspect, NoopTraceSink, RunConfig, RunOutcome, StopReason, TraceEvent,
        DEFAULT_INSTRUCTION_LIMIT,
    };
    use crate::{AddressSpace, TickError, TEXT_BASE};

    fn program(words: &[u32]) -> AddressSpace {
        let text: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
        AddressSpace::new(&text, &[0; 4])
    }

    #[test]
    fn default_config_is_unbounded() {
        assert_eq!(
            RunConfig::default().instruction_limit,
            DEFAULT_INSTRUCTION_LIMIT
        );
    }

    #[test]
    fn run_stops_at_termination_and_traces_each_retirement() {
        // addiu $1, $0, 1 ; addiu $1, $1, 1
        let mut state = program(&[0x2401_0001, 0x2421_0001]);
        let mut events: Vec<TraceEvent> = Vec::new();

        let outcome = run(&mut state, &RunConfig::default(), &mut events);

        assert_eq!(
            outcome,
            RunOutcome {
                steps: 2,
                stop: StopReason::Terminated,
            }
        );
        assert_eq!(
            events,
            vec![
                TraceEvent::InstructionRetired {
                    pc: TEXT_BASE,
                    word: 0x2401_0001,
                },
                TraceEvent::InstructionRetired {
                    pc: TEXT_BASE + 4,
                    word: 0x2421_0001,
                },
            ]
        );
    }

    #[test]
    fn run_honors_instruction_limit() {
        // j 0x400000
        let mut state = program(&[0x0810_0000]);
        let outcome = run(&mut state, &RunConfig::with_limit(10), &mut NoopTraceSink);

        assert_eq!(outcome.steps, 10);
        assert_eq!(outcome.stop, StopReason::InstructionLimit);
        assert_eq!(state.pc(), TEXT_BASE);
    }

    #[test]
    fn run_stops_on_first_fault() {
        let mut state = program(&[0x2401_0001, 0xFFFF_FFFF, 0x2401_0002]);
        let mut events: Vec<TraceEvent> = Vec::new();

        let outcome = run(&mut state, &RunConfig::default(), &mut events);

        assert_eq!(outcome.steps, 1);
        assert_eq!(outcome.stop, StopReason::Fault(TickError::InvalidInstruction));
        assert_eq!(
            events.last(),
            Some(&TraceEvent::FaultRaised {
                pc: TEXT_BASE + 4,
                cause: TickError::InvalidInstruction,
            })
        );
        assert_eq!(state.pc(), TEXT_BASE + 4);
    }

    #[test]
    fn terminated_state_runs_zero_steps() {
        let mut state = program(&[]);
        let mut events: Vec<TraceEvent> = Vec::new();

        let outcome = run(&mut state, &RunConfig::default(), &mut events);

        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.stop, StopReason::Terminated);
        assert!(events.is_empty());
    }

    #[test]
    fn inspect_sees_state_after_every_retirement() {
        let mut state = program(&[0x2401_0001, 0x2421_0001, 0x2421_0001]);
        let mut seen = Vec::new();

        run_inspect(&mut state, &RunConfig::default(), &mut NoopTraceSink, |space| {
            seen.push(space.register(1).unwrap_or_default());
        });

        assert_eq!(seen, vec![1, 2, 3]);
    }
}
