//! Round flow: the state machine, challenge aggregation and the clock

pub mod challenge;
pub mod round;
pub mod timer;

pub use challenge::{ChallengeState, TOTAL_ROUNDS};
pub use round::{RoundEvent, RoundPhase, RoundProgress, RoundStateMachine, WordOutcome};
pub use timer::{format_time, ManualTimer, Timer};
