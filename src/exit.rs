use crate::error::ProbeError;
use crate::modes::session::Outcome;

pub mod codes {
    /// Normal end, help, or interrupt.
    pub const SUCCESS: i32 = 0;
    /// Bad arguments, connection failure, or a broken transfer.
    pub const FAILURE: i32 = 1;
}

pub fn exit_code(error: &ProbeError) -> i32 {
    match error {
        ProbeError::MissingMode
        | ProbeError::InvalidMode(_)
        | ProbeError::InvalidFrame { .. }
        | ProbeError::Params(_)
        | ProbeError::Journal { .. }
        | ProbeError::Connect { .. } => codes::FAILURE,
    }
}

pub fn outcome_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Closed | Outcome::Reset | Outcome::Interrupted => codes::SUCCESS,
        Outcome::Failed(_) => codes::FAILURE,
    }
}
