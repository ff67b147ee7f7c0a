use solana_program::{decode_error::DecodeError, program_error::ProgramError};
use thiserror::Error;

/// Broad class of a [`LotteryError`], used by callers deciding how to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller is not the operator or the oracle
    Authorization,
    /// Operation is not allowed in the current round phase
    State,
    /// Inputs were rejected
    Validation,
    /// Payout rejected
    Settlement,
}

/// Errors that may be returned by the Lottery program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LotteryError {
    /// Only the operator can perform this action
    #[error("Only the operator can perform this action")]
    NotOperator,

    /// Only the oracle can fulfill randomness
    #[error("Only the oracle can fulfill randomness")]
    NotOracle,

    /// Round is not accepting entries
    #[error("Round is closed")]
    RoundClosed,

    /// A round is open or drawing
    #[error("Round is still in progress")]
    RoundInProgress,

    /// Round is not open
    #[error("Round is not open")]
    RoundNotOpen,

    /// A randomness request is already outstanding
    #[error("Randomness request already pending")]
    RequestPending,

    /// Nobody entered the round
    #[error("Round has no players")]
    NoPlayers,

    /// No randomness request is outstanding
    #[error("Round is not drawing")]
    NotDrawing,

    /// Winner has not been drawn yet
    #[error("Round is not settled")]
    NotSettled,

    #[error("Incorrect entry fee")]
    IncorrectFee,

    #[error("This member has already joined")]
    AlreadyEntered,

    #[error("Round is full")]
    RoundFull,

    /// Fulfillment for an unknown or stale request id
    #[error("Unknown randomness request")]
    UnknownRequest,

    #[error("No random words supplied")]
    MissingRandomWords,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Caller is not the winner")]
    NotWinner,

    #[error("Prize already withdrawn")]
    AlreadyWithdrawn,
}

impl LotteryError {
    pub fn kind(&self) -> ErrorKind {
        use LotteryError::*;
        match self {
            NotOperator | NotOracle => ErrorKind::Authorization,
            RoundClosed | RoundInProgress | RoundNotOpen | RequestPending | NoPlayers
            | NotDrawing | NotSettled => ErrorKind::State,
            IncorrectFee | AlreadyEntered | RoundFull | UnknownRequest | MissingRandomWords
            | Overflow => ErrorKind::Validation,
            NotWinner | AlreadyWithdrawn => ErrorKind::Settlement,
        }
    }
}

impl From<LotteryError> for ProgramError {
    fn from(e: LotteryError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for LotteryError {
    fn type_of() -> &'static str {
        "Lottery Error"
    }
}
