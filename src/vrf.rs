// Randomness gateway: issues request ids and validates oracle fulfillments
use solana_program::msg;

use crate::{
    error::LotteryError,
    state::{LotteryConfig, Round, RoundStatus},
};

pub type RequestId = u64;

/// Number of random words requested per draw
pub const NUM_WORDS: u32 = 1;

/// An outstanding request for randomness, announced to the oracle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub request_id: RequestId,
    pub subscription_id: u64,
    pub num_words: u32,
}

/// Issue the next request id from the config's counter.
///
/// The oracle picks the request up from the `RandomnessRequested` log line
/// and answers later with `FulfillRandomWords`.
pub fn request_randomness(
    config: &mut LotteryConfig,
    round_id: u64,
) -> Result<RandomnessRequest, LotteryError> {
    let request_id = config.next_request_id;
    config.next_request_id = request_id.checked_add(1).ok_or(LotteryError::Overflow)?;

    let request = RandomnessRequest {
        request_id,
        subscription_id: config.subscription_id,
        num_words: NUM_WORDS,
    };
    msg!(
        "RandomnessRequested: request_id={} subscription_id={} round_id={} num_words={}",
        request.request_id,
        request.subscription_id,
        round_id,
        request.num_words
    );
    Ok(request)
}

/// Check that a fulfillment answers the round's outstanding request and
/// return the word used to draw the winner.
pub fn check_fulfillment(
    round: &Round,
    request_id: RequestId,
    random_words: &[u64],
) -> Result<u64, LotteryError> {
    let pending = match (round.status, round.pending_request) {
        (RoundStatus::Drawing, Some(pending)) => pending,
        _ => {
            msg!("Round {} has no outstanding randomness request", round.round_id);
            return Err(LotteryError::NotDrawing);
        }
    };
    if request_id != pending {
        msg!("Request {} does not match pending request {}", request_id, pending);
        return Err(LotteryError::UnknownRequest);
    }
    random_words.first().copied().ok_or_else(|| {
        msg!("Fulfillment for request {} carried no words", request_id);
        LotteryError::MissingRandomWords
    })
}

/// Map a random word onto a player index. `None` when there are no players.
pub fn winner_index(random_word: u64, player_count: usize) -> Option<usize> {
    if player_count == 0 {
        return None;
    }
    Some((random_word % player_count as u64) as usize)
}
