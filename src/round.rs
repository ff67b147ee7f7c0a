//! Round lifecycle: Closed -> Open -> Drawing -> Settled -> Open ...
//!
//! Each transition validates caller and phase before touching state. Starting
//! a round never edits the old one; it produces a brand new [`Round`].

use solana_program::{msg, pubkey::Pubkey};
use std::collections::BTreeSet;

use crate::{
    access,
    error::LotteryError,
    state::{LotteryConfig, Round, RoundStatus},
    vrf::{self, RandomnessRequest, RequestId},
};

impl Round {
    /// A round nobody can enter yet
    pub fn closed(round_id: u64) -> Self {
        Self {
            round_id,
            status: RoundStatus::Closed,
            players: Vec::new(),
            membership: BTreeSet::new(),
            winner: None,
            pending_request: None,
            pool: 0,
            prize_paid: false,
        }
    }

    /// Build the round that replaces this one when the operator starts a lottery.
    ///
    /// An unwithdrawn prize does not block the next round; the caller moves it
    /// into escrow first (see [`Round::unclaimed_prize`]).
    pub fn start_lottery(&self, config: &LotteryConfig, caller: &Pubkey) -> Result<Round, LotteryError> {
        access::require_operator(config, caller)?;
        match self.status {
            RoundStatus::Closed | RoundStatus::Settled => {}
            RoundStatus::Open | RoundStatus::Drawing => {
                msg!("Round {} is still in progress", self.round_id);
                return Err(LotteryError::RoundInProgress);
            }
        }
        let round_id = self.round_id.checked_add(1).ok_or(LotteryError::Overflow)?;

        let mut next = Round::closed(round_id);
        next.status = RoundStatus::Open;
        Ok(next)
    }

    /// Close entries and ask the gateway for randomness
    pub fn end_lottery(
        &mut self,
        config: &mut LotteryConfig,
        caller: &Pubkey,
    ) -> Result<RandomnessRequest, LotteryError> {
        access::require_operator(config, caller)?;
        match self.status {
            RoundStatus::Open => {}
            RoundStatus::Drawing => {
                msg!("Round {} already has a pending request", self.round_id);
                return Err(LotteryError::RequestPending);
            }
            _ => {
                msg!("Round {} is not open", self.round_id);
                return Err(LotteryError::RoundNotOpen);
            }
        }
        if self.players.is_empty() {
            msg!("Round {} has no players, cannot draw", self.round_id);
            return Err(LotteryError::NoPlayers);
        }

        let request = vrf::request_randomness(config, self.round_id)?;
        self.pending_request = Some(request.request_id);
        self.status = RoundStatus::Drawing;
        Ok(request)
    }

    /// Oracle callback: settle the round with `players[word mod len]`
    pub fn fulfill_random_words(
        &mut self,
        config: &LotteryConfig,
        caller: &Pubkey,
        request_id: RequestId,
        random_words: &[u64],
    ) -> Result<Pubkey, LotteryError> {
        access::require_oracle(config, caller)?;
        let word = vrf::check_fulfillment(self, request_id, random_words)?;
        let index =
            vrf::winner_index(word, self.players.len()).ok_or(LotteryError::NoPlayers)?;
        let winner = self.players[index];

        self.pending_request = None;
        self.winner = Some(winner);
        self.status = RoundStatus::Settled;
        Ok(winner)
    }

    pub fn winner(&self) -> Option<Pubkey> {
        self.winner
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending_request
    }
}
