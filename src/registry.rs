//! Entry registry: who is in the live round, in entry order.

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::LotteryError,
    state::{Round, RoundStatus, MAX_PLAYERS},
};

impl Round {
    /// Register `player` for the open round, crediting `paid` to the pool.
    ///
    /// Every check runs before anything is written, so a rejected entry
    /// leaves the round exactly as it was.
    pub fn enter(&mut self, player: Pubkey, paid: u64, entry_fee: u64) -> Result<(), LotteryError> {
        if !self.lottery_open() {
            msg!("Round {} is not accepting entries", self.round_id);
            return Err(LotteryError::RoundClosed);
        }
        if paid != entry_fee {
            msg!("Entry fee is {} lamports, got {}", entry_fee, paid);
            return Err(LotteryError::IncorrectFee);
        }
        if self.is_member(&player) {
            msg!("{} already entered round {}", player, self.round_id);
            return Err(LotteryError::AlreadyEntered);
        }
        if self.players.len() >= MAX_PLAYERS {
            msg!("Round {} is full", self.round_id);
            return Err(LotteryError::RoundFull);
        }
        let pool = self.checked_pool_after(paid)?;

        self.players.push(player);
        self.membership.insert(player);
        self.pool = pool;
        Ok(())
    }

    /// Players of the live round in entry order
    pub fn players(&self) -> &[Pubkey] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_member(&self, player: &Pubkey) -> bool {
        self.membership.contains(player)
    }

    pub fn lottery_open(&self) -> bool {
        self.status == RoundStatus::Open
    }
}
