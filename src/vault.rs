// Prize vault: pool accounting for the live round and lamport movement
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
};

use crate::{
    error::LotteryError,
    state::{PrizeEscrow, Round, RoundStatus},
};

impl Round {
    /// Lamports currently owed to this round's winner
    pub fn prize_pool(&self) -> u64 {
        self.pool
    }

    pub fn prize_paid(&self) -> bool {
        self.prize_paid
    }

    pub(crate) fn checked_pool_after(&self, amount: u64) -> Result<u64, LotteryError> {
        self.pool.checked_add(amount).ok_or(LotteryError::Overflow)
    }

    /// Release the pool to the winner.
    ///
    /// Zeroes the pool and marks the prize paid before returning the amount;
    /// the caller moves the lamports only after this bookkeeping is stored.
    pub fn claim_prize(&mut self, caller: &Pubkey) -> Result<u64, LotteryError> {
        if self.status != RoundStatus::Settled {
            msg!("Round {} is not settled", self.round_id);
            return Err(LotteryError::NotSettled);
        }
        if self.winner != Some(*caller) {
            msg!("{} is not the winner of round {}", caller, self.round_id);
            return Err(LotteryError::NotWinner);
        }
        if self.prize_paid || self.pool == 0 {
            msg!("Prize for round {} was already withdrawn", self.round_id);
            return Err(LotteryError::AlreadyWithdrawn);
        }

        let prize = self.pool;
        self.pool = 0;
        self.prize_paid = true;
        Ok(prize)
    }

    /// The prize a settled round still owes its winner, if any.
    ///
    /// Starting the next round moves this amount into an escrow so the new
    /// round's pool only ever holds its own entry fees.
    pub fn unclaimed_prize(&self) -> Option<PrizeEscrow> {
        match (self.status, self.winner) {
            (RoundStatus::Settled, Some(winner)) if !self.prize_paid && self.pool > 0 => {
                Some(PrizeEscrow {
                    is_initialized: true,
                    round_id: self.round_id,
                    winner,
                    amount: self.pool,
                    claimed: false,
                })
            }
            _ => None,
        }
    }
}

impl PrizeEscrow {
    /// Release an escrowed prize to its winner, marking it claimed first
    pub fn claim(&mut self, caller: &Pubkey) -> Result<u64, LotteryError> {
        if self.winner != *caller {
            msg!("{} is not the winner of round {}", caller, self.round_id);
            return Err(LotteryError::NotWinner);
        }
        if self.claimed || self.amount == 0 {
            msg!("Escrowed prize for round {} was already withdrawn", self.round_id);
            return Err(LotteryError::AlreadyWithdrawn);
        }

        let prize = self.amount;
        self.amount = 0;
        self.claimed = true;
        Ok(prize)
    }
}

/// Move an entry fee from the player into the round account
pub fn deposit<'a>(
    player_info: &AccountInfo<'a>,
    round_info: &AccountInfo<'a>,
    system_program_info: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    if player_info.lamports() < amount {
        msg!(
            "Insufficient funds: needed {} lamports, had {} lamports",
            amount,
            player_info.lamports()
        );
        return Err(ProgramError::InsufficientFunds);
    }
    invoke(
        &system_instruction::transfer(player_info.key, round_info.key, amount),
        &[
            player_info.clone(),
            round_info.clone(),
            system_program_info.clone(),
        ],
    )
}

/// Move `amount` out of a program-owned account (round or escrow)
pub fn pay_out(source_info: &AccountInfo, recipient_info: &AccountInfo, amount: u64) -> ProgramResult {
    let remaining = source_info
        .lamports()
        .checked_sub(amount)
        .ok_or(ProgramError::InsufficientFunds)?;
    let credited = recipient_info
        .lamports()
        .checked_add(amount)
        .ok_or(LotteryError::Overflow)?;

    **source_info.try_borrow_mut_lamports()? = remaining;
    **recipient_info.try_borrow_mut_lamports()? = credited;
    Ok(())
}
