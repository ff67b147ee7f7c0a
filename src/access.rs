//! Fixed-identity access checks for privileged operations.

use solana_program::{msg, pubkey::Pubkey};

use crate::{error::LotteryError, state::LotteryConfig};

pub fn is_operator(config: &LotteryConfig, caller: &Pubkey) -> bool {
    config.operator == *caller
}

pub fn is_oracle(config: &LotteryConfig, caller: &Pubkey) -> bool {
    config.oracle == *caller
}

pub fn require_operator(config: &LotteryConfig, caller: &Pubkey) -> Result<(), LotteryError> {
    if !is_operator(config, caller) {
        msg!("Caller {} is not the operator", caller);
        return Err(LotteryError::NotOperator);
    }
    Ok(())
}

pub fn require_oracle(config: &LotteryConfig, caller: &Pubkey) -> Result<(), LotteryError> {
    if !is_oracle(config, caller) {
        msg!("Caller {} is not the oracle", caller);
        return Err(LotteryError::NotOracle);
    }
    Ok(())
}
