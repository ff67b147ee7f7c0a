// Lottery Program - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{utils, vrf::RequestId};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum LotteryInstruction {
    /// Create the config and round accounts
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The operator, pays for both accounts
    /// 1. `[writable]` The config account (PDA)
    /// 2. `[writable]` The round account (PDA)
    /// 3. `[]` The oracle allowed to fulfill randomness
    /// 4. `[]` System program
    Initialize {
        /// External randomness subscription to bill requests against
        subscription_id: u64,
    },

    /// Open a fresh round. A prize the previous winner has not withdrawn is
    /// moved into the escrow PDA of the previous round first.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The operator, pays for the escrow if one is needed
    /// 1. `[]` The config account
    /// 2. `[writable]` The round account
    /// 3. `[writable]` The escrow account (PDA) of the round being replaced
    /// 4. `[]` System program
    StartLottery,

    /// Join the open round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player paying the entry fee
    /// 1. `[]` The config account
    /// 2. `[writable]` The round account
    /// 3. `[]` System program
    Enter {
        /// Lamports paid, must equal the entry fee
        amount: u64,
    },

    /// Close entries and request randomness
    ///
    /// Accounts expected:
    /// 0. `[signer]` The operator
    /// 1. `[writable]` The config account
    /// 2. `[writable]` The round account
    EndLottery,

    /// Deliver randomness for the pending request
    ///
    /// Accounts expected:
    /// 0. `[signer]` The oracle
    /// 1. `[]` The config account
    /// 2. `[writable]` The round account
    FulfillRandomWords {
        request_id: RequestId,
        random_words: Vec<u64>,
    },

    /// Pay the pool to the round's winner
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The winner
    /// 1. `[writable]` The round account
    WithdrawPrize,

    /// Pay an escrowed prize from an earlier round to its winner
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The winner
    /// 1. `[writable]` The escrow account (PDA) of `round_id`
    WithdrawEscrowedPrize {
        round_id: u64,
    },
}

impl LotteryInstruction {
    /// Unpacks a byte buffer into a LotteryInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create initialize instruction
pub fn initialize(
    program_id: &Pubkey,
    operator: &Pubkey,
    oracle: &Pubkey,
    subscription_id: u64,
) -> Instruction {
    let (config, _) = utils::find_config_address(program_id);
    let (round, _) = utils::find_round_address(program_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::Initialize { subscription_id },
        vec![
            AccountMeta::new(*operator, true),
            AccountMeta::new(config, false),
            AccountMeta::new(round, false),
            AccountMeta::new_readonly(*oracle, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create start_lottery instruction. `current_round_id` is the id of the
/// round being replaced, which keys its escrow account.
pub fn start_lottery(program_id: &Pubkey, operator: &Pubkey, current_round_id: u64) -> Instruction {
    let (config, _) = utils::find_config_address(program_id);
    let (round, _) = utils::find_round_address(program_id);
    let (escrow, _) = utils::find_escrow_address(program_id, current_round_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::StartLottery,
        vec![
            AccountMeta::new(*operator, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(round, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create enter instruction
pub fn enter(program_id: &Pubkey, player: &Pubkey, amount: u64) -> Instruction {
    let (config, _) = utils::find_config_address(program_id);
    let (round, _) = utils::find_round_address(program_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::Enter { amount },
        vec![
            AccountMeta::new(*player, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(round, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create end_lottery instruction
pub fn end_lottery(program_id: &Pubkey, operator: &Pubkey) -> Instruction {
    let (config, _) = utils::find_config_address(program_id);
    let (round, _) = utils::find_round_address(program_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::EndLottery,
        vec![
            AccountMeta::new_readonly(*operator, true),
            AccountMeta::new(config, false),
            AccountMeta::new(round, false),
        ],
    )
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    oracle: &Pubkey,
    request_id: RequestId,
    random_words: Vec<u64>,
) -> Instruction {
    let (config, _) = utils::find_config_address(program_id);
    let (round, _) = utils::find_round_address(program_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::FulfillRandomWords {
            request_id,
            random_words,
        },
        vec![
            AccountMeta::new_readonly(*oracle, true),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new(round, false),
        ],
    )
}

/// Create withdraw_prize instruction
pub fn withdraw_prize(program_id: &Pubkey, winner: &Pubkey) -> Instruction {
    let (round, _) = utils::find_round_address(program_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::WithdrawPrize,
        vec![
            AccountMeta::new(*winner, true),
            AccountMeta::new(round, false),
        ],
    )
}

/// Create withdraw_escrowed_prize instruction
pub fn withdraw_escrowed_prize(program_id: &Pubkey, winner: &Pubkey, round_id: u64) -> Instruction {
    let (escrow, _) = utils::find_escrow_address(program_id, round_id);
    Instruction::new_with_borsh(
        *program_id,
        &LotteryInstruction::WithdrawEscrowedPrize { round_id },
        vec![
            AccountMeta::new(*winner, true),
            AccountMeta::new(escrow, false),
        ],
    )
}
