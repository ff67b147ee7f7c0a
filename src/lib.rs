// Lottery Program
// A single-winner lottery: players pay a fixed fee, the operator closes entry,
// an oracle supplies randomness and the drawn winner withdraws the pool once.

pub mod access;
pub mod entrypoint;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod registry;
pub mod round;
pub mod state;
pub mod utils;
pub mod vault;

// Randomness request / fulfillment handshake
pub mod vrf;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
