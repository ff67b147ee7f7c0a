// Lottery Program - Utility Functions
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::state::{LotteryConfig, PrizeEscrow, Round};

pub const CONFIG_SEED: &[u8] = b"config";
pub const ROUND_SEED: &[u8] = b"round";
pub const ESCROW_SEED: &[u8] = b"escrow";

/// Find the program derived address of the config account
pub fn find_config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// Find the program derived address of the round account
pub fn find_round_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ROUND_SEED], program_id)
}

/// Find the program derived address holding the unclaimed prize of `round_id`
pub fn find_escrow_address(program_id: &Pubkey, round_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_SEED, &round_id.to_le_bytes()], program_id)
}

/// Create a program-owned PDA with `space` bytes, rent exempt.
///
/// Anyone can send lamports to a PDA before it exists, which makes
/// `create_account` fail. When the address already holds lamports it is
/// topped up to the rent-exempt minimum and then allocated and assigned.
pub fn create_pda_account<'a>(
    payer_info: &AccountInfo<'a>,
    new_account_info: &AccountInfo<'a>,
    system_program_info: &AccountInfo<'a>,
    program_id: &Pubkey,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let rent = Rent::get()?;
    let required = rent.minimum_balance(space);
    let current = new_account_info.lamports();

    if current == 0 {
        return invoke_signed(
            &system_instruction::create_account(
                payer_info.key,
                new_account_info.key,
                required,
                space as u64,
                program_id,
            ),
            &[
                payer_info.clone(),
                new_account_info.clone(),
                system_program_info.clone(),
            ],
            &[signer_seeds],
        );
    }

    msg!("Account {} is pre-funded with {} lamports", new_account_info.key, current);
    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        invoke(
            &system_instruction::transfer(payer_info.key, new_account_info.key, top_up),
            &[
                payer_info.clone(),
                new_account_info.clone(),
                system_program_info.clone(),
            ],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(new_account_info.key, space as u64),
        &[new_account_info.clone(), system_program_info.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account_info.key, program_id),
        &[new_account_info.clone(), system_program_info.clone()],
        &[signer_seeds],
    )
}

fn check_program_account(
    program_id: &Pubkey,
    info: &AccountInfo,
    expected: &Pubkey,
    name: &str,
) -> Result<(), ProgramError> {
    if info.key != expected {
        msg!("Invalid {} account address", name);
        return Err(ProgramError::InvalidArgument);
    }
    if info.owner != program_id {
        msg!("{} account must be owned by this program", name);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Verify and decode the config account
pub fn load_config(program_id: &Pubkey, info: &AccountInfo) -> Result<LotteryConfig, ProgramError> {
    let (expected, _) = find_config_address(program_id);
    check_program_account(program_id, info, &expected, "config")?;
    let data = info.try_borrow_data()?;
    LotteryConfig::unpack(&data)
}

/// Verify and decode the round account
pub fn load_round(program_id: &Pubkey, info: &AccountInfo) -> Result<Round, ProgramError> {
    let (expected, _) = find_round_address(program_id);
    check_program_account(program_id, info, &expected, "round")?;
    let data = info.try_borrow_data()?;
    Round::unpack(&data)
}

/// Verify and decode the escrow of `round_id`
pub fn load_escrow(
    program_id: &Pubkey,
    info: &AccountInfo,
    round_id: u64,
) -> Result<PrizeEscrow, ProgramError> {
    let (expected, _) = find_escrow_address(program_id, round_id);
    check_program_account(program_id, info, &expected, "escrow")?;
    let data = info.try_borrow_data()?;
    PrizeEscrow::unpack(&data)
}

pub fn store_round(round: &Round, info: &AccountInfo) -> Result<(), ProgramError> {
    let mut data = info.try_borrow_mut_data()?;
    round.pack_into(&mut data[..])
}

pub fn require_signer(info: &AccountInfo, role: &str) -> Result<(), ProgramError> {
    if !info.is_signer {
        msg!("{} must sign the transaction", role);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / 1_000_000_000.0
}
