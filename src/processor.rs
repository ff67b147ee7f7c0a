// Lottery Program - Instruction Processor
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};

use crate::{
    error::LotteryError,
    instruction::LotteryInstruction,
    state::{LotteryConfig, PrizeEscrow, Round},
    utils::{self, CONFIG_SEED, ESCROW_SEED, ROUND_SEED},
    vault,
    vrf::RequestId,
};

/// Log a rejected operation and turn it into the program error it returns
fn reject(error: LotteryError) -> ProgramError {
    msg!("Rejected: {}", error);
    error.into()
}

/// Program state handler.
pub struct Processor {}

impl Processor {
    /// Process a Lottery instruction
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LotteryInstruction::unpack(instruction_data)?;

        match instruction {
            LotteryInstruction::Initialize { subscription_id } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(program_id, accounts, subscription_id)
            }
            LotteryInstruction::StartLottery => {
                msg!("Instruction: Start Lottery");
                Self::process_start_lottery(program_id, accounts)
            }
            LotteryInstruction::Enter { amount } => {
                msg!("Instruction: Enter");
                Self::process_enter(program_id, accounts, amount)
            }
            LotteryInstruction::EndLottery => {
                msg!("Instruction: End Lottery");
                Self::process_end_lottery(program_id, accounts)
            }
            LotteryInstruction::FulfillRandomWords {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, &random_words)
            }
            LotteryInstruction::WithdrawPrize => {
                msg!("Instruction: Withdraw Prize");
                Self::process_withdraw_prize(program_id, accounts)
            }
            LotteryInstruction::WithdrawEscrowedPrize { round_id } => {
                msg!("Instruction: Withdraw Escrowed Prize");
                Self::process_withdraw_escrowed_prize(program_id, accounts, round_id)
            }
        }
    }

    /// Create the config and round PDAs. Only called once per deployment.
    fn process_initialize(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        subscription_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let operator_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let oracle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        utils::require_signer(operator_info, "Operator")?;

        let (config_pubkey, config_bump) = utils::find_config_address(program_id);
        let (round_pubkey, round_bump) = utils::find_round_address(program_id);
        if *config_info.key != config_pubkey || *round_info.key != round_pubkey {
            msg!("Invalid config or round account address");
            return Err(ProgramError::InvalidArgument);
        }
        if config_info.owner == program_id || round_info.owner == program_id {
            msg!("Lottery is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        utils::create_pda_account(
            operator_info,
            config_info,
            system_program_info,
            program_id,
            LotteryConfig::LEN,
            &[CONFIG_SEED, &[config_bump]],
        )?;
        utils::create_pda_account(
            operator_info,
            round_info,
            system_program_info,
            program_id,
            Round::LEN,
            &[ROUND_SEED, &[round_bump]],
        )?;

        let config = LotteryConfig::new(*operator_info.key, *oracle_info.key, subscription_id);
        LotteryConfig::pack(config, &mut config_info.try_borrow_mut_data()?)?;
        utils::store_round(&Round::closed(0), round_info)?;

        msg!(
            "Lottery initialized: Operator={}, Oracle={}, Subscription={}, EntryFee={} SOL",
            operator_info.key,
            oracle_info.key,
            subscription_id,
            utils::lamports_to_sol(config.entry_fee)
        );
        Ok(())
    }

    fn process_start_lottery(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let operator_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let escrow_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        utils::require_signer(operator_info, "Operator")?;
        let config = utils::load_config(program_id, config_info)?;
        let round = utils::load_round(program_id, round_info)?;

        let next = round
            .start_lottery(&config, operator_info.key)
            .map_err(reject)?;

        if let Some(escrow) = round.unclaimed_prize() {
            let (escrow_pubkey, escrow_bump) = utils::find_escrow_address(program_id, round.round_id);
            if *escrow_info.key != escrow_pubkey {
                msg!("Invalid escrow account address");
                return Err(ProgramError::InvalidArgument);
            }
            if escrow_info.owner == program_id {
                msg!("Escrow for round {} already exists", round.round_id);
                return Err(ProgramError::AccountAlreadyInitialized);
            }
            let round_id_bytes = round.round_id.to_le_bytes();
            utils::create_pda_account(
                operator_info,
                escrow_info,
                system_program_info,
                program_id,
                PrizeEscrow::LEN,
                &[ESCROW_SEED, &round_id_bytes, &[escrow_bump]],
            )?;
            PrizeEscrow::pack(escrow, &mut escrow_info.try_borrow_mut_data()?)?;
            utils::store_round(&next, round_info)?;
            vault::pay_out(round_info, escrow_info, escrow.amount)?;

            msg!(
                "Round {} prize of {} lamports escrowed for {}",
                escrow.round_id,
                escrow.amount,
                escrow.winner
            );
        } else {
            utils::store_round(&next, round_info)?;
        }

        msg!("Round {} opened", next.round_id);
        Ok(())
    }

    fn process_enter(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        utils::require_signer(player_info, "Player")?;
        let config = utils::load_config(program_id, config_info)?;
        let mut round = utils::load_round(program_id, round_info)?;

        round
            .enter(*player_info.key, amount, config.entry_fee)
            .map_err(reject)?;
        vault::deposit(player_info, round_info, system_program_info, amount)?;
        utils::store_round(&round, round_info)?;

        msg!(
            "{} entered round {} ({} players, pool {} lamports)",
            player_info.key,
            round.round_id,
            round.player_count(),
            round.prize_pool()
        );
        Ok(())
    }

    fn process_end_lottery(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let operator_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;

        utils::require_signer(operator_info, "Operator")?;
        let mut config = utils::load_config(program_id, config_info)?;
        let mut round = utils::load_round(program_id, round_info)?;

        let request = round
            .end_lottery(&mut config, operator_info.key)
            .map_err(reject)?;
        LotteryConfig::pack(config, &mut config_info.try_borrow_mut_data()?)?;
        utils::store_round(&round, round_info)?;

        msg!(
            "Round {} closed with {} players, awaiting request {}",
            round.round_id,
            round.player_count(),
            request.request_id
        );
        Ok(())
    }

    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: RequestId,
        random_words: &[u64],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;

        utils::require_signer(oracle_info, "Oracle")?;
        let config = utils::load_config(program_id, config_info)?;
        let mut round = utils::load_round(program_id, round_info)?;

        let winner = round
            .fulfill_random_words(&config, oracle_info.key, request_id, random_words)
            .map_err(reject)?;
        utils::store_round(&round, round_info)?;

        msg!(
            "Round {} settled by request {}. Winner: {}",
            round.round_id,
            request_id,
            winner
        );
        Ok(())
    }

    fn process_withdraw_prize(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let winner_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;

        utils::require_signer(winner_info, "Winner")?;
        let mut round = utils::load_round(program_id, round_info)?;

        // Bookkeeping is stored before any lamports move
        let prize = round.claim_prize(winner_info.key).map_err(reject)?;
        utils::store_round(&round, round_info)?;
        vault::pay_out(round_info, winner_info, prize)?;

        msg!(
            "Round {} prize of {} lamports paid to {}",
            round.round_id,
            prize,
            winner_info.key
        );
        Ok(())
    }

    fn process_withdraw_escrowed_prize(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        round_id: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let winner_info = next_account_info(account_info_iter)?;
        let escrow_info = next_account_info(account_info_iter)?;

        utils::require_signer(winner_info, "Winner")?;
        let mut escrow = utils::load_escrow(program_id, escrow_info, round_id)?;

        let prize = escrow.claim(winner_info.key).map_err(reject)?;
        PrizeEscrow::pack(escrow, &mut escrow_info.try_borrow_mut_data()?)?;
        vault::pay_out(escrow_info, winner_info, prize)?;

        msg!(
            "Escrowed round {} prize of {} lamports paid to {}",
            round_id,
            prize,
            winner_info.key
        );
        Ok(())
    }
}
