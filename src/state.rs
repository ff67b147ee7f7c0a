use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};
use std::collections::BTreeSet;
use std::io;

use crate::vrf::RequestId;

/// Entry fee in lamports (0.01 SOL)
pub const ENTRY_FEE_LAMPORTS: u64 = 10_000_000;

/// Maximum number of entrants a single round can hold
pub const MAX_PLAYERS: usize = 100;

/// Program configuration, written once by `Initialize`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotteryConfig {
    /// Is the account initialized
    pub is_initialized: bool,
    /// The only identity allowed to start and end rounds
    pub operator: Pubkey,
    /// The only identity allowed to fulfill randomness requests
    pub oracle: Pubkey,
    /// External randomness subscription this lottery bills against
    pub subscription_id: u64,
    /// Exact amount a player pays to enter, in lamports
    pub entry_fee: u64,
    /// Next request id the randomness gateway will issue
    pub next_request_id: RequestId,
}

impl LotteryConfig {
    pub fn new(operator: Pubkey, oracle: Pubkey, subscription_id: u64) -> Self {
        Self {
            is_initialized: true,
            operator,
            oracle,
            subscription_id,
            entry_fee: ENTRY_FEE_LAMPORTS,
            next_request_id: 1,
        }
    }
}

impl Sealed for LotteryConfig {}

impl IsInitialized for LotteryConfig {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for LotteryConfig {
    const LEN: usize = 1 + 32 + 32 + 8 + 8 + 8;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, LotteryConfig::LEN];
        let (is_initialized, operator, oracle, subscription_id, entry_fee, next_request_id) =
            array_refs![src, 1, 32, 32, 8, 8, 8];

        let is_initialized = match is_initialized {
            [0] => false,
            [1] => true,
            _ => return Err(ProgramError::InvalidAccountData),
        };

        Ok(LotteryConfig {
            is_initialized,
            operator: Pubkey::new_from_array(*operator),
            oracle: Pubkey::new_from_array(*oracle),
            subscription_id: u64::from_le_bytes(*subscription_id),
            entry_fee: u64::from_le_bytes(*entry_fee),
            next_request_id: u64::from_le_bytes(*next_request_id),
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, LotteryConfig::LEN];
        let (
            is_initialized_dst,
            operator_dst,
            oracle_dst,
            subscription_id_dst,
            entry_fee_dst,
            next_request_id_dst,
        ) = mut_array_refs![dst, 1, 32, 32, 8, 8, 8];

        is_initialized_dst[0] = self.is_initialized as u8;
        operator_dst.copy_from_slice(self.operator.as_ref());
        oracle_dst.copy_from_slice(self.oracle.as_ref());
        *subscription_id_dst = self.subscription_id.to_le_bytes();
        *entry_fee_dst = self.entry_fee.to_le_bytes();
        *next_request_id_dst = self.next_request_id.to_le_bytes();
    }
}

/// A settled round's prize, set aside when the next round starts before the
/// winner withdrew. Only that winner can drain it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrizeEscrow {
    pub is_initialized: bool,
    /// Round that produced the prize
    pub round_id: u64,
    pub winner: Pubkey,
    /// Lamports still owed to the winner
    pub amount: u64,
    pub claimed: bool,
}

impl Sealed for PrizeEscrow {}

impl IsInitialized for PrizeEscrow {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for PrizeEscrow {
    const LEN: usize = 1 + 8 + 32 + 8 + 1;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, PrizeEscrow::LEN];
        let (is_initialized, round_id, winner, amount, claimed) =
            array_refs![src, 1, 8, 32, 8, 1];

        Ok(PrizeEscrow {
            is_initialized: is_initialized[0] != 0,
            round_id: u64::from_le_bytes(*round_id),
            winner: Pubkey::new_from_array(*winner),
            amount: u64::from_le_bytes(*amount),
            claimed: claimed[0] != 0,
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, PrizeEscrow::LEN];
        let (is_initialized_dst, round_id_dst, winner_dst, amount_dst, claimed_dst) =
            mut_array_refs![dst, 1, 8, 32, 8, 1];

        is_initialized_dst[0] = self.is_initialized as u8;
        *round_id_dst = self.round_id.to_le_bytes();
        winner_dst.copy_from_slice(self.winner.as_ref());
        *amount_dst = self.amount.to_le_bytes();
        claimed_dst[0] = self.claimed as u8;
    }
}

/// Phase of the live round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    /// No round has been started, or nothing is accepting entries
    Closed,
    /// Accepting entries
    Open,
    /// Entries closed, waiting for the oracle
    Drawing,
    /// Winner drawn
    Settled,
}

/// The live round.
///
/// `players` keeps entry order and `membership` mirrors it for lookups. Both
/// are only touched through the entry registry so they never drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    /// Increments every time the operator starts a new round
    pub round_id: u64,
    pub status: RoundStatus,
    pub(crate) players: Vec<Pubkey>,
    pub(crate) membership: BTreeSet<Pubkey>,
    pub(crate) winner: Option<Pubkey>,
    pub(crate) pending_request: Option<RequestId>,
    /// Lamports collected from this round's entries and not yet paid out
    pub(crate) pool: u64,
    pub(crate) prize_paid: bool,
}

impl Round {
    /// Space reserved for the round account
    pub const LEN: usize = 8 + 1 + (4 + 32 * MAX_PLAYERS) + (1 + 32) + (1 + 8) + 8 + 1;

    /// Decode a round from account data, ignoring unused trailing space
    pub fn unpack(src: &[u8]) -> Result<Self, ProgramError> {
        let mut buf = src;
        Self::deserialize(&mut buf).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Encode the round into account data
    pub fn pack_into(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        if dst.len() < Self::LEN {
            return Err(ProgramError::AccountDataTooSmall);
        }
        let mut writer = dst;
        self.serialize(&mut writer)
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }
}

impl BorshSerialize for Round {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.round_id.serialize(writer)?;
        self.status.serialize(writer)?;
        self.players.serialize(writer)?;
        self.winner.serialize(writer)?;
        self.pending_request.serialize(writer)?;
        self.pool.serialize(writer)?;
        self.prize_paid.serialize(writer)
    }
}

impl BorshDeserialize for Round {
    fn deserialize(buf: &mut &[u8]) -> io::Result<Self> {
        let round_id = u64::deserialize(buf)?;
        let status = RoundStatus::deserialize(buf)?;
        let players = Vec::<Pubkey>::deserialize(buf)?;
        let winner = Option::<Pubkey>::deserialize(buf)?;
        let pending_request = Option::<RequestId>::deserialize(buf)?;
        let pool = u64::deserialize(buf)?;
        let prize_paid = bool::deserialize(buf)?;

        let membership: BTreeSet<Pubkey> = players.iter().copied().collect();
        if membership.len() != players.len() || players.len() > MAX_PLAYERS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "corrupt player list",
            ));
        }

        Ok(Round {
            round_id,
            status,
            players,
            membership,
            winner,
            pending_request,
            pool,
            prize_paid,
        })
    }
}
