use borsh::BorshSerialize;
use solana_program::{program_pack::Pack, pubkey::Pubkey};

use lottery::{
    error::{ErrorKind, LotteryError},
    state::{LotteryConfig, PrizeEscrow, Round, RoundStatus, ENTRY_FEE_LAMPORTS, MAX_PLAYERS},
};

struct Fixture {
    operator: Pubkey,
    oracle: Pubkey,
    config: LotteryConfig,
}

fn fixture() -> Fixture {
    let operator = Pubkey::new_unique();
    let oracle = Pubkey::new_unique();
    Fixture {
        operator,
        oracle,
        config: LotteryConfig::new(operator, oracle, 1234),
    }
}

fn open_round(f: &Fixture) -> Round {
    Round::closed(0).start_lottery(&f.config, &f.operator).unwrap()
}

// Open a round, enter the given players and close it
fn drawing_round(f: &mut Fixture, players: &[Pubkey]) -> (Round, u64) {
    let mut round = open_round(f);
    for player in players {
        round.enter(*player, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();
    }
    let request = round.end_lottery(&mut f.config, &f.operator).unwrap();
    (round, request.request_id)
}

#[test]
fn test_enter_registers_player_once() {
    let f = fixture();
    let mut round = open_round(&f);
    let p1 = Pubkey::new_unique();

    round.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();

    assert!(round.is_member(&p1));
    assert_eq!(round.players(), &[p1]);
    assert_eq!(round.prize_pool(), ENTRY_FEE_LAMPORTS);
}

#[test]
fn test_enter_keeps_entry_order() {
    let f = fixture();
    let mut round = open_round(&f);
    let players: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();

    for player in &players {
        round.enter(*player, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();
    }

    assert_eq!(round.players(), players.as_slice());
    assert_eq!(round.prize_pool(), 5 * ENTRY_FEE_LAMPORTS);
}

#[test]
fn test_enter_rejects_incorrect_fee_without_side_effects() {
    let f = fixture();
    let mut round = open_round(&f);
    let p1 = Pubkey::new_unique();
    let before = round.clone();

    for paid in [0, ENTRY_FEE_LAMPORTS - 1, 2 * ENTRY_FEE_LAMPORTS] {
        let err = round.enter(p1, paid, f.config.entry_fee).unwrap_err();
        assert_eq!(err, LotteryError::IncorrectFee);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert_eq!(round, before);
    assert!(!round.is_member(&p1));
}

#[test]
fn test_enter_twice_fails_and_keeps_first_entry() {
    let f = fixture();
    let mut round = open_round(&f);
    let p1 = Pubkey::new_unique();

    round.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();
    let err = round.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap_err();

    assert_eq!(err, LotteryError::AlreadyEntered);
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(round.players(), &[p1]);
    assert_eq!(round.prize_pool(), ENTRY_FEE_LAMPORTS);
}

#[test]
fn test_enter_requires_open_round() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();

    let mut closed = Round::closed(0);
    let err = closed.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap_err();
    assert_eq!(err, LotteryError::RoundClosed);
    assert_eq!(err.kind(), ErrorKind::State);

    let (mut drawing, _) = drawing_round(&mut f, &[Pubkey::new_unique()]);
    assert_eq!(
        drawing.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee),
        Err(LotteryError::RoundClosed)
    );
    assert!(!drawing.is_member(&p1));
}

#[test]
fn test_enter_rejects_full_round() {
    let f = fixture();
    let mut round = open_round(&f);
    for _ in 0..MAX_PLAYERS {
        round
            .enter(Pubkey::new_unique(), ENTRY_FEE_LAMPORTS, f.config.entry_fee)
            .unwrap();
    }

    let err = round
        .enter(Pubkey::new_unique(), ENTRY_FEE_LAMPORTS, f.config.entry_fee)
        .unwrap_err();
    assert_eq!(err, LotteryError::RoundFull);
    assert_eq!(round.player_count(), MAX_PLAYERS);
}

#[test]
fn test_start_lottery_opens_fresh_round() {
    let f = fixture();
    let round = open_round(&f);

    assert!(round.lottery_open());
    assert_eq!(round.round_id, 1);
    assert!(round.players().is_empty());
    assert_eq!(round.winner(), None);
    assert_eq!(round.prize_pool(), 0);
}

#[test]
fn test_only_operator_controls_lifecycle() {
    let mut f = fixture();
    let stranger = Pubkey::new_unique();

    let closed = Round::closed(0);
    let err = closed.start_lottery(&f.config, &stranger).unwrap_err();
    assert_eq!(err, LotteryError::NotOperator);
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let mut round = open_round(&f);
    round
        .enter(Pubkey::new_unique(), ENTRY_FEE_LAMPORTS, f.config.entry_fee)
        .unwrap();
    let before = round.clone();
    let config_before = f.config;

    assert_eq!(
        round.end_lottery(&mut f.config, &stranger),
        Err(LotteryError::NotOperator)
    );
    // The oracle is not the operator either
    let oracle = f.oracle;
    assert_eq!(
        round.end_lottery(&mut f.config, &oracle),
        Err(LotteryError::NotOperator)
    );
    assert_eq!(round, before);
    assert_eq!(f.config, config_before);
}

#[test]
fn test_end_lottery_requests_randomness() {
    let mut f = fixture();
    let (round, request_id) = drawing_round(&mut f, &[Pubkey::new_unique()]);

    assert_eq!(round.status, RoundStatus::Drawing);
    assert!(!round.lottery_open());
    assert_eq!(round.pending_request(), Some(request_id));
    assert_eq!(request_id, 1);
    assert_eq!(f.config.next_request_id, 2);
}

#[test]
fn test_end_lottery_rejects_empty_round() {
    let mut f = fixture();
    let mut round = open_round(&f);

    let err = round.end_lottery(&mut f.config, &f.operator).unwrap_err();

    assert_eq!(err, LotteryError::NoPlayers);
    assert_eq!(err.kind(), ErrorKind::State);
    assert!(round.lottery_open());
    assert_eq!(round.pending_request(), None);
    assert_eq!(f.config.next_request_id, 1);
}

#[test]
fn test_end_lottery_rejects_second_close() {
    let mut f = fixture();
    let (mut round, request_id) = drawing_round(&mut f, &[Pubkey::new_unique()]);

    let operator = f.operator;
    assert_eq!(
        round.end_lottery(&mut f.config, &operator),
        Err(LotteryError::RequestPending)
    );
    assert_eq!(round.pending_request(), Some(request_id));

    let mut closed = Round::closed(0);
    assert_eq!(
        closed.end_lottery(&mut f.config, &operator),
        Err(LotteryError::RoundNotOpen)
    );
}

#[test]
fn test_winner_is_word_mod_player_count() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let p2 = Pubkey::new_unique();
    let (mut round, request_id) = drawing_round(&mut f, &[p1, p2]);

    let winner = round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[123])
        .unwrap();

    assert_eq!(winner, p2);
    assert_eq!(round.winner(), Some(p2));
    assert_eq!(round.status, RoundStatus::Settled);
    assert_eq!(round.pending_request(), None);
}

#[test]
fn test_winner_selection_is_reproducible() {
    let players: Vec<Pubkey> = (0..7).map(|_| Pubkey::new_unique()).collect();

    for word in [0u64, 1, 6, 7, 123, u64::MAX] {
        let mut f = fixture();
        let (mut first, first_id) = drawing_round(&mut f, &players);
        let mut second = first.clone();

        let a = first
            .fulfill_random_words(&f.config, &f.oracle, first_id, &[word, 99])
            .unwrap();
        let b = second
            .fulfill_random_words(&f.config, &f.oracle, first_id, &[word])
            .unwrap();

        assert_eq!(a, players[(word % 7) as usize]);
        assert_eq!(a, b);
    }
}

#[test]
fn test_fulfill_rejects_non_oracle() {
    let mut f = fixture();
    let (mut round, request_id) = drawing_round(&mut f, &[Pubkey::new_unique()]);
    let before = round.clone();

    let err = round
        .fulfill_random_words(&f.config, &f.operator, request_id, &[5])
        .unwrap_err();

    assert_eq!(err, LotteryError::NotOracle);
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(round, before);
}

#[test]
fn test_fulfill_rejects_unknown_request_and_empty_words() {
    let mut f = fixture();
    let (mut round, request_id) = drawing_round(&mut f, &[Pubkey::new_unique()]);
    let before = round.clone();

    let err = round
        .fulfill_random_words(&f.config, &f.oracle, request_id + 1, &[5])
        .unwrap_err();
    assert_eq!(err, LotteryError::UnknownRequest);
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(
        round.fulfill_random_words(&f.config, &f.oracle, request_id, &[]),
        Err(LotteryError::MissingRandomWords)
    );
    assert_eq!(round, before);
}

#[test]
fn test_fulfill_accepted_only_once() {
    let mut f = fixture();
    let (mut round, request_id) =
        drawing_round(&mut f, &[Pubkey::new_unique(), Pubkey::new_unique()]);

    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[0])
        .unwrap();
    let settled = round.clone();

    assert_eq!(
        round.fulfill_random_words(&f.config, &f.oracle, request_id, &[1]),
        Err(LotteryError::NotDrawing)
    );
    assert_eq!(round, settled);
}

#[test]
fn test_stale_request_from_previous_round_is_rejected() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let (mut round, old_id) = drawing_round(&mut f, &[p1]);
    round.fulfill_random_words(&f.config, &f.oracle, old_id, &[0]).unwrap();
    round.claim_prize(&p1).unwrap();

    let mut next = round.start_lottery(&f.config, &f.operator).unwrap();
    next.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();
    let request = next.end_lottery(&mut f.config, &f.operator).unwrap();

    assert_ne!(request.request_id, old_id);
    assert_eq!(
        next.fulfill_random_words(&f.config, &f.oracle, old_id, &[0]),
        Err(LotteryError::UnknownRequest)
    );
}

#[test]
fn test_withdraw_pays_once() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let p2 = Pubkey::new_unique();
    let (mut round, request_id) = drawing_round(&mut f, &[p1, p2]);
    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[123])
        .unwrap();

    let prize = round.claim_prize(&p2).unwrap();
    assert_eq!(prize, 2 * ENTRY_FEE_LAMPORTS);
    assert_eq!(round.prize_pool(), 0);
    assert!(round.prize_paid());

    let err = round.claim_prize(&p2).unwrap_err();
    assert_eq!(err, LotteryError::AlreadyWithdrawn);
    assert_eq!(err.kind(), ErrorKind::Settlement);
}

#[test]
fn test_withdraw_rejects_loser_and_unsettled_round() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let p2 = Pubkey::new_unique();
    let (mut round, request_id) = drawing_round(&mut f, &[p1, p2]);

    let err = round.claim_prize(&p1).unwrap_err();
    assert_eq!(err, LotteryError::NotSettled);
    assert_eq!(err.kind(), ErrorKind::State);

    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[123])
        .unwrap();
    let err = round.claim_prize(&p1).unwrap_err();
    assert_eq!(err, LotteryError::NotWinner);
    assert_eq!(err.kind(), ErrorKind::Settlement);
    assert_eq!(round.prize_pool(), 2 * ENTRY_FEE_LAMPORTS);
}

#[test]
fn test_start_lottery_rejected_while_round_live() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();

    let open = open_round(&f);
    assert_eq!(
        open.start_lottery(&f.config, &f.operator),
        Err(LotteryError::RoundInProgress)
    );

    let (round, _) = drawing_round(&mut f, &[p1]);
    assert_eq!(
        round.start_lottery(&f.config, &f.operator),
        Err(LotteryError::RoundInProgress)
    );
}

#[test]
fn test_unwithdrawn_prize_does_not_block_next_round() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let p2 = Pubkey::new_unique();
    let (mut round, request_id) = drawing_round(&mut f, &[p1, p2]);
    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[123])
        .unwrap();

    let escrow = round.unclaimed_prize().unwrap();
    assert_eq!(escrow.round_id, round.round_id);
    assert_eq!(escrow.winner, p2);
    assert_eq!(escrow.amount, 2 * ENTRY_FEE_LAMPORTS);
    assert!(!escrow.claimed);

    let next = round.start_lottery(&f.config, &f.operator).unwrap();
    assert_eq!(next.round_id, round.round_id + 1);
    assert!(next.lottery_open());
    assert_eq!(next.prize_pool(), 0);
}

#[test]
fn test_nothing_to_escrow_unless_settled_and_unpaid() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();

    assert_eq!(Round::closed(0).unclaimed_prize(), None);
    assert_eq!(open_round(&f).unclaimed_prize(), None);

    let (mut round, request_id) = drawing_round(&mut f, &[p1]);
    assert_eq!(round.unclaimed_prize(), None);

    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[0])
        .unwrap();
    round.claim_prize(&p1).unwrap();
    assert_eq!(round.unclaimed_prize(), None);
}

#[test]
fn test_escrowed_prize_claimable_by_winner_only() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let p2 = Pubkey::new_unique();
    let (mut round, request_id) = drawing_round(&mut f, &[p1, p2]);
    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[1])
        .unwrap();
    let mut escrow = round.unclaimed_prize().unwrap();

    let err = escrow.claim(&p1).unwrap_err();
    assert_eq!(err, LotteryError::NotWinner);
    assert_eq!(err.kind(), ErrorKind::Settlement);
    assert_eq!(escrow.amount, 2 * ENTRY_FEE_LAMPORTS);

    assert_eq!(escrow.claim(&p2), Ok(2 * ENTRY_FEE_LAMPORTS));
    assert_eq!(escrow.amount, 0);
    assert!(escrow.claimed);

    assert_eq!(escrow.claim(&p2), Err(LotteryError::AlreadyWithdrawn));
}

#[test]
fn test_escrow_layout() {
    let escrow = PrizeEscrow {
        is_initialized: true,
        round_id: 7,
        winner: Pubkey::new_unique(),
        amount: 3 * ENTRY_FEE_LAMPORTS,
        claimed: false,
    };
    let mut data = vec![0u8; PrizeEscrow::LEN];
    PrizeEscrow::pack(escrow, &mut data).unwrap();

    assert_eq!(PrizeEscrow::unpack(&data).unwrap(), escrow);
    assert!(PrizeEscrow::unpack(&vec![0u8; PrizeEscrow::LEN]).is_err());
}

#[test]
fn test_new_round_forgets_previous_members() {
    let mut f = fixture();
    let p1 = Pubkey::new_unique();
    let p2 = Pubkey::new_unique();
    let (mut round, request_id) = drawing_round(&mut f, &[p1, p2]);
    round
        .fulfill_random_words(&f.config, &f.oracle, request_id, &[123])
        .unwrap();
    round.claim_prize(&p2).unwrap();

    let mut next = round.start_lottery(&f.config, &f.operator).unwrap();

    assert_eq!(next.round_id, round.round_id + 1);
    assert!(next.players().is_empty());
    assert!(!next.is_member(&p1));
    assert!(!next.is_member(&p2));
    assert_eq!(next.winner(), None);
    assert_eq!(next.prize_pool(), 0);
    next.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();
    assert!(next.is_member(&p1));
}

#[test]
fn test_round_account_data_restores_membership() {
    let f = fixture();
    let mut round = open_round(&f);
    let p1 = Pubkey::new_unique();
    round.enter(p1, ENTRY_FEE_LAMPORTS, f.config.entry_fee).unwrap();

    let mut data = vec![0u8; Round::LEN];
    round.pack_into(&mut data).unwrap();
    let decoded = Round::unpack(&data).unwrap();

    assert_eq!(decoded, round);
    assert!(decoded.is_member(&p1));
}

#[test]
fn test_round_account_data_rejects_duplicate_players() {
    let p1 = Pubkey::new_unique();
    let mut data = Vec::new();
    1u64.serialize(&mut data).unwrap();
    RoundStatus::Open.serialize(&mut data).unwrap();
    vec![p1, p1].serialize(&mut data).unwrap();
    Option::<Pubkey>::None.serialize(&mut data).unwrap();
    Option::<u64>::None.serialize(&mut data).unwrap();
    (2 * ENTRY_FEE_LAMPORTS).serialize(&mut data).unwrap();
    false.serialize(&mut data).unwrap();

    assert!(Round::unpack(&data).is_err());
}

#[test]
fn test_config_layout() {
    let f = fixture();
    let mut data = vec![0u8; LotteryConfig::LEN];
    LotteryConfig::pack(f.config, &mut data).unwrap();

    let decoded = LotteryConfig::unpack(&data).unwrap();
    assert_eq!(decoded, f.config);
    assert_eq!(decoded.entry_fee, ENTRY_FEE_LAMPORTS);
    assert_eq!(decoded.subscription_id, 1234);
    assert!(LotteryConfig::unpack(&vec![0u8; LotteryConfig::LEN]).is_err());
}
