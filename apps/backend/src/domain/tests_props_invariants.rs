/// Property-based tests for whole-game invariants
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::cards_logic::get_valid_plays;
use crate::domain::relationships::{RelationshipLedger, ScoreLedger};
use crate::domain::rules::{DECK_SIZE, SCORE_RANGE, SENTIMENT_RANGE};
use crate::domain::state::{require_turn_pointer, PlayerId};
use crate::domain::turns::{apply_pass, apply_play};
use crate::domain::voting::finalize_vote;
use crate::domain::{new_game, test_prelude, GameSetup, GameState, Phase, SeatSpec};

const STEP_LIMIT: usize = 2_000;

fn setup(players: usize, seed: u64) -> GameSetup {
    GameSetup {
        seats: (0..players)
            .map(|i| SeatSpec {
                id: PlayerId(format!("p{i}")),
                name: format!("P{i}"),
                is_human: false,
                backstory: String::new(),
                relationships: Vec::new(),
            })
            .collect(),
        seed,
    }
}

// One random legal step: a vote-less day, or a play/pass at night.
fn step(state: &mut GameState, rng: &mut StdRng) {
    match state.phase {
        Phase::Discussion => {
            finalize_vote(state, rng).unwrap();
        }
        Phase::Play => {
            let who = state.current_turn.clone().expect("turn pointer at night");
            let hand = state.player(&who).unwrap().hand.clone();
            let plays = get_valid_plays(&hand, &state.table.cards, state.table.reversed);
            let pass = !state.table.cards.is_empty() && (plays.is_empty() || rng.random_bool(0.3));
            if pass {
                apply_pass(state, &who).unwrap();
            } else {
                let pick = &plays[rng.random_range(0..plays.len())];
                apply_play(state, &who, pick).unwrap();
            }
        }
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Cards are conserved, the turn pointer stays valid and winners never change.
    #[test]
    fn prop_random_games_keep_invariants(players in 3usize..=8, seed in any::<u64>()) {
        let mut state = new_game(&setup(players, seed)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut steps = 0;
        while !state.is_game_over() && steps < STEP_LIMIT {
            step(&mut state, &mut rng);
            steps += 1;
            prop_assert_eq!(state.card_total(), DECK_SIZE);
            prop_assert!(require_turn_pointer(&state).is_ok());
            for (_, _, v) in state.relationships.entries() {
                prop_assert!(SENTIMENT_RANGE.contains(&v));
            }
        }
        if state.is_game_over() {
            let winners = state.winner_ids.clone();
            prop_assert!(finalize_vote(&mut state, &mut rng).is_err());
            prop_assert_eq!(&state.winner_ids, &winners);
        }
    }

    /// Ledgers clamp no matter how hard they are pushed.
    #[test]
    fn prop_ledgers_stay_in_range(
        moves in prop::collection::vec((0usize..4, 0usize..4, -5i16..=5), 0..60),
    ) {
        let ids: Vec<PlayerId> = (0..4).map(|i| PlayerId(format!("p{i}"))).collect();
        let mut sentiment = RelationshipLedger::seed(&ids, Vec::<(&PlayerId, &PlayerId, &str)>::new());
        let mut trust = ScoreLedger::seed(&ids);
        for (a, b, delta) in moves {
            sentiment.adjust(&ids[a], &ids[b], delta as i8);
            trust.adjust(&ids[a], &ids[b], delta * 25);
        }
        for (_, _, v) in sentiment.entries() {
            prop_assert!(SENTIMENT_RANGE.contains(&v));
        }
        for (_, _, v) in trust.entries() {
            prop_assert!(SCORE_RANGE.contains(&v));
        }
    }
}
