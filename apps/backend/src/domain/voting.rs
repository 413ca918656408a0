//! Daytime votes and elimination.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::phases::transition_to_play;
use super::state::{require_alive, require_not_over, require_phase, GameState, Phase, PlayerId};
use super::victory::check_instant_victories;
use crate::errors::domain::{DomainError, ValidationKind};

/// Affinity the target loses toward whoever voted against them.
const VOTE_AFFINITY_PENALTY: i16 = -10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub tally: BTreeMap<PlayerId, usize>,
    pub eliminated: Option<PlayerId>,
    /// Winners declared by the elimination, if any.
    pub winners: Vec<PlayerId>,
}

pub fn cast_vote(state: &mut GameState, voter: &PlayerId, target: &PlayerId) -> Result<(), DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Discussion)?;
    require_alive(state, voter)?;
    if voter == target {
        return Err(DomainError::validation(
            ValidationKind::InvalidVote,
            "Cannot vote for yourself",
        ));
    }
    require_alive(state, target).map_err(|e| match e {
        DomainError::Validation(..) => DomainError::validation(
            ValidationKind::InvalidVote,
            format!("{target} is not a live player"),
        ),
        other => other,
    })?;

    state.votes.insert(voter.clone(), target.clone());
    state.relationships.adjust(target, voter, -1);
    state.affinity.adjust(target, voter, VOTE_AFFINITY_PENALTY);
    Ok(())
}

pub fn tally_votes(votes: &BTreeMap<PlayerId, PlayerId>) -> BTreeMap<PlayerId, usize> {
    let mut counts = BTreeMap::new();
    for target in votes.values() {
        *counts.entry(target.clone()).or_insert(0) += 1;
    }
    counts
}

/// Everyone tied on the highest count.
pub fn vote_leaders(tally: &BTreeMap<PlayerId, usize>) -> Vec<PlayerId> {
    let Some(top) = tally.values().copied().max() else {
        return Vec::new();
    };
    tally
        .iter()
        .filter(|(_, n)| **n == top)
        .map(|(id, _)| id.clone())
        .collect()
}

/// Hang `target`: their hand and class become public and instant victories are checked.
pub fn eliminate(state: &mut GameState, target: &PlayerId) -> Result<Vec<PlayerId>, DomainError> {
    require_not_over(state)?;
    let player = state.player_mut(target)?;
    player.eliminated = true;
    let name = player.name.clone();
    state.eliminated_today = Some(target.clone());
    state.announce(format!("{name} was voted out. Their hand is now public."));
    Ok(check_instant_victories(state))
}

/// Close the vote: plurality with a random tiebreak, then nightfall unless someone won.
pub fn finalize_vote<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
) -> Result<VoteOutcome, DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Discussion)?;
    let tally = tally_votes(&state.votes);
    let leaders = vote_leaders(&tally);

    let (eliminated, winners) = if leaders.is_empty() {
        state.announce("No votes were cast; nobody is eliminated.");
        (None, Vec::new())
    } else {
        let chosen = leaders[rng.random_range(0..leaders.len())].clone();
        let winners = eliminate(state, &chosen)?;
        (Some(chosen), winners)
    };

    if !state.is_game_over() {
        transition_to_play(state);
    }
    Ok(VoteOutcome {
        tally,
        eliminated,
        winners,
    })
}
