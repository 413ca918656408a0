use super::facts::FactPayload;
use super::state::{
    require_alive, require_not_over, require_phase, GameRole, GameState, Investigation, Phase,
    PlayerId,
};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// The detective learns one live player's class, once per game, at night.
pub fn investigate(
    state: &mut GameState,
    investigator: &PlayerId,
    subject: &PlayerId,
) -> Result<Investigation, DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Play)?;
    require_alive(state, investigator)?;
    if state.player(investigator)?.role != GameRole::Detective {
        return Err(DomainError::validation(
            ValidationKind::InvestigationNotAllowed,
            "Only the detective can investigate",
        ));
    }
    if state.investigation.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyUsed,
            "The investigation has already been used",
        ));
    }
    if investigator == subject {
        return Err(DomainError::validation(
            ValidationKind::InvalidTarget,
            "Cannot investigate yourself",
        ));
    }
    require_alive(state, subject).map_err(|_| {
        DomainError::validation(ValidationKind::InvalidTarget, format!("{subject} is not in play"))
    })?;

    let result = Investigation {
        investigator: investigator.clone(),
        subject: subject.clone(),
        finding: state.player(subject)?.class,
        day: state.day,
    };
    let round = state.day;
    state.facts.record(
        investigator.clone(),
        round,
        FactPayload::Investigation {
            subject: subject.clone(),
            finding: result.finding,
        },
    );
    state.investigation = Some(result.clone());
    Ok(result)
}
