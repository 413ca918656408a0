//! Oracle trait definition.

use async_trait::async_trait;
use thiserror::Error;

use super::payloads::{
    CheatProposal, CheatProposalRequest, DefenseReply, DefenseRequest, JudgeCheatRequest,
    PlayReply, PlayRequest, RawCheatVerdict, SpeechReply, SpeechRequest, VoteReply, VoteRequest,
    WarnReply, WarnRequest,
};

/// Failures of a remote decision call. Never fatal to a game: every call
/// site has a fallback.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle call timed out")]
    Timeout,
    #[error("oracle transport error: {0}")]
    Transport(String),
    #[error("oracle reply could not be used: {0}")]
    InvalidReply(String),
    #[error("oracle internal error: {0}")]
    Internal(String),
}

/// External decision maker for NPC seats and cheat adjudication.
///
/// Every reply is untrusted: callers pass it through [`super::validate`]
/// before it reaches the engine.
#[async_trait]
pub trait Oracle: Send + Sync {
    fn name(&self) -> &'static str;

    /// Adjudicate an attacker's method against a defense.
    async fn judge_cheat(&self, req: &JudgeCheatRequest) -> Result<RawCheatVerdict, OracleError>;

    /// Pick a play (by index into `valid_plays`) or pass.
    async fn decide_play(&self, req: &PlayRequest) -> Result<PlayReply, OracleError>;

    async fn decide_vote(&self, req: &VoteRequest) -> Result<VoteReply, OracleError>;

    /// One line of day discussion for an NPC.
    async fn generate_speech(&self, req: &SpeechRequest) -> Result<SpeechReply, OracleError>;

    /// Vague one-line hint shown to the human seat when targeted.
    async fn warn_target(&self, req: &WarnRequest) -> Result<WarnReply, OracleError>;

    /// Defense text on behalf of an NPC target.
    async fn propose_defense(&self, req: &DefenseRequest) -> Result<DefenseReply, OracleError>;

    /// Whether an eligible NPC cheats tonight, against whom and how.
    async fn propose_cheat(
        &self,
        req: &CheatProposalRequest,
    ) -> Result<CheatProposal, OracleError>;
}
