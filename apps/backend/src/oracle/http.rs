//! Oracle backed by a remote JSON service.
//!
//! Each operation is a `POST {base_url}/{operation}` with the request payload
//! as the JSON body and the reply payload as the JSON response.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::config::OracleConfig;
use super::payloads::{
    CheatProposal, CheatProposalRequest, DefenseReply, DefenseRequest, JudgeCheatRequest,
    PlayReply, PlayRequest, RawCheatVerdict, SpeechReply, SpeechRequest, VoteReply, VoteRequest,
    WarnReply, WarnRequest,
};
use super::trait_def::{Oracle, OracleError};

pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOracle {
    pub const NAME: &'static str = "http";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Reads `url` (required) and `timeout_ms` from the custom fields.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        let url = config
            .custom_str("url")
            .ok_or_else(|| OracleError::Internal("http oracle needs a url".into()))?;
        let timeout = config.custom_u64("timeout_ms").unwrap_or(DEFAULT_TIMEOUT_MS);
        Self::new(url, Duration::from_millis(timeout))
    }

    async fn call<Req, Rep>(&self, operation: &str, req: &Req) -> Result<Rep, OracleError>
    where
        Req: Serialize + Sync,
        Rep: DeserializeOwned,
    {
        let url = format!("{}/{operation}", self.base_url);
        debug!(%url, "oracle request");
        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport_error)?;
        response
            .json::<Rep>()
            .await
            .map_err(|e| OracleError::InvalidReply(format!("{operation}: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else {
        OracleError::Transport(err.to_string())
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn judge_cheat(&self, req: &JudgeCheatRequest) -> Result<RawCheatVerdict, OracleError> {
        self.call("judge_cheat", req).await
    }

    async fn decide_play(&self, req: &PlayRequest) -> Result<PlayReply, OracleError> {
        self.call("decide_play", req).await
    }

    async fn decide_vote(&self, req: &VoteRequest) -> Result<VoteReply, OracleError> {
        self.call("decide_vote", req).await
    }

    async fn generate_speech(&self, req: &SpeechRequest) -> Result<SpeechReply, OracleError> {
        self.call("generate_speech", req).await
    }

    async fn warn_target(&self, req: &WarnRequest) -> Result<WarnReply, OracleError> {
        self.call("warn_target", req).await
    }

    async fn propose_defense(&self, req: &DefenseRequest) -> Result<DefenseReply, OracleError> {
        self.call("propose_defense", req).await
    }

    async fn propose_cheat(
        &self,
        req: &CheatProposalRequest,
    ) -> Result<CheatProposal, OracleError> {
        self.call("propose_cheat", req).await
    }
}
