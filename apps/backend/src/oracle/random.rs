//! Random oracle: uniformly random legal decisions and canned text.
//!
//! Always available, so it doubles as the fallback when a remote oracle is
//! unreachable and as the driver for simulations and tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::*;

use super::config::OracleConfig;
use super::payloads::{
    CheatProposal, CheatProposalRequest, DefenseReply, DefenseRequest, JudgeCheatRequest,
    PlayReply, PlayRequest, RawCheatVerdict, SpeechReply, SpeechRequest, VoteReply, VoteRequest,
    WarnReply, WarnRequest,
};
use super::trait_def::{Oracle, OracleError};

const DEFAULT_CHEAT_RATE: u64 = 40;

const LINES: &[&str] = &[
    "I have nothing to hide. Look elsewhere.",
    "Someone played far too confidently last night.",
    "Let's not rush this vote.",
    "I'm watching the quiet ones.",
    "Whoever holds the jokers is the real threat.",
];

const WARNINGS: &[&str] = &[
    "A draft stirs the candles near your seat.",
    "You catch someone glancing at your cards.",
    "A chair creaks behind you.",
];

const DEFENSES: &[&str] = &[
    "I hold my cards low and keep my eyes on the dealer.",
    "I count my hand after every trick.",
    "I sit with my back to the wall.",
];

const METHODS: &[&str] = &[
    "swaps a card under the table while refilling the wine",
    "reads a reflection in the polished teapot",
    "bumps the table to scatter the discard pile",
];

const EFFECTS: &[&str] = &["reveal_hand", "peek_hand", "steal_card", "swap_card", "skip_turn"];

const NARRATIVES: &[(&str, &str)] = &[
    ("big_success", "The trick goes unnoticed."),
    ("draw", "The attempt is foiled, and nobody sees who tried."),
    ("big_fail", "The cheat is caught red-handed in front of everyone."),
];

pub struct RandomOracle {
    rng: Mutex<StdRng>,
    /// Percentage chance an eligible attacker cheats.
    cheat_rate: u64,
}

impl RandomOracle {
    pub const NAME: &'static str = "random";
    pub const VERSION: &'static str = "1.0.0";

    /// `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
            cheat_rate: DEFAULT_CHEAT_RATE,
        }
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        let mut oracle = Self::new(config.seed());
        if let Some(rate) = config.custom_u64("cheat_rate") {
            oracle.cheat_rate = rate.min(100);
        }
        oracle
    }

    fn pick(&self, items: &[&str]) -> String {
        let mut rng = self.rng.lock();
        items
            .choose(&mut *rng)
            .map(|s| (*s).to_owned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Oracle for RandomOracle {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn judge_cheat(&self, _req: &JudgeCheatRequest) -> Result<RawCheatVerdict, OracleError> {
        let mut rng = self.rng.lock();
        let roll = rng.random_range(0..100);
        let (judgment, narrative) = match roll {
            0..=39 => NARRATIVES[0],
            40..=79 => NARRATIVES[1],
            _ => NARRATIVES[2],
        };
        let effect = EFFECTS.choose(&mut *rng).copied().unwrap_or("no_effect");
        Ok(RawCheatVerdict {
            judgment: judgment.to_owned(),
            effect_type: effect.to_owned(),
            target_card_index: Some(rng.random_range(0..14)),
            defender_penalty: None,
            narrative: Some(narrative.to_owned()),
        })
    }

    async fn decide_play(&self, req: &PlayRequest) -> Result<PlayReply, OracleError> {
        if req.valid_plays.is_empty() {
            return Ok(PlayReply {
                action: "pass".into(),
                ..Default::default()
            });
        }
        let mut rng = self.rng.lock();
        // Pass now and then when there is something to pass on.
        if !req.table.is_empty() && rng.random_bool(0.2) {
            return Ok(PlayReply {
                action: "pass".into(),
                ..Default::default()
            });
        }
        let index = rng.random_range(0..req.valid_plays.len());
        Ok(PlayReply {
            action: "play".into(),
            chosen_combination_index: i64::try_from(index).ok(),
            flavor_line: None,
        })
    }

    async fn decide_vote(&self, req: &VoteRequest) -> Result<VoteReply, OracleError> {
        let mut rng = self.rng.lock();
        let target = req
            .candidates
            .choose(&mut *rng)
            .ok_or_else(|| OracleError::InvalidReply("no vote candidates".into()))?;
        Ok(VoteReply {
            target_id: target.0.clone(),
            reasoning: Some("A hunch.".into()),
        })
    }

    async fn generate_speech(&self, req: &SpeechRequest) -> Result<SpeechReply, OracleError> {
        let use_logic = !req.logic_templates.is_empty() && self.rng.lock().random_bool(0.5);
        let text = if use_logic {
            let refs: Vec<&str> = req.logic_templates.iter().map(String::as_str).collect();
            self.pick(&refs)
        } else {
            self.pick(LINES)
        };
        Ok(SpeechReply {
            text,
            next_speaker_hint: None,
        })
    }

    async fn warn_target(&self, _req: &WarnRequest) -> Result<WarnReply, OracleError> {
        Ok(WarnReply {
            warning: self.pick(WARNINGS),
        })
    }

    async fn propose_defense(&self, _req: &DefenseRequest) -> Result<DefenseReply, OracleError> {
        Ok(DefenseReply {
            defense: self.pick(DEFENSES),
            category: None,
        })
    }

    async fn propose_cheat(
        &self,
        req: &CheatProposalRequest,
    ) -> Result<CheatProposal, OracleError> {
        let method = self.pick(METHODS);
        let mut rng = self.rng.lock();
        if req.candidates.is_empty() || rng.random_range(0..100) >= self.cheat_rate {
            return Ok(CheatProposal::default());
        }
        let target = req.candidates.choose(&mut *rng).map(|t| t.0.clone());
        Ok(CheatProposal {
            cheat: true,
            target_id: target,
            method: Some(method),
        })
    }
}
