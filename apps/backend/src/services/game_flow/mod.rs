//! Game flow service: bridges the pure rules engine with the store and the
//! oracle.
//!
//! Every public operation takes the per-game lock, works on a loaded copy of
//! the state, and writes it back only if the whole operation succeeded. Oracle
//! calls are fanned out concurrently where independent, but their results are
//! applied to the state one at a time.

mod mutation;
mod npc_coordinator;
mod player_actions;
mod round_lifecycle;

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex as AsyncMutex;
use tracing::warn;

use crate::config::GameSettings;
use crate::domain::GameId;
use crate::oracle::{Oracle, OracleError};
use crate::services::game_store::GameStore;

pub use mutation::GameFlowMutationResult;

pub struct GameFlowService {
    store: Arc<dyn GameStore>,
    oracle: Arc<dyn Oracle>,
    settings: GameSettings,
    locks: DashMap<GameId, Arc<AsyncMutex<()>>>,
    /// Service-side randomness: vote tie-breaks and oracle fallbacks.
    rng: Mutex<StdRng>,
}

impl GameFlowService {
    pub fn new(store: Arc<dyn GameStore>, oracle: Arc<dyn Oracle>, settings: GameSettings) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            store,
            oracle,
            settings,
            locks: DashMap::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    // Never held across an await.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut self.rng.lock())
    }

    /// Run one oracle call under the configured timeout. `None` means the
    /// caller must use its fallback.
    async fn ask<T>(
        &self,
        call: &'static str,
        fut: impl Future<Output = Result<T, OracleError>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.settings.oracle_timeout, fut).await {
            Ok(Ok(reply)) => Some(reply),
            Ok(Err(err)) => {
                warn!(call, oracle = self.oracle.name(), error = %err, "oracle call failed, using fallback");
                None
            }
            Err(_) => {
                warn!(call, oracle = self.oracle.name(), "oracle call timed out, using fallback");
                None
            }
        }
    }
}
