//! Shared test helpers for the daifugo workspace.

pub mod logging;
