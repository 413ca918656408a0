//! Per-purpose seeds derived from one game seed, so dealing and role
//! assignment never share a stream.

pub fn derive_dealing_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_mul(0x2545F4914F6CDD1D).wrapping_add(1)
}

pub fn derive_role_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_mul(0x2545F4914F6CDD1D).wrapping_add(2)
}
