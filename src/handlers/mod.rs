// handlers/mod.rs - two handler tiers
//
// Public (no auth) → Protected (bearer token with a permission claim)
pub mod public;
pub mod protected;
