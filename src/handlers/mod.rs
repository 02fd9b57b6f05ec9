// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth)
pub mod public;
pub mod protected;
