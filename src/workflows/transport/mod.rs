pub mod authorization;
pub mod handoff;
