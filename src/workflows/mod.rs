pub mod roster;
pub mod transport;
