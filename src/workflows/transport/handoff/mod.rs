//! Peer-to-peer ride handoff: a driver offers a ride to a colleague, who
//! accepts or refuses it.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{DriverId, HandoffId, HandoffStatus, RideHandoff};
pub use repository::{HandoffRepository, InMemoryHandoffRepository};
pub use router::handoff_router;
pub use service::{HandoffError, HandoffOffer, HandoffService};
