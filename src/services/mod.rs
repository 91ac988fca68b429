pub mod processing;
pub mod server;
pub mod settlement;

pub use processing::ProcessingService;
pub use server::ServerService;
pub use settlement::{MatchReport, SettlementOutcome, SettlementService};
