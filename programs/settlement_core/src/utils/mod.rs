/// Utility modules for the settlement core
///
/// Helpers that extensions build on but the core itself never calls.
pub mod time_gate;

pub use time_gate::TimeGate;
