/// Operation handlers
///
/// Each handler implements one operation of the core and is invoked through
/// the matching `Core` method, which poisons the open atomic unit when the
/// handler fails. Every handler first checks that the presented lock is the
/// innermost open lock.
pub mod collect_fees;
pub mod fees;
pub mod initialize_pool;
pub mod payments;
pub mod saved_balances;
pub mod swap;
pub mod update_position;

pub use swap::SwapParams;
pub use update_position::UpdatePositionParams;
