/// Settlement Core Error Definitions
///
/// Errors fall into two enums. `ErrorCode` covers validation, invariant and
/// authorization failures raised by the core's operations. `MathError` covers
/// arithmetic failures raised by the fixed-point library and the fee
/// accounting; these are numbered from 9000 so the two ranges never collide.
///
/// Every error aborts the enclosing atomic unit: the outermost lock restores
/// the state it captured when the unit began.
use anchor_lang::prelude::*;

/// Validation, invariant and authorization errors.
#[error_code]
pub enum ErrorCode {
    /// Returned when position bounds are malformed
    ///
    /// This error occurs when:
    /// - The lower bound is not strictly below the upper bound
    /// - A bound is outside MIN_TICK/MAX_TICK
    /// - A bound is not a multiple of the pool's tick spacing
    #[msg("The provided tick range is invalid")]
    InvalidTickRange,

    /// Returned when a pool key carries a tick spacing of zero or above the maximum
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing,

    /// Returned when a pool key carries a fee at or above the fee denominator
    #[msg("Invalid fee")]
    InvalidFee,

    /// Returned when token0 is not strictly less than token1
    #[msg("Tokens must be distinct and sorted")]
    InvalidTokenOrder,

    /// Returned when a position update carries a zero liquidity delta
    #[msg("Liquidity delta must be nonzero")]
    ZeroLiquidityDelta,

    /// Returned when a swap's sqrt ratio limit is out of range or on the wrong
    /// side of the current price
    #[msg("Invalid sqrt ratio limit")]
    InvalidSqrtRatioLimit,

    #[msg("Pool is already initialized")]
    PoolAlreadyInitialized,

    #[msg("Pool is not initialized")]
    PoolNotInitialized,

    /// Returned when the swap engine reaches a bitmap entry without tick state
    #[msg("Tick is not initialized")]
    TickNotInitialized,

    /// Returned when removing more liquidity than a position holds
    #[msg("Insufficient position liquidity")]
    InsufficientPositionLiquidity,

    /// Returned when fees are accumulated or donated to a pool without active liquidity
    #[msg("No active liquidity to receive fees")]
    NoActiveLiquidity,

    /// Returned by `end_lock` while any debt entry of the lock is nonzero
    #[msg("Lock closed with unsettled debt")]
    UnsettledDebt,

    /// Returned by the outermost lock when a nested failure was swallowed by a locker
    #[msg("Atomic unit aborted by a nested failure")]
    AtomicUnitAborted,

    #[msg("Lock nesting depth exceeded")]
    LockDepthExceeded,

    /// Returned when an operation is attempted without an open lock
    #[msg("No lock is open")]
    NotLocked,

    /// Returned when the presented lock is not the innermost open lock or its
    /// locker address does not match
    #[msg("Lock is not the current lock")]
    InvalidLock,

    /// Returned when settling a token that has no recorded incoming transfer
    #[msg("No incoming transfer recorded")]
    PaymentNotRecorded,

    /// Returned when the core's balance dropped below a recorded baseline
    #[msg("Observed payment is negative")]
    NegativePayment,

    #[msg("Insufficient token balance")]
    InsufficientBalance,

    #[msg("Insufficient saved balance")]
    InsufficientSavedBalance,

    /// Returned when a non-extension caller invokes an extension-only operation
    #[msg("Caller is not the pool extension")]
    NotPoolExtension,

    #[msg("Extension is not registered")]
    ExtensionNotRegistered,

    #[msg("Extension is already registered")]
    ExtensionAlreadyRegistered,
}

/// Arithmetic errors of the fixed-point and fee accounting layers.
#[error_code]
pub enum MathError {
    #[msg("Arithmetic overflow")]
    Overflow = 9000,

    #[msg("Arithmetic underflow")]
    Underflow = 9001,

    #[msg("Division by zero")]
    DivisionByZero = 9002,

    /// Returned when a tick or sqrt ratio lies outside the representable curve
    #[msg("Tick or sqrt ratio out of range")]
    OutOfRange = 9003,

    /// Returned when a token amount does not fit in 128 bits
    #[msg("Token amount overflow")]
    AmountOverflow = 9004,

    /// Returned when reversing a fee would not fit in 128 bits
    #[msg("Amount before fee overflow")]
    AmountBeforeFeeOverflow = 9005,

    /// Returned when a fee-per-liquidity subtraction would go negative
    #[msg("Fees per liquidity underflow")]
    FeesPerLiquidityUnderflow = 9006,

    #[msg("Liquidity overflow")]
    LiquidityOverflow = 9007,

    #[msg("Liquidity underflow")]
    LiquidityUnderflow = 9008,

    /// Returned when a price movement leaves the representable range
    #[msg("Sqrt ratio movement out of range")]
    PriceOverflow = 9009,
}
