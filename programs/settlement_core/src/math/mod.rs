//! Fixed-point math library
//!
//! Square-root prices are Q64.96 values held in `primitive_types::U256`;
//! intermediate products are widened to `U512` so no step can silently wrap.
//! Every fallible function returns an anchor `Result` carrying a `MathError`.

pub mod delta_math;
pub mod fee_math;
pub mod full_math;
pub mod liquidity_math;
pub mod swap_math;
pub mod tick_math;

pub use delta_math::*;
pub use fee_math::*;
pub use full_math::*;
pub use liquidity_math::*;
pub use swap_math::*;
pub use tick_math::*;
