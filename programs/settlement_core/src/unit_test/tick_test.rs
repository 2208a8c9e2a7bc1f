use crate::errors::MathError;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::tick::*;
use anchor_lang::prelude::*;
use ethnum::I256;
use proptest::prelude::*;

fn fees(value0: i64, value1: i64) -> FeesPerLiquidity {
    FeesPerLiquidity::new(I256::from(value0), I256::from(value1))
}

/// Comprehensive tests for tick.rs functionalities
mod tick_tests {
    use super::*;

    mod liquidity_update_tests {
        use super::*;

        #[test]
        fn test_lower_tick_adds_net() -> Result<()> {
            let mut tick = Tick::default();
            assert!(!tick.is_initialized());

            let flipped = tick.update_on_liquidity_change(500, false)?;
            assert!(flipped, "First reference should initialize the tick");
            assert_eq!(tick.liquidity_gross, 500);
            assert_eq!(tick.liquidity_net, 500);
            Ok(())
        }

        #[test]
        fn test_upper_tick_subtracts_net() -> Result<()> {
            let mut tick = Tick::default();
            tick.update_on_liquidity_change(500, true)?;
            assert_eq!(tick.liquidity_gross, 500);
            assert_eq!(tick.liquidity_net, -500);
            Ok(())
        }

        #[test]
        fn test_offsetting_positions_keep_tick_initialized() -> Result<()> {
            // One position ends where another starts: net is zero, gross is not
            let mut tick = Tick::default();
            tick.update_on_liquidity_change(300, true)?;
            let flipped = tick.update_on_liquidity_change(300, false)?;

            assert!(!flipped);
            assert_eq!(tick.liquidity_net, 0);
            assert_eq!(tick.liquidity_gross, 600);
            assert!(tick.is_initialized());
            Ok(())
        }

        #[test]
        fn test_removing_all_liquidity_flips() -> Result<()> {
            let mut tick = Tick::default();
            tick.update_on_liquidity_change(100, false)?;
            tick.update_on_liquidity_change(50, false)?;

            assert!(!tick.update_on_liquidity_change(-50, false)?);
            assert!(tick.update_on_liquidity_change(-100, false)?);
            assert!(!tick.is_initialized());
            assert_eq!(tick.liquidity_net, 0);
            Ok(())
        }

        #[test]
        fn test_gross_underflow() {
            let mut tick = Tick::default();
            tick.update_on_liquidity_change(10, false).unwrap();
            assert_eq!(
                tick.update_on_liquidity_change(-11, false).unwrap_err(),
                MathError::LiquidityUnderflow.into()
            );
        }
    }

    mod cross_tests {
        use super::*;

        #[test]
        fn test_cross_flips_outside() -> Result<()> {
            let mut tick = Tick {
                liquidity_net: -250,
                liquidity_gross: 250,
                fees_per_liquidity_outside: fees(30, 5),
            };

            let net = tick.cross(&fees(100, 40))?;
            assert_eq!(net, -250);
            assert_eq!(tick.fees_per_liquidity_outside, fees(70, 35));

            // Crossing back with no accrual restores the original snapshot
            tick.cross(&fees(100, 40))?;
            assert_eq!(tick.fees_per_liquidity_outside, fees(30, 5));
            Ok(())
        }

        #[test]
        fn test_cross_rejects_outside_above_global() {
            let mut tick = Tick {
                liquidity_net: 1,
                liquidity_gross: 1,
                fees_per_liquidity_outside: fees(10, 0),
            };
            assert_eq!(
                tick.cross(&fees(9, 0)).unwrap_err(),
                MathError::FeesPerLiquidityUnderflow.into()
            );
        }
    }

    mod fees_inside_tests {
        use super::*;

        const LOWER: i32 = -100;
        const UPPER: i32 = 100;

        #[test]
        fn test_current_tick_inside_range() -> Result<()> {
            let inside = fees_per_liquidity_inside(
                &fees(100, 100),
                0,
                LOWER,
                &fees(20, 10),
                UPPER,
                &fees(30, 5),
            )?;
            assert_eq!(inside, fees(50, 85));
            Ok(())
        }

        #[test]
        fn test_current_tick_below_range() -> Result<()> {
            let inside = fees_per_liquidity_inside(
                &fees(100, 100),
                LOWER - 1,
                LOWER,
                &fees(60, 40),
                UPPER,
                &fees(20, 10),
            )?;
            assert_eq!(inside, fees(40, 30));
            Ok(())
        }

        #[test]
        fn test_current_tick_above_range() -> Result<()> {
            let inside = fees_per_liquidity_inside(
                &fees(100, 100),
                UPPER,
                LOWER,
                &fees(20, 10),
                UPPER,
                &fees(60, 40),
            )?;
            assert_eq!(inside, fees(40, 30));
            Ok(())
        }

        #[test]
        fn test_upper_bound_is_exclusive() -> Result<()> {
            // At tick == lower the range is active, at tick == upper it is not
            let global = fees(100, 100);
            let at_lower =
                fees_per_liquidity_inside(&global, LOWER, LOWER, &fees(0, 0), UPPER, &fees(0, 0))?;
            assert_eq!(at_lower, global);

            let at_upper =
                fees_per_liquidity_inside(&global, UPPER, LOWER, &fees(0, 0), UPPER, &fees(0, 0))?;
            assert_eq!(at_upper, fees(0, 0));
            Ok(())
        }
    }

    proptest! {
        #[test]
        fn test_double_cross_is_identity(
            outside0 in 0i64..1_000_000,
            outside1 in 0i64..1_000_000,
            extra0 in 0i64..1_000_000,
            extra1 in 0i64..1_000_000,
        ) {
            let original = fees(outside0, outside1);
            let global = fees(outside0 + extra0, outside1 + extra1);
            let mut tick = Tick {
                liquidity_net: 7,
                liquidity_gross: 7,
                fees_per_liquidity_outside: original,
            };
            tick.cross(&global).unwrap();
            tick.cross(&global).unwrap();
            prop_assert_eq!(tick.fees_per_liquidity_outside, original);
        }
    }
}
