use crate::errors::MathError;
use crate::fees_per_liquidity::*;
use anchor_lang::prelude::*;
use ethnum::I256;

mod fees_per_liquidity_tests {
    use super::*;

    #[test]
    fn test_from_amounts_is_q128() -> Result<()> {
        let fees = FeesPerLiquidity::from_amounts(3, 0, 1)?;
        assert_eq!(fees.value0, I256::from(3u8) << 128);
        assert_eq!(fees.value1, I256::ZERO);

        let fees = FeesPerLiquidity::from_amounts(1, 1, 4)?;
        assert_eq!(fees.value0, I256::ONE << 126);
        Ok(())
    }

    #[test]
    fn test_from_amounts_without_liquidity() {
        assert_eq!(
            FeesPerLiquidity::from_amounts(1, 1, 0).unwrap_err(),
            MathError::DivisionByZero.into()
        );
    }

    #[test]
    fn test_amounts_for_rounds_down() -> Result<()> {
        // 2^128 / 3 per unit, three units earn slightly less than one token
        let fees = FeesPerLiquidity::from_amounts(1, 0, 3)?;
        assert_eq!(fees.amounts_for(3)?, (0, 0));
        assert_eq!(fees.amounts_for(6)?, (1, 0));
        Ok(())
    }

    #[test]
    fn test_amounts_for_negative_growth() {
        let fees = FeesPerLiquidity::new(-I256::ONE, I256::ZERO);
        assert_eq!(
            fees.amounts_for(1).unwrap_err(),
            MathError::FeesPerLiquidityUnderflow.into()
        );
    }

    #[test]
    fn test_amounts_for_overflow() {
        let fees = FeesPerLiquidity::new(I256::ONE << 200, I256::ZERO);
        assert_eq!(
            fees.amounts_for(u128::MAX).unwrap_err(),
            MathError::Overflow.into()
        );
    }

    #[test]
    fn test_sub_non_negative() -> Result<()> {
        let a = FeesPerLiquidity::new(I256::from(10u8), I256::from(20u8));
        let b = FeesPerLiquidity::new(I256::from(4u8), I256::from(20u8));

        assert_eq!(
            a.sub_non_negative(&b)?,
            FeesPerLiquidity::new(I256::from(6u8), I256::ZERO)
        );
        assert_eq!(
            b.sub_non_negative(&a).unwrap_err(),
            MathError::FeesPerLiquidityUnderflow.into()
        );
        // A plain signed difference is allowed to go negative
        assert_eq!(b.checked_sub(&a)?.value0, I256::from(-6i8));
        Ok(())
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = FeesPerLiquidity::new(I256::MAX, I256::ZERO);
        let one = FeesPerLiquidity::new(I256::ONE, I256::ZERO);
        assert_eq!(max.checked_add(&one).unwrap_err(), MathError::Overflow.into());
    }

    #[test]
    fn test_zero() {
        assert!(FeesPerLiquidity::default().is_zero());
        assert!(!FeesPerLiquidity::new(I256::ZERO, I256::ONE).is_zero());
    }
}
