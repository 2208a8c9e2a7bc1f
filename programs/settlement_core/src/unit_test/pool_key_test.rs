use crate::constants::{FEE_DENOMINATOR, MAX_TICK_SPACING};
use crate::errors::ErrorCode;
use crate::pool_key::*;
use anchor_lang::prelude::*;

fn new_pubkey(val: u8) -> Pubkey {
    Pubkey::new_from_array([val; 32])
}

mod pool_key_tests {
    use super::*;

    #[test]
    fn test_new_orders_tokens() {
        let key = PoolKey::new(new_pubkey(2), new_pubkey(1), 3_000, 60, Pubkey::default()).unwrap();
        assert_eq!(key.token0, new_pubkey(1));
        assert_eq!(key.token1, new_pubkey(2));
        assert!(!key.has_extension());
    }

    #[test]
    fn test_new_rejects_identical_tokens() {
        let result = PoolKey::new(new_pubkey(1), new_pubkey(1), 3_000, 60, Pubkey::default());
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidTokenOrder.into());
    }

    #[test]
    fn test_validate_rejects_unsorted_key() {
        let key = PoolKey {
            token0: new_pubkey(2),
            token1: new_pubkey(1),
            fee: 3_000,
            tick_spacing: 60,
            extension: Pubkey::default(),
        };
        assert_eq!(key.validate().unwrap_err(), ErrorCode::InvalidTokenOrder.into());
    }

    #[test]
    fn test_validate_fee_and_spacing() {
        let fee_too_high = PoolKey::new(
            new_pubkey(1),
            new_pubkey(2),
            FEE_DENOMINATOR,
            60,
            Pubkey::default(),
        );
        assert_eq!(fee_too_high.unwrap_err(), ErrorCode::InvalidFee.into());

        for spacing in [0, MAX_TICK_SPACING + 1] {
            let result = PoolKey::new(new_pubkey(1), new_pubkey(2), 3_000, spacing, Pubkey::default());
            assert_eq!(result.unwrap_err(), ErrorCode::InvalidTickSpacing.into());
        }

        assert!(PoolKey::new(new_pubkey(1), new_pubkey(2), 0, MAX_TICK_SPACING, new_pubkey(9)).is_ok());
    }

    #[test]
    fn test_pool_id_is_deterministic() {
        let a = PoolKey::new(new_pubkey(1), new_pubkey(2), 3_000, 60, Pubkey::default()).unwrap();
        let b = PoolKey::new(new_pubkey(2), new_pubkey(1), 3_000, 60, Pubkey::default()).unwrap();
        assert_eq!(a.pool_id(), b.pool_id());
    }

    #[test]
    fn test_pool_id_covers_every_field() {
        let base = PoolKey::new(new_pubkey(1), new_pubkey(2), 3_000, 60, Pubkey::default()).unwrap();
        let variants = [
            PoolKey { token1: new_pubkey(3), ..base },
            PoolKey { fee: 500, ..base },
            PoolKey { tick_spacing: 10, ..base },
            PoolKey { extension: new_pubkey(9), ..base },
        ];
        for variant in variants {
            assert_ne!(variant.pool_id(), base.pool_id());
        }
    }
}
