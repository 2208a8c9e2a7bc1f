use crate::errors::ErrorCode;
use crate::ledger::*;
use anchor_lang::prelude::*;
use ethnum::I256;

const MAX_DEPTH: u32 = 8;

fn new_pubkey(val: u8) -> Pubkey {
    Pubkey::new_from_array([val; 32])
}

mod lock_lifecycle_tests {
    use super::*;

    #[test]
    fn test_open_and_close() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        assert_eq!(lock.id(), 0);
        assert_eq!(lock.locker(), new_pubkey(1));
        assert_eq!(ledger.depth(), 1);
        assert_eq!(ledger.current(), Some(lock));

        ledger.close(&lock)?;
        assert_eq!(ledger.depth(), 0);
        assert_eq!(ledger.current(), None);
        Ok(())
    }

    #[test]
    fn test_ids_increase_and_reset_per_unit() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let outer = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        let first = ledger.open(new_pubkey(2), MAX_DEPTH)?;
        ledger.close(&first)?;
        let second = ledger.open(new_pubkey(2), MAX_DEPTH)?;
        assert_eq!((outer.id(), first.id(), second.id()), (0, 1, 2));

        ledger.close(&second)?;
        ledger.close(&outer)?;
        assert!(!ledger.finish_unit());

        assert_eq!(ledger.open(new_pubkey(1), MAX_DEPTH)?.id(), 0);
        Ok(())
    }

    #[test]
    fn test_depth_limit() {
        let mut ledger = FlashLedger::default();
        ledger.open(new_pubkey(1), 2).unwrap();
        ledger.open(new_pubkey(1), 2).unwrap();
        assert_eq!(
            ledger.open(new_pubkey(1), 2).unwrap_err(),
            ErrorCode::LockDepthExceeded.into()
        );
        assert_eq!(ledger.depth(), 2);
    }

    #[test]
    fn test_only_innermost_lock_is_current() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let outer = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        let inner = ledger.open(new_pubkey(2), MAX_DEPTH)?;

        assert!(ledger.require_current(&inner).is_ok());
        assert_eq!(
            ledger.require_current(&outer).unwrap_err(),
            ErrorCode::InvalidLock.into()
        );

        ledger.close(&inner)?;
        ledger.close(&outer)?;
        assert_eq!(
            ledger.require_current(&outer).unwrap_err(),
            ErrorCode::NotLocked.into()
        );
        Ok(())
    }

    #[test]
    fn test_unwind_drops_nested_frames() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let outer = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        let middle = ledger.open(new_pubkey(2), MAX_DEPTH)?;
        let inner = ledger.open(new_pubkey(3), MAX_DEPTH)?;
        ledger.accrue_debt(middle.id(), token, I256::from(5u8))?;
        ledger.accrue_debt(inner.id(), token, I256::from(7u8))?;

        ledger.unwind(&middle);
        assert_eq!(ledger.depth(), 1);
        assert_eq!(ledger.current(), Some(outer));
        assert_eq!(ledger.debt(middle.id(), &token), I256::ZERO);
        assert_eq!(ledger.debt(inner.id(), &token), I256::ZERO);
        Ok(())
    }

    #[test]
    fn test_poison_is_reported_once() -> Result<()> {
        let mut ledger = FlashLedger::default();
        ledger.open(new_pubkey(1), MAX_DEPTH)?;
        ledger.poison();
        assert!(ledger.is_poisoned());

        assert!(ledger.finish_unit());
        assert!(!ledger.is_poisoned());
        assert_eq!(ledger.depth(), 0);
        Ok(())
    }

    #[test]
    fn test_forward_swaps_locker() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        ledger.accrue_debt(lock.id(), new_pubkey(9), I256::ONE)?;

        let (forwarded, previous) = ledger.forward(&lock, new_pubkey(2))?;
        assert_eq!(previous, new_pubkey(1));
        assert_eq!(forwarded.id(), lock.id());
        assert_eq!(forwarded.locker(), new_pubkey(2));
        // The original capability no longer matches the frame
        assert_eq!(
            ledger.require_current(&lock).unwrap_err(),
            ErrorCode::InvalidLock.into()
        );
        assert_eq!(ledger.debt(forwarded.id(), &new_pubkey(9)), I256::ONE);

        assert_eq!(ledger.set_locker(lock.id(), new_pubkey(1))?, new_pubkey(2));
        assert!(ledger.require_current(&lock).is_ok());
        Ok(())
    }
}

mod debt_tests {
    use super::*;

    #[test]
    fn test_unsettled_debt_keeps_lock_open() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.accrue_debt(lock.id(), token, I256::from(100u8))?;
        assert_eq!(ledger.nonzero_debt_count(lock.id()), 1);
        assert_eq!(ledger.close(&lock).unwrap_err(), ErrorCode::UnsettledDebt.into());
        assert_eq!(ledger.depth(), 1);

        ledger.accrue_debt(lock.id(), token, I256::from(-100i8))?;
        assert_eq!(ledger.nonzero_debt_count(lock.id()), 0);
        ledger.close(&lock)
    }

    #[test]
    fn test_credit_also_blocks_close() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        ledger.accrue_debt(lock.id(), new_pubkey(9), I256::from(-1i8))?;
        assert_eq!(ledger.close(&lock).unwrap_err(), ErrorCode::UnsettledDebt.into());
        Ok(())
    }

    #[test]
    fn test_count_tracks_tokens_not_entries() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.accrue_debt(lock.id(), new_pubkey(8), I256::from(3u8))?;
        ledger.accrue_debt(lock.id(), new_pubkey(8), I256::from(4u8))?;
        ledger.accrue_debt(lock.id(), new_pubkey(9), I256::from(-2i8))?;
        ledger.accrue_debt(lock.id(), new_pubkey(9), I256::ZERO)?;
        assert_eq!(ledger.nonzero_debt_count(lock.id()), 2);
        assert_eq!(ledger.debt(lock.id(), &new_pubkey(8)), I256::from(7u8));

        // Crossing zero without landing on it keeps the count
        ledger.accrue_debt(lock.id(), new_pubkey(9), I256::from(5u8))?;
        assert_eq!(ledger.nonzero_debt_count(lock.id()), 2);
        assert_eq!(ledger.debt(lock.id(), &new_pubkey(9)), I256::from(3u8));
        Ok(())
    }

    #[test]
    fn test_nested_locks_are_isolated() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let outer = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        ledger.accrue_debt(outer.id(), token, I256::from(50u8))?;

        let inner = ledger.open(new_pubkey(2), MAX_DEPTH)?;
        assert_eq!(ledger.debt(inner.id(), &token), I256::ZERO);
        // The inner lock cannot settle the outer lock's debt
        ledger.accrue_debt(inner.id(), token, I256::from(-50i8))?;
        assert_eq!(ledger.debt(outer.id(), &token), I256::from(50u8));
        assert_eq!(ledger.close(&inner).unwrap_err(), ErrorCode::UnsettledDebt.into());

        ledger.accrue_debt(inner.id(), token, I256::from(50u8))?;
        ledger.close(&inner)?;
        assert_eq!(ledger.close(&outer).unwrap_err(), ErrorCode::UnsettledDebt.into());
        Ok(())
    }

    #[test]
    fn test_accrue_on_closed_lock() -> Result<()> {
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        ledger.close(&lock)?;
        assert_eq!(
            ledger
                .accrue_debt(lock.id(), new_pubkey(9), I256::ONE)
                .unwrap_err(),
            ErrorCode::InvalidLock.into()
        );
        Ok(())
    }
}

mod payment_marker_tests {
    use super::*;

    #[test]
    fn test_payment_since_marker() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.record_marker(lock.id(), token, 100);
        assert!(ledger.has_marker(lock.id(), &token));
        assert_eq!(ledger.take_payment(lock.id(), token, 130)?, 30);
        assert!(!ledger.has_marker(lock.id(), &token));
        assert_eq!(
            ledger.take_payment(lock.id(), token, 130).unwrap_err(),
            ErrorCode::PaymentNotRecorded.into()
        );
        Ok(())
    }

    #[test]
    fn test_first_marker_wins() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.record_marker(lock.id(), token, 100);
        ledger.record_marker(lock.id(), token, 150);
        assert_eq!(ledger.take_payment(lock.id(), token, 150)?, 50);
        Ok(())
    }

    #[test]
    fn test_premature_settle_keeps_marker() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.record_marker(lock.id(), token, 100);
        assert_eq!(ledger.take_payment(lock.id(), token, 100)?, 0);
        assert!(ledger.has_marker(lock.id(), &token));

        assert_eq!(ledger.take_payment(lock.id(), token, 175)?, 75);
        Ok(())
    }

    #[test]
    fn test_balance_below_marker() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.record_marker(lock.id(), token, 100);
        assert_eq!(
            ledger.take_payment(lock.id(), token, 99).unwrap_err(),
            ErrorCode::NegativePayment.into()
        );
        Ok(())
    }

    #[test]
    fn test_payment_is_credited_once_across_locks() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let outer = ledger.open(new_pubkey(1), MAX_DEPTH)?;
        let inner = ledger.open(new_pubkey(2), MAX_DEPTH)?;

        ledger.record_marker(outer.id(), token, 100);
        ledger.record_marker(inner.id(), token, 100);
        assert_eq!(ledger.take_payment(inner.id(), token, 150)?, 50);

        // The outer marker moved with the settled payment
        assert_eq!(ledger.take_payment(outer.id(), token, 150)?, 0);
        assert_eq!(ledger.take_payment(outer.id(), token, 160)?, 10);
        Ok(())
    }

    #[test]
    fn test_shift_markers_by_outgoing_transfer() -> Result<()> {
        let token = new_pubkey(9);
        let mut ledger = FlashLedger::default();
        let lock = ledger.open(new_pubkey(1), MAX_DEPTH)?;

        ledger.record_marker(lock.id(), token, 100);
        ledger.shift_markers(token, I256::from(-40i8))?;
        ledger.shift_markers(new_pubkey(8), I256::from(1_000i16))?;
        assert_eq!(ledger.take_payment(lock.id(), token, 80)?, 20);
        Ok(())
    }
}
