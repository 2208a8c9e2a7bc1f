use crate::extension::*;
use crate::pool_key::PoolId;
use crate::utils::TimeGate;
use anchor_lang::prelude::*;

fn new_pool_id(val: u8) -> PoolId {
    PoolId(Pubkey::new_from_array([val; 32]))
}

mod call_points_tests {
    use super::*;

    const ALL_POINTS: [HookPoint; 10] = [
        HookPoint::BeforeInitializePool,
        HookPoint::AfterInitializePool,
        HookPoint::BeforeUpdatePosition,
        HookPoint::AfterUpdatePosition,
        HookPoint::BeforeSwap,
        HookPoint::AfterSwap,
        HookPoint::BeforeCollectFees,
        HookPoint::AfterCollectFees,
        HookPoint::BeforeDonate,
        HookPoint::AfterDonate,
    ];

    #[test]
    fn test_none_and_all() {
        for point in ALL_POINTS {
            assert!(!CallPoints::none().contains(point));
            assert!(CallPoints::all().contains(point));
        }
        assert_eq!(CallPoints::default(), CallPoints::none());
    }

    #[test]
    fn test_with_adds_single_point() {
        let points = CallPoints::none()
            .with(HookPoint::BeforeSwap)
            .with(HookPoint::AfterDonate);

        for point in ALL_POINTS {
            let expected = matches!(point, HookPoint::BeforeSwap | HookPoint::AfterDonate);
            assert_eq!(points.contains(point), expected, "{point:?}");
        }
    }
}

mod hook_guard_tests {
    use super::*;

    #[test]
    fn test_enter_blocks_same_point_on_same_pool() {
        let mut guard = HookGuard::default();
        assert!(guard.enter(new_pool_id(1), HookPoint::BeforeSwap));
        assert!(!guard.enter(new_pool_id(1), HookPoint::BeforeSwap));

        // Other points and other pools are independent
        assert!(guard.enter(new_pool_id(1), HookPoint::AfterSwap));
        assert!(guard.enter(new_pool_id(2), HookPoint::BeforeSwap));
    }

    #[test]
    fn test_exit_and_clear() {
        let mut guard = HookGuard::default();
        guard.enter(new_pool_id(1), HookPoint::BeforeSwap);
        guard.enter(new_pool_id(2), HookPoint::BeforeSwap);

        guard.exit(new_pool_id(1), HookPoint::BeforeSwap);
        assert!(!guard.is_active(new_pool_id(1), HookPoint::BeforeSwap));
        assert!(guard.is_active(new_pool_id(2), HookPoint::BeforeSwap));

        guard.clear();
        assert!(!guard.is_active(new_pool_id(2), HookPoint::BeforeSwap));
    }
}

mod time_gate_tests {
    use super::*;

    #[test]
    fn test_once_per_time_unit() {
        let mut gate = TimeGate::new();
        assert!(gate.try_enter(new_pool_id(1), 10));
        assert!(!gate.try_enter(new_pool_id(1), 10));
        assert!(gate.try_enter(new_pool_id(2), 10));

        assert!(gate.try_enter(new_pool_id(1), 11));
        assert_eq!(gate.last_entered(&new_pool_id(1)), Some(11));
        assert_eq!(gate.last_entered(&new_pool_id(3)), None);
    }
}
