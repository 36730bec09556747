//! Property tests for the chakra pool and the hold confirmer.

use chakra_core::{Gesture, GestureConfirmer, GestureLabel, PoolConfig, ResourcePool};
use proptest::prelude::*;

fn gesture() -> impl Strategy<Value = Gesture> {
    (0..Gesture::ALL.len()).prop_map(|i| Gesture::ALL[i])
}

#[derive(Debug, Clone)]
enum Op {
    Activate(Gesture, f64),
    Regenerate,
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (gesture(), 0.0..0.5f64).prop_map(|(g, dt)| Op::Activate(g, dt)),
        4 => Just(Op::Regenerate),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    /// Level stays within [0, capacity] and each successful activation
    /// costs exactly the configured amount and sets the exact cooldown end.
    #[test]
    fn activation_accounting(ops in prop::collection::vec(op(), 1..200), regen in 0.0..5.0f64) {
        let cfg = PoolConfig { regen_rate: regen, ..PoolConfig::default() };
        let mut pool = ResourcePool::new(&cfg).unwrap();
        let mut now = 0.0;

        for op in ops {
            match op {
                Op::Activate(g, dt) => {
                    now += dt;
                    let before = pool.level();
                    let allowed = pool.can_activate(g, now);
                    let ok = pool.try_activate(g, now);
                    prop_assert_eq!(ok, allowed);
                    if ok {
                        let cost = pool.cost(g).unwrap();
                        prop_assert!((before - cost - pool.level()).abs() < 1e-9);
                        prop_assert_eq!(pool.cooldown_end(g), Some(now + pool.cooldown_duration(g)));
                    } else {
                        prop_assert_eq!(pool.level(), before);
                    }
                }
                Op::Regenerate => pool.regenerate(),
                Op::Reset => {
                    pool.reset();
                    prop_assert_eq!(pool.percentage(), 100.0);
                    for g in Gesture::ALL {
                        prop_assert_eq!(pool.cooldown_remaining(g, now), 0.0);
                    }
                }
            }
            prop_assert!(pool.level() >= 0.0);
            prop_assert!(pool.level() <= pool.capacity());
            prop_assert!((0.0..=100.0).contains(&pool.percentage()));
        }
    }

    /// At capacity, regeneration is a no-op however often it runs.
    #[test]
    fn regenerate_at_capacity_is_noop(n in 1usize..500, regen in 0.0..50.0f64) {
        let cfg = PoolConfig { regen_rate: regen, ..PoolConfig::default() };
        let mut pool = ResourcePool::new(&cfg).unwrap();
        for _ in 0..n { pool.regenerate(); }
        prop_assert_eq!(pool.level(), pool.capacity());
    }

    /// A pose held without interruption, at any frame rate, confirms once,
    /// and never before the threshold has elapsed.
    #[test]
    fn static_pose_confirms_once(g in gesture(), fps in 5u32..240, threshold in 0.05..2.0f64) {
        let mut c = GestureConfirmer::new(threshold);
        let dt = 1.0 / fps as f64;
        let mut fired = Vec::new();
        for i in 0..(fps * 6) {
            let t = i as f64 * dt;
            if c.update(Some(GestureLabel::Recognized(g)), t).is_some() {
                fired.push(t);
            }
        }
        prop_assert_eq!(fired.len(), 1);
        prop_assert!(fired[0] + 1e-6 >= threshold);
        prop_assert!(fired[0] < threshold + dt + 1e-6);
    }
}
