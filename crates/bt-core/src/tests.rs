//! Unit tests for bt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId(0).is_valid());
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(NodeId(3).to_string(), "NodeId(3)");
    }
}

#[cfg(test)]
mod status {
    use crate::{Flow, Status};

    #[test]
    fn fresh_state_defaults() {
        assert_eq!(Status::default(), Status::Running);
        assert_eq!(Flow::default(), Flow::Down);
    }

    #[test]
    fn settled() {
        assert!(Status::Success.is_settled());
        assert!(Status::Fail.is_settled());
        assert!(!Status::Running.is_settled());
    }

    #[test]
    fn from_bool() {
        assert_eq!(Status::from_bool(true), Status::Success);
        assert_eq!(Status::from_bool(false), Status::Fail);
    }

    #[test]
    fn display() {
        assert_eq!(Status::Fail.to_string(), "fail");
        assert_eq!(Flow::Up.to_string(), "up");
    }
}

#[cfg(test)]
mod position {
    use crate::Position;

    #[test]
    fn distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn step_towards_partial() {
        let p = Position::ORIGIN.step_towards(Position::new(10.0, 0.0), 2.5);
        assert_eq!(p, Position::new(2.5, 0.0));
    }

    #[test]
    fn step_towards_snaps_when_close() {
        let target = Position::new(1.0, 1.0);
        assert_eq!(Position::ORIGIN.step_towards(target, 5.0), target);
        assert_eq!(target.step_towards(target, 1.0), target);
    }
}

#[cfg(test)]
mod time {
    use crate::{BtError, SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(5)), 10);
    }

    #[test]
    fn clock_dhm() {
        let mut clock = SimClock::new(3600);
        for _ in 0..25 {
            clock.advance();
        }
        assert_eq!(clock.elapsed_dhm(), (1, 1, 0));
        assert_eq!(clock.hour_of_day(), 1);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(600);
        assert_eq!(clock.ticks_for_secs(3600), 6);
        assert_eq!(clock.ticks_for_secs(1), 1);
    }

    #[test]
    fn sim_config_end_tick() {
        let cfg = SimConfig {
            tick_duration_secs:    600,
            total_ticks:           144,
            seed:                  42,
            report_interval_ticks: 24,
        };
        assert_eq!(cfg.end_tick(), Tick(144));
        assert_eq!(cfg.make_clock().tick_duration_secs, 600);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let cfg = SimConfig {
            tick_duration_secs:    0,
            total_ticks:           10,
            seed:                  1,
            report_interval_ticks: 0,
        };
        assert!(matches!(cfg.validate(), Err(BtError::Config(_))));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(7);
        let mut a = root.child(1);
        let mut b = root.child(2);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }
}
