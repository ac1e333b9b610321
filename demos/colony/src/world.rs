//! A small colony world backing the demo's leaves.
//!
//! Citizens live in dwellings, work in workplaces and haul resources from a
//! storehouse to a market.  Pathfinding is asynchronous: `FindPathTo` leaves
//! enqueue a request, and [`ColonyWorld::service_paths`] resolves at most
//! `paths_per_tick` of them between population ticks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bt_behavior::{ActionProvider, BehaviorError, BehaviorResult};
use bt_core::{AgentId, Position, SimRng};
use tracing::{debug, trace};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ColonyConfig {
    pub citizens:           usize,
    pub dwellings:          usize,
    pub dwelling_capacity:  u32,
    pub workplaces:         usize,
    pub workplace_capacity: u32,
    /// The first `static_workplaces` workplaces offer static jobs; the rest
    /// are hauling jobs.
    pub static_workplaces:  usize,
    /// Side length of the square map.
    pub world_size:         f32,
    /// Distance covered per `MoveTo` visit.
    pub walk_speed:         f32,
    /// Path requests resolved per tick.
    pub paths_per_tick:     usize,
    /// Hauling tasks posted per tick.
    pub tasks_per_tick:     usize,
    /// Day is `[day_start_hour, night_start_hour)`.
    pub day_start_hour:     u32,
    pub night_start_hour:   u32,
}

impl ColonyConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        if self.static_workplaces > self.workplaces {
            return Err(BehaviorError::Config(format!(
                "static_workplaces ({}) exceeds workplaces ({})",
                self.static_workplaces, self.workplaces
            )));
        }
        if !(self.world_size > 0.0) || !(self.walk_speed > 0.0) {
            return Err(BehaviorError::Config(
                "world_size and walk_speed must be positive".into(),
            ));
        }
        if self.paths_per_tick == 0 {
            return Err(BehaviorError::Config("paths_per_tick must be at least 1".into()));
        }
        if self.day_start_hour >= self.night_start_hour || self.night_start_hour > 24 {
            return Err(BehaviorError::Config(format!(
                "invalid day window {}..{}",
                self.day_start_hour, self.night_start_hour
            )));
        }
        Ok(())
    }
}

// ── Citizens ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug, Default)]
enum Route {
    #[default]
    Idle,
    Pending,
    Ready(Position),
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum PathTarget {
    Random,
    To(Position),
    TaskGiver,
    TaskReceiver,
}

#[derive(Clone, Debug, Default)]
struct Citizen {
    position:  Position,
    dwelling:  Option<usize>,
    workplace: Option<usize>,
    route:     Route,
    indoors:   bool,
    carrying:  bool,
}

/// Aggregate counts for the periodic report.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ColonySummary {
    pub housed:        usize,
    pub employed:      usize,
    pub indoors:       usize,
    pub walking:       usize,
    pub carrying:      usize,
    pub pending_paths: usize,
    pub deliveries:    usize,
}

// ── ColonyWorld ───────────────────────────────────────────────────────────────

pub struct ColonyWorld {
    config:      ColonyConfig,
    citizens:    Vec<Mutex<Citizen>>,
    dwellings:   Vec<Position>,
    workplaces:  Vec<Position>,
    /// Free places per dwelling / workplace.
    homes_free:  Mutex<Vec<u32>>,
    jobs_free:   Mutex<Vec<u32>>,
    storehouse:  Position,
    market:      Position,
    requests:    Mutex<VecDeque<(AgentId, PathTarget)>>,
    day:         AtomicBool,
    open_tasks:  AtomicUsize,
    deliveries:  AtomicUsize,
}

impl ColonyWorld {
    /// Scatter buildings and citizens over the map.
    pub fn new(config: ColonyConfig, rng: &mut SimRng) -> BehaviorResult<Self> {
        config.validate()?;

        let size = config.world_size;
        let place = |rng: &mut SimRng| Position::new(rng.gen_range(0.0..size), rng.gen_range(0.0..size));

        let dwellings: Vec<Position> = (0..config.dwellings).map(|_| place(rng)).collect();
        let workplaces: Vec<Position> = (0..config.workplaces).map(|_| place(rng)).collect();
        let citizens = (0..config.citizens)
            .map(|_| Mutex::new(Citizen { position: place(rng), ..Citizen::default() }))
            .collect();

        debug!(
            citizens   = config.citizens,
            dwellings  = dwellings.len(),
            workplaces = workplaces.len(),
            "colony created"
        );

        Ok(Self {
            homes_free: Mutex::new(vec![config.dwelling_capacity; dwellings.len()]),
            jobs_free: Mutex::new(vec![config.workplace_capacity; workplaces.len()]),
            storehouse: Position::new(size * 0.1, size * 0.1),
            market: Position::new(size * 0.9, size * 0.9),
            citizens,
            dwellings,
            workplaces,
            config,
            requests: Mutex::new(VecDeque::new()),
            day: AtomicBool::new(false),
            open_tasks: AtomicUsize::new(0),
            deliveries: AtomicUsize::new(0),
        })
    }

    /// Citizens the world tracks; the runner must hold one agent per citizen.
    pub fn citizen_count(&self) -> usize {
        self.citizens.len()
    }

    /// Update the day/night phase from the clock.
    pub fn set_hour(&self, hour: u32) {
        let day = (self.config.day_start_hour..self.config.night_start_hour).contains(&hour);
        if self.day.swap(day, Ordering::Relaxed) != day {
            debug!(hour, day, "day phase changed");
        }
    }

    /// Post this tick's hauling tasks.
    pub fn post_tasks(&self) {
        self.open_tasks.fetch_add(self.config.tasks_per_tick, Ordering::Relaxed);
    }

    /// Resolve up to `paths_per_tick` queued path requests.  Returns how many
    /// were resolved.
    pub fn service_paths(&mut self, rng: &mut SimRng) -> usize {
        let size = self.config.world_size;
        let budget = self.config.paths_per_tick;
        let queue = self.requests.get_mut().unwrap_or_else(PoisonError::into_inner);

        let mut served = 0;
        while served < budget {
            let Some((agent, target)) = queue.pop_front() else { break };
            let goal = match target {
                PathTarget::Random => Position::new(rng.gen_range(0.0..size), rng.gen_range(0.0..size)),
                PathTarget::To(p) => p,
                PathTarget::TaskGiver => self.storehouse,
                PathTarget::TaskReceiver => self.market,
            };
            if let Some(c) = self.citizens.get_mut(agent.index()) {
                c.get_mut().unwrap_or_else(PoisonError::into_inner).route = Route::Ready(goal);
            }
            served += 1;
        }
        if !queue.is_empty() {
            trace!(served, backlog = queue.len(), "path budget exhausted");
        }
        served
    }

    pub fn summary(&self) -> ColonySummary {
        let mut s = ColonySummary {
            pending_paths: lock(&self.requests).len(),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            ..ColonySummary::default()
        };
        for c in &self.citizens {
            let c = lock(c);
            s.housed += usize::from(c.dwelling.is_some());
            s.employed += usize::from(c.workplace.is_some());
            s.indoors += usize::from(c.indoors);
            s.walking += usize::from(matches!(c.route, Route::Ready(_)));
            s.carrying += usize::from(c.carrying);
        }
        s
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn citizen(&self, agent: AgentId) -> Option<MutexGuard<'_, Citizen>> {
        self.citizens.get(agent.index()).map(lock)
    }

    fn query(&self, agent: AgentId, f: impl FnOnce(&Citizen) -> bool) -> bool {
        self.citizen(agent).is_some_and(|c| f(&c))
    }

    fn update(&self, agent: AgentId, f: impl FnOnce(&mut Citizen)) {
        if let Some(mut c) = self.citizen(agent) {
            f(&mut c);
        }
    }

    fn request(&self, agent: AgentId, target: PathTarget) {
        self.update(agent, |c| c.route = Route::Pending);
        lock(&self.requests).push_back((agent, target));
    }

    /// Take one free place from `free`, returning its index.
    fn claim(free: &Mutex<Vec<u32>>) -> Option<usize> {
        let mut free = lock(free);
        let (i, slot) = free.iter_mut().enumerate().find(|(_, n)| **n > 0)?;
        *slot -= 1;
        Some(i)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── ActionProvider ────────────────────────────────────────────────────────────

impl ActionProvider for ColonyWorld {
    fn has_path(&self, agent: AgentId) -> bool {
        self.query(agent, |c| matches!(c.route, Route::Ready(_)))
    }

    /// A citizen with no route is wherever it needs to be.
    fn is_at_destination(&self, agent: AgentId) -> bool {
        let Some(mut c) = self.citizen(agent) else { return false };
        match c.route {
            Route::Ready(goal) if c.position == goal => {
                c.route = Route::Idle;
                true
            }
            Route::Ready(_) => false,
            Route::Idle | Route::Pending => true,
        }
    }

    fn follow_path(&self, agent: AgentId) {
        let speed = self.config.walk_speed;
        self.update(agent, |c| {
            if let Route::Ready(goal) = c.route {
                c.indoors = false;
                c.position = c.position.step_towards(goal, speed);
            }
        });
    }

    fn request_random_path(&self, agent: AgentId) {
        self.request(agent, PathTarget::Random);
    }

    fn request_path_to(&self, agent: AgentId, target: Position) {
        self.request(agent, PathTarget::To(target));
    }

    fn request_path_to_task_giver(&self, agent: AgentId) {
        self.request(agent, PathTarget::TaskGiver);
    }

    fn request_path_to_task_receiver(&self, agent: AgentId) {
        self.request(agent, PathTarget::TaskReceiver);
    }

    fn dwelling_position(&self, agent: AgentId) -> Option<Position> {
        let home = self.citizen(agent)?.dwelling?;
        self.dwellings.get(home).copied()
    }

    fn working_place_position(&self, agent: AgentId) -> Option<Position> {
        let work = self.citizen(agent)?.workplace?;
        self.workplaces.get(work).copied()
    }

    fn has_dwelling(&self, agent: AgentId) -> bool {
        self.query(agent, |c| c.dwelling.is_some())
    }

    fn assign_dwelling(&self, agent: AgentId) -> bool {
        let Some(mut c) = self.citizen(agent) else { return false };
        if c.dwelling.is_some() {
            return true;
        }
        c.dwelling = Self::claim(&self.homes_free);
        c.dwelling.is_some()
    }

    fn enter_dwelling(&self, agent: AgentId) {
        self.update(agent, |c| c.indoors = true);
    }

    fn exit_dwelling(&self, agent: AgentId) {
        self.update(agent, |c| c.indoors = false);
    }

    fn enter_working_place(&self, agent: AgentId) {
        self.update(agent, |c| c.indoors = true);
    }

    fn exit_working_place(&self, agent: AgentId) {
        self.update(agent, |c| c.indoors = false);
    }

    fn has_job(&self, agent: AgentId) -> bool {
        self.query(agent, |c| c.workplace.is_some())
    }

    fn has_static_job(&self, agent: AgentId) -> bool {
        let limit = self.config.static_workplaces;
        self.query(agent, |c| c.workplace.is_some_and(|w| w < limit))
    }

    fn assign_job(&self, agent: AgentId) -> bool {
        let Some(mut c) = self.citizen(agent) else { return false };
        if c.workplace.is_some() {
            return true;
        }
        c.workplace = Self::claim(&self.jobs_free);
        c.workplace.is_some()
    }

    fn is_day_time(&self) -> bool {
        self.day.load(Ordering::Relaxed)
    }

    fn request_inventory_task(&self, _agent: AgentId) -> bool {
        self.open_tasks
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }

    fn take_resource(&self, agent: AgentId) {
        self.update(agent, |c| c.carrying = true);
    }

    fn put_resource(&self, agent: AgentId) {
        let mut delivered = false;
        self.update(agent, |c| {
            delivered = std::mem::take(&mut c.carrying);
        });
        if delivered {
            self.deliveries.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ColonyConfig {
        ColonyConfig {
            citizens:           3,
            dwellings:          1,
            dwelling_capacity:  2,
            workplaces:         2,
            workplace_capacity: 1,
            static_workplaces:  1,
            world_size:         100.0,
            walk_speed:         1000.0,
            paths_per_tick:     1,
            tasks_per_tick:     1,
            day_start_hour:     6,
            night_start_hour:   20,
        }
    }

    fn world() -> ColonyWorld {
        ColonyWorld::new(config(), &mut SimRng::new(7)).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let mut c = config();
        c.static_workplaces = 5;
        assert!(matches!(c.validate(), Err(BehaviorError::Config(_))));

        let mut c = config();
        c.night_start_hour = c.day_start_hour;
        assert!(c.validate().is_err());
    }

    #[test]
    fn one_citizen_per_configured_agent() {
        let w = world();
        assert_eq!(w.citizen_count(), config().citizens);
        assert_eq!(w.summary().housed, 0);
    }

    #[test]
    fn dwellings_fill_up() {
        let w = world();
        assert!(w.assign_dwelling(AgentId(0)));
        assert!(w.assign_dwelling(AgentId(1)));
        assert!(!w.assign_dwelling(AgentId(2)));
        assert!(w.has_dwelling(AgentId(1)));
        assert!(!w.has_dwelling(AgentId(2)));
        assert!(w.dwelling_position(AgentId(2)).is_none());
    }

    #[test]
    fn first_job_is_static() {
        let w = world();
        assert!(w.assign_job(AgentId(0)));
        assert!(w.assign_job(AgentId(1)));
        assert!(w.has_static_job(AgentId(0)));
        assert!(!w.has_static_job(AgentId(1)));
        assert!(w.has_job(AgentId(1)));
    }

    #[test]
    fn path_requests_respect_budget() {
        let mut w = world();
        let mut rng = SimRng::new(1);
        w.request_random_path(AgentId(0));
        w.request_path_to_task_giver(AgentId(1));
        assert!(!w.has_path(AgentId(0)));

        assert_eq!(w.service_paths(&mut rng), 1);
        assert!(w.has_path(AgentId(0)));
        assert!(!w.has_path(AgentId(1)));
        assert_eq!(w.summary().pending_paths, 1);

        // Walk speed covers the whole map in one step.
        assert!(!w.is_at_destination(AgentId(0)));
        w.follow_path(AgentId(0));
        assert!(w.is_at_destination(AgentId(0)));
        assert!(!w.has_path(AgentId(0)));
    }

    #[test]
    fn hauling_counts_deliveries() {
        let w = world();
        assert!(!w.request_inventory_task(AgentId(0)));
        w.post_tasks();
        assert!(w.request_inventory_task(AgentId(0)));
        assert!(!w.request_inventory_task(AgentId(1)));

        w.put_resource(AgentId(0));
        assert_eq!(w.summary().deliveries, 0);
        w.take_resource(AgentId(0));
        w.put_resource(AgentId(0));
        assert_eq!(w.summary().deliveries, 1);
    }

    #[test]
    fn day_follows_hour() {
        let w = world();
        w.set_hour(5);
        assert!(w.is_night_time());
        w.set_hour(6);
        assert!(w.is_day_time());
        w.set_hour(20);
        assert!(!w.is_day_time());
    }
}
