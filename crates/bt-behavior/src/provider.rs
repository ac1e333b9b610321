//! The `ActionProvider` trait: the engine's only window onto the world.

use bt_core::{AgentId, Position};

/// World-side capabilities the leaves call into.
///
/// Implemented by the host simulation (building occupancy, jobs, inventory,
/// pathfinding, the day/night clock).  Every per-agent call is keyed by the
/// agent's `AgentId`.
///
/// # Asynchronous pathfinding
///
/// The `request_*` methods only enqueue work.  A tree polls for the result
/// with a `WaitForPath` leaf ([`has_path`](Self::has_path)) and then walks it
/// with a `MoveTo` leaf, which calls [`follow_path`](Self::follow_path) on
/// every tick until [`is_at_destination`](Self::is_at_destination) holds.
///
/// # Thread safety
///
/// With the `parallel` feature the runner ticks many agents at once, so
/// implementations must be `Send + Sync` and synchronise their own state
/// (atomics, per-agent locks, or a request queue behind a `Mutex`).  Calls
/// for one agent never overlap each other.
pub trait ActionProvider: Send + Sync + 'static {
    // ── Paths ─────────────────────────────────────────────────────────────

    /// A previously requested path has been computed and is ready to follow.
    fn has_path(&self, agent: AgentId) -> bool;

    fn is_at_destination(&self, agent: AgentId) -> bool;

    /// Advance the agent along its current path.  Called once per tick while
    /// a `MoveTo` leaf is pending.
    fn follow_path(&self, agent: AgentId);

    fn request_random_path(&self, agent: AgentId);

    fn request_path_to(&self, agent: AgentId, target: Position);

    fn request_path_to_task_giver(&self, agent: AgentId);

    fn request_path_to_task_receiver(&self, agent: AgentId);

    /// Where the agent's dwelling is, if it has one.
    fn dwelling_position(&self, agent: AgentId) -> Option<Position>;

    /// Where the agent's working place is, if it has one.
    fn working_place_position(&self, agent: AgentId) -> Option<Position>;

    // ── Dwelling ──────────────────────────────────────────────────────────

    fn has_dwelling(&self, agent: AgentId) -> bool;

    /// Try to give the agent a dwelling.  `true` if one was assigned.
    fn assign_dwelling(&self, agent: AgentId) -> bool;

    fn enter_dwelling(&self, agent: AgentId);

    fn exit_dwelling(&self, agent: AgentId);

    // ── Work ──────────────────────────────────────────────────────────────

    fn enter_working_place(&self, agent: AgentId);

    fn exit_working_place(&self, agent: AgentId);

    fn has_job(&self, agent: AgentId) -> bool;

    /// The agent's job is tied to a fixed working place.
    fn has_static_job(&self, agent: AgentId) -> bool;

    /// Try to give the agent a job.  `true` if one was assigned.
    fn assign_job(&self, agent: AgentId) -> bool;

    // ── Clock ─────────────────────────────────────────────────────────────

    fn is_day_time(&self) -> bool;

    /// Defaults to "not day".
    fn is_night_time(&self) -> bool {
        !self.is_day_time()
    }

    // ── Inventory tasks ───────────────────────────────────────────────────

    /// Ask for a hauling task.  `true` once the agent holds one.
    fn request_inventory_task(&self, agent: AgentId) -> bool;

    /// Pick up the task's resource from the giver.
    fn take_resource(&self, agent: AgentId);

    /// Drop the carried resource at the receiver.
    fn put_resource(&self, agent: AgentId);
}
