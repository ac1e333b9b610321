//! A provider for a world where nothing ever happens.

use bt_core::{AgentId, Position};

use crate::ActionProvider;

/// An [`ActionProvider`] that answers `false` to every query, has no
/// positions, and ignores every action.
///
/// Useful as a placeholder in tests and benchmarks: a tree ticked against it
/// exercises the interpreter without any world-side cost.  Note that
/// `WaitForPath`, `MoveTo` and `AskInventoryTask` leaves never finish under
/// it, and it is always night.
pub struct NoopProvider;

impl ActionProvider for NoopProvider {
    fn has_path(&self, _agent: AgentId) -> bool {
        false
    }
    fn is_at_destination(&self, _agent: AgentId) -> bool {
        false
    }
    fn follow_path(&self, _agent: AgentId) {}
    fn request_random_path(&self, _agent: AgentId) {}
    fn request_path_to(&self, _agent: AgentId, _target: Position) {}
    fn request_path_to_task_giver(&self, _agent: AgentId) {}
    fn request_path_to_task_receiver(&self, _agent: AgentId) {}
    fn dwelling_position(&self, _agent: AgentId) -> Option<Position> {
        None
    }
    fn working_place_position(&self, _agent: AgentId) -> Option<Position> {
        None
    }
    fn has_dwelling(&self, _agent: AgentId) -> bool {
        false
    }
    fn assign_dwelling(&self, _agent: AgentId) -> bool {
        false
    }
    fn enter_dwelling(&self, _agent: AgentId) {}
    fn exit_dwelling(&self, _agent: AgentId) {}
    fn enter_working_place(&self, _agent: AgentId) {}
    fn exit_working_place(&self, _agent: AgentId) {}
    fn has_job(&self, _agent: AgentId) -> bool {
        false
    }
    fn has_static_job(&self, _agent: AgentId) -> bool {
        false
    }
    fn assign_job(&self, _agent: AgentId) -> bool {
        false
    }
    fn is_day_time(&self) -> bool {
        false
    }
    fn request_inventory_task(&self, _agent: AgentId) -> bool {
        false
    }
    fn take_resource(&self, _agent: AgentId) {}
    fn put_resource(&self, _agent: AgentId) {}
}
