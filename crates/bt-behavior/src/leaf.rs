//! Leaf evaluation: maps each leaf kind onto provider calls.
//!
//! | Leaf                     | Result                                            |
//! |--------------------------|---------------------------------------------------|
//! | `WaitForPath`            | Running until `has_path`                          |
//! | `MoveTo`                 | Success on arrival, else `follow_path` + Running  |
//! | `HasDwelling`, `HasJob`, `HasStaticJob`, `IsDayTime`, `IsNightTime` | query → Success / Fail |
//! | `SetDwelling`, `AssignJob` | Success iff the assignment was made             |
//! | `Enter*`, `Exit*`, `TakeResource`, `PutResource` | act, then Success         |
//! | `WaitDayTime`, `WaitNightTime` | Running until the phase arrives             |
//! | `AskInventoryTask`       | re-requests every tick; Running until granted     |
//! | `FindPathTo`             | enqueue the request, then Success                 |

use std::fmt;
use std::str::FromStr;

use bt_core::{AgentId, Status};
use bt_tree::{Destination, Leaf};

use crate::{ActionProvider, BehaviorError};

// ── StaticJobQuery ────────────────────────────────────────────────────────────

/// Which provider query answers a `HasStaticJob` leaf.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StaticJobQuery {
    /// Ask [`ActionProvider::has_static_job`].
    #[default]
    StaticJob,
    /// Ask [`ActionProvider::has_job`], so any job counts.
    AnyJob,
}

impl fmt::Display for StaticJobQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StaticJobQuery::StaticJob => "static_job",
            StaticJobQuery::AnyJob    => "any_job",
        })
    }
}

impl FromStr for StaticJobQuery {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "static_job" => Ok(StaticJobQuery::StaticJob),
            "any_job"    => Ok(StaticJobQuery::AnyJob),
            other => Err(BehaviorError::Config(format!(
                "invalid static-job query {other:?}: expected \"static_job\" or \"any_job\""
            ))),
        }
    }
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// Evaluate one visit of `leaf` for `agent`.
///
/// Pending leaves re-issue their action on every visit; the caller is
/// expected to visit a `Running` leaf again on the next tick.
pub fn evaluate_leaf<P: ActionProvider + ?Sized>(
    leaf:       Leaf,
    agent:      AgentId,
    provider:   &P,
    static_job: StaticJobQuery,
) -> Status {
    match leaf {
        Leaf::WaitForPath => running_until(provider.has_path(agent)),

        Leaf::MoveTo => {
            if provider.is_at_destination(agent) {
                Status::Success
            } else {
                provider.follow_path(agent);
                Status::Running
            }
        }

        Leaf::HasDwelling => Status::from_bool(provider.has_dwelling(agent)),
        Leaf::SetDwelling => Status::from_bool(provider.assign_dwelling(agent)),
        Leaf::EnterDwelling => act(|| provider.enter_dwelling(agent)),
        Leaf::ExitDwelling => act(|| provider.exit_dwelling(agent)),
        Leaf::EnterWorkingPlace => act(|| provider.enter_working_place(agent)),
        Leaf::ExitWorkingPlace => act(|| provider.exit_working_place(agent)),

        Leaf::HasJob => Status::from_bool(provider.has_job(agent)),
        Leaf::HasStaticJob => Status::from_bool(match static_job {
            StaticJobQuery::StaticJob => provider.has_static_job(agent),
            StaticJobQuery::AnyJob => provider.has_job(agent),
        }),
        Leaf::AssignJob => Status::from_bool(provider.assign_job(agent)),

        Leaf::IsDayTime => Status::from_bool(provider.is_day_time()),
        Leaf::IsNightTime => Status::from_bool(provider.is_night_time()),
        Leaf::WaitDayTime => running_until(provider.is_day_time()),
        Leaf::WaitNightTime => running_until(provider.is_night_time()),

        Leaf::AskInventoryTask => running_until(provider.request_inventory_task(agent)),
        Leaf::TakeResource => act(|| provider.take_resource(agent)),
        Leaf::PutResource => act(|| provider.put_resource(agent)),

        Leaf::FindPathTo(destination) => request_path(destination, agent, provider),
    }
}

/// Enqueue the path request for `destination`.  Fails only when the target
/// building is unknown (no dwelling / working place assigned).
fn request_path<P: ActionProvider + ?Sized>(destination: Destination, agent: AgentId, provider: &P) -> Status {
    match destination {
        Destination::Random => provider.request_random_path(agent),
        Destination::Dwelling => match provider.dwelling_position(agent) {
            Some(target) => provider.request_path_to(agent, target),
            None => return Status::Fail,
        },
        Destination::WorkingPlace => match provider.working_place_position(agent) {
            Some(target) => provider.request_path_to(agent, target),
            None => return Status::Fail,
        },
        Destination::InventoryTaskGiver => provider.request_path_to_task_giver(agent),
        Destination::InventoryTaskReceiver => provider.request_path_to_task_receiver(agent),
    }
    Status::Success
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[inline]
fn running_until(done: bool) -> Status {
    if done { Status::Success } else { Status::Running }
}

#[inline]
fn act(action: impl FnOnce()) -> Status {
    action();
    Status::Success
}
