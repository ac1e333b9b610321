//! Node status and traversal flow direction.

use std::fmt;

/// Result reported by the node the cursor last evaluated.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Success,
    Fail,
    /// Not settled yet.  Also the initial value of a fresh execution state.
    #[default]
    Running,
}

impl Status {
    /// `true` for `Success` and `Fail`.
    #[inline]
    pub fn is_settled(self) -> bool {
        !matches!(self, Status::Running)
    }

    /// Map a boolean query answer onto `Success` / `Fail`.
    #[inline]
    pub fn from_bool(ok: bool) -> Status {
        if ok { Status::Success } else { Status::Fail }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Fail    => "fail",
            Status::Running => "running",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction the cursor travelled to reach its current node.
///
/// `Down` means the node was just entered and has no child result yet; `Up`
/// means control is returning into the node carrying a child's result.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flow {
    #[default]
    Down,
    Up,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flow::Down => "down",
            Flow::Up   => "up",
        })
    }
}
