use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Kinds of change reported to observers. One commit may set several bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Action: u8 {
        /// The object id did not exist before this commit.
        const CREATE       = 0b0000_0001;
        /// The object was removed; the snapshot is the last committed state.
        const DESTROY      = 0b0000_0010;
        /// One or more shape-local poses changed.
        const MOVE_SHAPE   = 0b0000_0100;
        const ADD_SHAPE    = 0b0000_1000;
        const REMOVE_SHAPE = 0b0001_0000;
        /// The object pose in the world frame changed.
        const MOVE_OBJECT  = 0b0010_0000;
        /// The subframe map was replaced.
        const SUBFRAMES    = 0b0100_0000;
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        bitflags::parser::to_writer(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_distinct() {
        let all = [
            Action::CREATE,
            Action::DESTROY,
            Action::MOVE_SHAPE,
            Action::ADD_SHAPE,
            Action::REMOVE_SHAPE,
            Action::MOVE_OBJECT,
            Action::SUBFRAMES,
        ];
        let combined = all.iter().fold(Action::empty(), |acc, a| acc | *a);
        assert_eq!(combined, Action::all());
        assert_eq!(combined.bits(), 0x7f);
    }

    #[test]
    fn object_move_is_not_shape_move() {
        assert!(!Action::MOVE_OBJECT.intersects(Action::MOVE_SHAPE));
    }

    #[test]
    fn display_lists_flags() {
        assert_eq!((Action::CREATE | Action::ADD_SHAPE).to_string(), "CREATE | ADD_SHAPE");
        assert_eq!(Action::empty().to_string(), "NONE");
    }
}
