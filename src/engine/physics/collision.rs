use rapier2d::prelude::*;

/// Collision groups for filtering what objects can collide with each other
/// and what the slicing queries may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Floor and walls, never sliced
    Level = 0b0000_0010,

    /// Bodies the user can slice or pick
    Grabbable = 0b0000_0100,
}

impl CollisionGroups {
    /// Group bit alone, for query filters
    pub fn memberships(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            // Level pieces overlap each other at the corners
            CollisionGroups::Level => Group::from_bits_truncate(
                CollisionGroups::Default as u32 | CollisionGroups::Grabbable as u32,
            ),
            CollisionGroups::Grabbable | CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(self.memberships(), filter)
    }
}
