//! The system interface the world schedules each frame.

use arena_core::enums::ComponentKind;
use arena_core::types::EntityId;

use crate::world::World;

/// Run order of the built-in systems. Lower runs first.
pub mod priority {
    pub const PLAYER_CONTROL: i32 = 0;
    pub const MOVEMENT: i32 = 10;
    pub const STATUS_EFFECT: i32 = 15;
    pub const AI: i32 = 15;
    pub const COLLISION: i32 = 20;
    pub const FIRING: i32 = 25;
    pub const BULLET: i32 = 30;
    pub const BOUNDARY: i32 = 30;
    pub const DEATH: i32 = 35;
    pub const GAME_STATE: i32 = 90;
}

/// One unit of per-frame behavior.
///
/// The world calls [`System::update`] once per frame, in ascending priority
/// order, with the active entities that hold every kind listed by
/// [`System::required_components`]. Systems may create, destroy and mutate
/// entities through the world they are handed.
pub trait System: Send {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], delta: f32);
}
