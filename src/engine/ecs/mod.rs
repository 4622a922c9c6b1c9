// Minimal entity store: generational ids and sparse component storage
//
// Component sets and their teardown rules live with the game code that owns
// them; this module only knows about slots and generations.

mod entity;
mod storage;

pub use entity::{Entities, Entity};
pub use storage::Storage;
