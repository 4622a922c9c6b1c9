// Engine modules: entity store, physics, input, offscreen rendering

pub mod ecs;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod renderer;
