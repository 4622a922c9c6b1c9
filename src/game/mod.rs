// Game modules

pub mod splitter;
