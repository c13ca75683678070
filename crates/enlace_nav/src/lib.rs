pub mod gate;
pub mod menu;
pub mod prune;
