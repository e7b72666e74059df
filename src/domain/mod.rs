pub mod entity;
pub mod grid;
pub mod inventory;
pub mod path;
pub mod task;
pub mod tile;
