pub mod event;
pub mod game;
pub mod maze;
pub mod session;
