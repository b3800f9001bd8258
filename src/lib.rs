pub mod base;
pub mod board;
pub mod hierarchy;
pub mod sim;
