//! The grind activities: mine, fish, explore, rob and hunt.

pub mod explore;
pub mod fish;
pub mod hunt;
pub mod mine;
pub mod rob;
