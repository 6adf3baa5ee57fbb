//! This module acts as a central hub for all database-related logic.
//! It declares the specialized submodules so they can be accessed from
//! elsewhere in the application via their full path, e.g.
//! `database::ledger::get_or_create_account`.

pub mod config;
pub mod init;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod shop;
