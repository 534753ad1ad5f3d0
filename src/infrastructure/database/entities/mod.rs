//! Database entities

pub mod parking_log;
