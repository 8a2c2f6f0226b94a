//! Warden command implementations

pub mod check;
pub mod login;
pub mod lookup;
