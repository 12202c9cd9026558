//! Command implementations for the whitepoint CLI.

mod adapt;
mod balance;
mod inspect;

pub use adapt::{cmd_adapt, AdaptOptions};
pub use balance::{cmd_balance, BalanceOptions};
pub use inspect::{cmd_inspect, InspectOptions};
