#![doc(test(attr(deny(warnings))))]

//! Ballet Core models a dance-school back office: branches, guardians with
//! debt wallets, students with tuition history and a branch cash-flow
//! ledger, plus the shell used to operate it.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod seed;
pub mod utils;

pub use crate::core::AppState;
pub use crate::errors::SchoolError;

/// Installs the stderr tracing subscriber. Repeated calls are ignored.
pub fn init() {
    utils::init_tracing();
    tracing::debug!(
        version = %utils::build_info::current().short(),
        "Ballet Core starting"
    );
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_can_run_twice() {
        super::init();
        super::init();
    }
}
