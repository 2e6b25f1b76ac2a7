// 8.0: pool orchestration. each file adds an impl block to Pool:
// guards first, pure planning second, ledger settlement and state commit last.
// a rejected call leaves reserves, shares, ledger and event log untouched.

mod admin;
mod config;
mod core;
mod liquidity;
mod queries;
mod results;
mod swap;

pub use config::PoolRuntimeConfig;
pub use core::Pool;
pub use results::{AddLiquidityResult, PoolError, RemoveLiquidityResult, SwapResult};
