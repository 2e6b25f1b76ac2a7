// cpamm-core: two-asset constant-product liquidity pool.
// solvency-first: every operation validates and prices before anything moves,
// and settles against the token ledger as one all-or-nothing step.
// integer-only settlement math, deterministic given the ledger and clock.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: HolderId, TokenId, Asset, Bps, Timestamp, U256
//   2.x  math.rs: checked u128 math with 256-bit intermediates, isqrt
//   3.x  state.rs: reserves, share supply, share balances
//   4.x  liquidity.rs: share mint and burn planning
//   5.x  swap.rs: constant product pricing, quotes
//   6.x  fees.rs: protocol fee rate and recipient
//   7.x  guard.rs: deadline, token, pause and controller checks
//   7.5  config.rs: pool configuration and fee tier presets
//   8.x  pool/: pool orchestration: liquidity, swaps, admin, queries
//   9.x  ledger.rs: token ledger interface + in-memory ledger
//   9.1  clock.rs: time source
//   10.x shared.rs: lock-guarded pool handle
//   11.x events.rs: committed state change events

// core pool modules
pub mod liquidity;
pub mod math;
pub mod pool;
pub mod state;
pub mod swap;
pub mod types;

// policy and safety modules
pub mod config;
pub mod fees;
pub mod guard;

// integration modules
pub mod clock;
pub mod events;
pub mod ledger;
pub mod shared;

// re exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DepositPolicy, PoolConfig, DEFAULT_TRADING_FEE_BPS};
pub use events::*;
pub use fees::{FeeController, MAX_PROTOCOL_FEE_BPS};
pub use guard::AccessControl;
pub use ledger::{atomically, InMemoryLedger, LedgerError, TokenLedger};
pub use liquidity::{BurnPlan, MintPlan};
pub use math::MathError;
pub use pool::{AddLiquidityResult, Pool, PoolError, PoolRuntimeConfig, RemoveLiquidityResult, SwapResult};
pub use shared::SharedPool;
pub use state::{InvariantViolation, PoolState};
pub use swap::SwapQuote;
pub use types::*;
