// 1.0: all the primitives live here. nothing in the pool works without these types.
// holder and token ids, asset sides, basis points, timestamps, the 256-bit intermediate.
// each id is a newtype so the compiler catches type mixups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for intermediate products of two amounts.
    pub struct U256(4);
}

/// Token amount in the asset's smallest indivisible unit.
pub type Amount = u128;

/// Identity of anything that can hold tokens or shares: traders, LPs, the pool itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HolderId(pub u64);

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "holder#{}", self.0)
    }
}

/// Identity of a fungible token on the external ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token#{}", self.0)
    }
}

// 1.1: which of the two reserves. Asset0 pairs with token0, Asset1 with token1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Asset0,
    Asset1,
}

impl Asset {
    pub fn opposite(&self) -> Self {
        match self {
            Asset::Asset0 => Asset::Asset1,
            Asset::Asset1 => Asset::Asset0,
        }
    }
}

// 1.2: the ordered token pair a pool is created for. tokens must differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token0: TokenId,
    pub token1: TokenId,
}

impl TokenPair {
    #[must_use]
    pub fn new(token0: TokenId, token1: TokenId) -> Option<Self> {
        if token0 == token1 {
            None
        } else {
            Some(Self { token0, token1 })
        }
    }

    pub fn token(&self, asset: Asset) -> TokenId {
        match asset {
            Asset::Asset0 => self.token0,
            Asset::Asset1 => self.token1,
        }
    }

    pub fn asset_of(&self, token: TokenId) -> Option<Asset> {
        if token == self.token0 {
            Some(Asset::Asset0)
        } else if token == self.token1 {
            Some(Asset::Asset1)
        } else {
            None
        }
    }
}

// 1.3: basis points. 100 bps = 1%, 10_000 bps = 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Bps(u16);

impl Bps {
    pub const SCALE: u16 = 10_000;

    pub const fn new(bps: u16) -> Self {
        Self(bps)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Remaining fraction in bps: 30 bps fee -> 9970.
    pub fn complement(&self) -> u16 {
        Self::SCALE.saturating_sub(self.0)
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

// 1.4: millisecond timestamp. deadlines are expressed in the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1_000))
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn plus_millis(&self, ms: i64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
