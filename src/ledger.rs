// 9.0 ledger.rs: the external token ledger the pool settles against.
// the pool only needs transfer_from/transfer/balance_of plus a host-level revert,
// which is what an execution environment gives a contract when a call fails.
// InMemoryLedger is the mocked implementation used by tests and the simulator.

use crate::types::{Amount, HolderId, TokenId};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("{holder} holds {available} of {token}, needs {requested}")]
    InsufficientBalance {
        token: TokenId,
        holder: HolderId,
        requested: Amount,
        available: Amount,
    },

    #[error("{spender} may spend {allowed} of {owner}'s {token}, needs {requested}")]
    InsufficientAllowance {
        token: TokenId,
        owner: HolderId,
        spender: HolderId,
        requested: Amount,
        allowed: Amount,
    },

    #[error("{holder} rejected a transfer of {token}")]
    TransferRejected { token: TokenId, holder: HolderId },

    #[error("balance overflow for {holder} in {token}")]
    BalanceOverflow { token: TokenId, holder: HolderId },
}

pub trait TokenLedger {
    /// Opaque saved state used to undo a partially settled operation.
    type Snapshot;

    /// Pull `amount` of `token` from `owner` into `spender`'s account. Needs an allowance.
    fn transfer_from(
        &mut self,
        token: TokenId,
        owner: HolderId,
        spender: HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Push `amount` of `token` from `from` to `to`.
    fn transfer(
        &mut self,
        token: TokenId,
        from: HolderId,
        to: HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    fn balance_of(&self, token: TokenId, holder: HolderId) -> Amount;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// Runs `f` against the ledger and restores the ledger if it fails.
/// Either every transfer inside `f` lands or none does.
pub fn atomically<L, T, E>(ledger: &mut L, f: impl FnOnce(&mut L) -> Result<T, E>) -> Result<T, E>
where
    L: TokenLedger,
{
    let snapshot = ledger.snapshot();
    match f(ledger) {
        Ok(value) => Ok(value),
        Err(e) => {
            ledger.restore(snapshot);
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    balances: HashMap<(TokenId, HolderId), Amount>,
    allowances: HashMap<(TokenId, HolderId, HolderId), Amount>,
}

/// Balances and allowances kept in memory. Holders listed in `rejecting`
/// refuse incoming transfers, which lets tests force a settlement failure.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(TokenId, HolderId), Amount>,
    allowances: HashMap<(TokenId, HolderId, HolderId), Amount>,
    rejecting: Vec<HolderId>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tokens out of thin air. Test and simulator funding only.
    pub fn mint(&mut self, token: TokenId, holder: HolderId, amount: Amount) -> Result<(), LedgerError> {
        self.credit(token, holder, amount)
    }

    pub fn approve(&mut self, token: TokenId, owner: HolderId, spender: HolderId, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn allowance(&self, token: TokenId, owner: HolderId, spender: HolderId) -> Amount {
        self.allowances.get(&(token, owner, spender)).copied().unwrap_or(0)
    }

    pub fn reject_transfers_to(&mut self, holder: HolderId) {
        if !self.rejecting.contains(&holder) {
            self.rejecting.push(holder);
        }
    }

    pub fn accept_transfers_to(&mut self, holder: HolderId) {
        self.rejecting.retain(|h| *h != holder);
    }

    fn debit(&mut self, token: TokenId, holder: HolderId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(token, holder);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                token,
                holder,
                requested: amount,
                available,
            });
        }
        self.balances.insert((token, holder), available - amount);
        Ok(())
    }

    fn credit(&mut self, token: TokenId, holder: HolderId, amount: Amount) -> Result<(), LedgerError> {
        if self.rejecting.contains(&holder) {
            return Err(LedgerError::TransferRejected { token, holder });
        }
        let balance = self
            .balance_of(token, holder)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { token, holder })?;
        self.balances.insert((token, holder), balance);
        Ok(())
    }

    fn move_tokens(
        &mut self,
        token: TokenId,
        from: HolderId,
        to: HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if self.rejecting.contains(&to) {
            return Err(LedgerError::TransferRejected { token, holder: to });
        }
        if from == to {
            self.debit(token, from, amount)?;
            return self.credit(token, to, amount);
        }
        let to_balance = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { token, holder: to })?;
        self.debit(token, from, amount)?;
        self.balances.insert((token, to), to_balance);
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    type Snapshot = LedgerSnapshot;

    fn transfer_from(
        &mut self,
        token: TokenId,
        owner: HolderId,
        spender: HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(token, owner, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                token,
                owner,
                spender,
                requested: amount,
                allowed,
            });
        }
        self.move_tokens(token, owner, spender, amount)?;
        self.allowances.insert((token, owner, spender), allowed - amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        token: TokenId,
        from: HolderId,
        to: HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.move_tokens(token, from, to, amount)
    }

    fn balance_of(&self, token: TokenId, holder: HolderId) -> Amount {
        self.balances.get(&(token, holder)).copied().unwrap_or(0)
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self.balances.clone(),
            allowances: self.allowances.clone(),
        }
    }

    fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.balances = snapshot.balances;
        self.allowances = snapshot.allowances;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: TokenId = TokenId(1);
    const ALICE: HolderId = HolderId(1);
    const POOL: HolderId = HolderId(100);

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, ALICE, 1_000).unwrap();
        ledger.approve(TOKEN, ALICE, POOL, 600);

        ledger.transfer_from(TOKEN, ALICE, POOL, 400).unwrap();
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 600);
        assert_eq!(ledger.balance_of(TOKEN, POOL), 400);
        assert_eq!(ledger.allowance(TOKEN, ALICE, POOL), 200);

        let err = ledger.transfer_from(TOKEN, ALICE, POOL, 201).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { allowed: 200, .. }));
    }

    #[test]
    fn transfer_checks_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, POOL, 10).unwrap();

        let err = ledger.transfer(TOKEN, POOL, ALICE, 11).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { available: 10, .. }));
        assert_eq!(ledger.balance_of(TOKEN, POOL), 10);
    }

    #[test]
    fn rejecting_holder_refuses_credit() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, POOL, 10).unwrap();
        ledger.reject_transfers_to(ALICE);

        let err = ledger.transfer(TOKEN, POOL, ALICE, 5).unwrap_err();
        assert_eq!(err, LedgerError::TransferRejected { token: TOKEN, holder: ALICE });
        assert_eq!(ledger.balance_of(TOKEN, POOL), 10);

        ledger.accept_transfers_to(ALICE);
        ledger.transfer(TOKEN, POOL, ALICE, 5).unwrap();
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 5);
    }

    #[test]
    fn atomically_restores_on_failure() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, ALICE, 100).unwrap();
        ledger.approve(TOKEN, ALICE, POOL, 100);

        let result: Result<(), LedgerError> = atomically(&mut ledger, |l| {
            l.transfer_from(TOKEN, ALICE, POOL, 60)?;
            l.transfer(TOKEN, POOL, HolderId(2), 70)
        });

        assert!(result.is_err());
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 100);
        assert_eq!(ledger.balance_of(TOKEN, POOL), 0);
        assert_eq!(ledger.allowance(TOKEN, ALICE, POOL), 100);
    }
}
