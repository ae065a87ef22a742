//! Credit ledger primitives and the decision unit of work.
//!
//! A [`DecisionUnitOfWork`] describes every write an owner decision needs:
//! the guarded status change and, for approvals, a single-credit
//! [`CreditTransfer`]. Persistence adapters must apply it all-or-nothing.

use super::{Credits, Decision, ExchangeRequest, RequestId, RequestStatus, TransitionError, UserId};

/// Credits moved from requester to owner when a request is approved.
pub const TRANSFER_AMOUNT: i32 = 1;

/// A balance movement between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditTransfer {
    from: UserId,
    to: UserId,
    amount: i32,
}

impl CreditTransfer {
    /// Transfer of [`TRANSFER_AMOUNT`] from `from` to `to`.
    pub const fn single(from: UserId, to: UserId) -> Self {
        Self {
            from,
            to,
            amount: TRANSFER_AMOUNT,
        }
    }

    /// Debited user.
    pub const fn debtor(&self) -> UserId {
        self.from
    }

    /// Credited user.
    pub const fn creditor(&self) -> UserId {
        self.to
    }

    /// Number of credits moved.
    pub const fn amount(&self) -> i32 {
        self.amount
    }

    /// Both parties in ascending identifier order.
    ///
    /// Adapters lock rows in this order so two transfers touching the same
    /// pair of users can never deadlock on each other.
    pub fn lock_order(&self) -> [UserId; 2] {
        if self.from <= self.to {
            [self.from, self.to]
        } else {
            [self.to, self.from]
        }
    }

    /// Balance change applied to `user` by this transfer.
    pub fn delta_for(&self, user: UserId) -> i32 {
        if user == self.from {
            -self.amount
        } else if user == self.to {
            self.amount
        } else {
            0
        }
    }

    /// Apply the transfer to the two current balances.
    ///
    /// Returns `None` when either balance would leave the `i32` range; the
    /// whole decision must then be abandoned.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{CreditTransfer, Credits, UserId};
    ///
    /// let transfer = CreditTransfer::single(UserId::random(), UserId::random());
    /// let (from, to) = transfer.apply(Credits::new(1), Credits::new(10)).unwrap();
    /// assert_eq!((from.value(), to.value()), (0, 11));
    /// assert!(transfer.apply(Credits::new(1), Credits::new(i32::MAX)).is_none());
    /// ```
    pub const fn apply(
        &self,
        from_balance: Credits,
        to_balance: Credits,
    ) -> Option<(Credits, Credits)> {
        match (
            from_balance.checked_minus(self.amount),
            to_balance.checked_plus(self.amount),
        ) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }
}

/// Every write required to commit one owner decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionUnitOfWork {
    request_id: RequestId,
    decision: Decision,
    transfer: Option<CreditTransfer>,
}

impl DecisionUnitOfWork {
    /// Plan the decision for `request` on a resource owned by `owner_id`.
    ///
    /// Fails when the request has already left `pending`. Adapters re-check
    /// the pending guard atomically when committing, since the request may
    /// be decided concurrently between planning and commit.
    pub fn prepare(
        request: &ExchangeRequest,
        owner_id: UserId,
        decision: Decision,
    ) -> Result<Self, TransitionError> {
        request.status.apply(decision)?;
        let transfer = decision
            .transfers_credit()
            .then(|| CreditTransfer::single(request.requester_id, owner_id));
        Ok(Self {
            request_id: request.id,
            decision,
            transfer,
        })
    }

    /// Request being decided.
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Owner's choice.
    pub const fn decision(&self) -> Decision {
        self.decision
    }

    /// Status the request must be in for the commit to proceed.
    pub const fn expected_status(&self) -> RequestStatus {
        RequestStatus::Pending
    }

    /// Status written by the commit.
    pub const fn new_status(&self) -> RequestStatus {
        self.decision.target_status()
    }

    /// Ledger movement, present only for approvals.
    pub const fn transfer(&self) -> Option<&CreditTransfer> {
        self.transfer.as_ref()
    }
}
