//! Creator earnings ledger and payout rules.
//!
//! Revenue and payouts share one ledger of signed cent amounts: revenue rows
//! are positive, payout rows negative. Balances are always recomputed from
//! the ledger rather than stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TransactionId, UnknownStatusError, UserId};

/// Default smallest payout, in cents ($100).
pub const DEFAULT_PAYOUT_MINIMUM_CENTS: i64 = 10_000;
/// Largest single revenue credit, in cents ($1,000,000,000).
pub const MAX_REVENUE_CENTS: i64 = 100_000_000_000;

/// Direction of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Earnings credited to the creator.
    Revenue,
    /// Money paid out to the creator.
    Payout,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "REVENUE",
            Self::Payout => "PAYOUT",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REVENUE" => Ok(Self::Revenue),
            "PAYOUT" => Ok(Self::Payout),
            _ => Err(UnknownStatusError::new("transaction kind", s)),
        }
    }
}

/// Settlement state of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Awaiting settlement; pending payouts reserve balance.
    Pending,
    /// Settled and counted towards the balance.
    Completed,
    /// Abandoned; ignored by the balance.
    Failed,
}

impl TransactionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(UnknownStatusError::new("transaction", s)),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the earnings ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    /// Row identifier.
    pub id: TransactionId,
    /// Creator the row belongs to.
    pub user_id: UserId,
    /// Revenue credit or payout debit.
    pub kind: TransactionKind,
    /// Signed amount in cents; negative for payouts.
    pub amount_cents: i64,
    /// Settlement state.
    pub status: TransactionStatus,
    /// Free-text note shown in the creator's history.
    pub description: Option<String>,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// Balance derived from a user's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerBalance {
    /// Sum of completed revenue.
    pub completed_revenue_cents: i64,
    /// Sum of completed payouts, as a positive number.
    pub completed_payout_cents: i64,
    /// Sum of payouts still awaiting settlement, as a positive number.
    pub pending_payout_cents: i64,
}

impl LedgerBalance {
    /// Fold a user's ledger rows into a balance. Failed rows are ignored.
    ///
    /// Sums saturate at the `i64` bounds instead of overflowing.
    #[must_use]
    pub fn from_transactions<'a>(rows: impl IntoIterator<Item = &'a LedgerTransaction>) -> Self {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            match (row.kind, row.status) {
                (TransactionKind::Revenue, TransactionStatus::Completed) => {
                    acc.completed_revenue_cents =
                        acc.completed_revenue_cents.saturating_add(row.amount_cents);
                }
                (TransactionKind::Payout, TransactionStatus::Completed) => {
                    acc.completed_payout_cents = acc
                        .completed_payout_cents
                        .saturating_add(row.amount_cents.saturating_abs());
                }
                (TransactionKind::Payout, TransactionStatus::Pending) => {
                    acc.pending_payout_cents = acc
                        .pending_payout_cents
                        .saturating_add(row.amount_cents.saturating_abs());
                }
                _ => {}
            }
            acc
        })
    }

    /// Completed revenue minus completed payouts.
    #[must_use]
    pub const fn available_cents(&self) -> i64 {
        self.completed_revenue_cents
            .saturating_sub(self.completed_payout_cents)
    }

    /// Available balance not already reserved by pending payouts.
    #[must_use]
    pub const fn requestable_cents(&self) -> i64 {
        self.available_cents()
            .saturating_sub(self.pending_payout_cents)
    }
}

/// Why a payout request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayoutRejection {
    /// Amount is under the configured minimum.
    #[error("Minimum payout amount is {}", format_dollars(.minimum_cents))]
    BelowMinimum { minimum_cents: i64 },
    /// Amount exceeds what the balance allows once pending payouts are
    /// reserved.
    #[error("Insufficient balance")]
    InsufficientBalance { requestable_cents: i64 },
}

fn format_dollars(cents: &i64) -> String {
    let (dollars, rest) = (cents / 100, cents % 100);
    if rest == 0 {
        format!("${dollars}")
    } else {
        format!("${dollars}.{:02}", rest.abs())
    }
}

/// Payout acceptance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutPolicy {
    minimum_cents: i64,
}

impl Default for PayoutPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PAYOUT_MINIMUM_CENTS)
    }
}

impl PayoutPolicy {
    #[must_use]
    pub const fn new(minimum_cents: i64) -> Self {
        Self { minimum_cents }
    }

    #[must_use]
    pub const fn minimum_cents(&self) -> i64 {
        self.minimum_cents
    }

    /// Decide whether `amount_cents` may be paid out from `balance`.
    ///
    /// The minimum is checked first, so small requests are refused whatever
    /// the balance.
    ///
    /// # Errors
    /// Returns the [`PayoutRejection`] that applies.
    ///
    /// # Examples
    /// ```
    /// use vidhub::domain::{LedgerBalance, PayoutPolicy, PayoutRejection};
    ///
    /// let balance = LedgerBalance { completed_revenue_cents: 50_000, ..LedgerBalance::default() };
    /// let policy = PayoutPolicy::default();
    /// assert!(policy.evaluate(&balance, 20_000).is_ok());
    /// assert!(matches!(
    ///     policy.evaluate(&balance, 5_000),
    ///     Err(PayoutRejection::BelowMinimum { .. })
    /// ));
    /// ```
    pub fn evaluate(&self, balance: &LedgerBalance, amount_cents: i64) -> Result<(), PayoutRejection> {
        if amount_cents < self.minimum_cents {
            return Err(PayoutRejection::BelowMinimum {
                minimum_cents: self.minimum_cents,
            });
        }
        let requestable_cents = balance.requestable_cents();
        if amount_cents > requestable_cents {
            return Err(PayoutRejection::InsufficientBalance { requestable_cents });
        }
        Ok(())
    }
}

/// Result of an atomic payout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutOutcome {
    /// A pending payout row was recorded.
    Accepted(LedgerTransaction),
    /// Nothing was written.
    Rejected(PayoutRejection),
}

/// Validated revenue credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueDraft {
    pub user_id: UserId,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// Raised when a revenue credit amount is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RevenueAmountError {
    #[error("revenue amount must be positive")]
    NonPositive,
    #[error("revenue amount must not exceed {}", format_dollars(&MAX_REVENUE_CENTS))]
    TooLarge,
}

impl RevenueDraft {
    /// Validate a revenue credit.
    ///
    /// # Errors
    /// Returns [`RevenueAmountError`] for zero, negative or amounts above
    /// [`MAX_REVENUE_CENTS`].
    pub fn new(
        user_id: UserId,
        amount_cents: i64,
        description: Option<&str>,
    ) -> Result<Self, RevenueAmountError> {
        if amount_cents <= 0 {
            return Err(RevenueAmountError::NonPositive);
        }
        if amount_cents > MAX_REVENUE_CENTS {
            return Err(RevenueAmountError::TooLarge);
        }
        Ok(Self {
            user_id,
            amount_cents,
            description: description
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
        })
    }
}

/// Balance plus ledger history returned to creators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutSummary {
    pub balance: LedgerBalance,
    /// Newest first.
    pub transactions: Vec<LedgerTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn row(kind: TransactionKind, amount_cents: i64, status: TransactionStatus) -> LedgerTransaction {
        LedgerTransaction {
            id: TransactionId::random(),
            user_id: UserId::from_uuid(uuid::Uuid::nil()),
            kind,
            amount_cents,
            status,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[fixture]
    fn ledger() -> Vec<LedgerTransaction> {
        vec![
            row(TransactionKind::Revenue, 30_000, TransactionStatus::Completed),
            row(TransactionKind::Revenue, 5_000, TransactionStatus::Pending),
            row(TransactionKind::Payout, -10_000, TransactionStatus::Completed),
            row(TransactionKind::Payout, -12_000, TransactionStatus::Failed),
            row(TransactionKind::Payout, -4_000, TransactionStatus::Pending),
        ]
    }

    #[rstest]
    fn balance_counts_only_completed_rows(ledger: Vec<LedgerTransaction>) {
        let balance = LedgerBalance::from_transactions(&ledger);
        assert_eq!(balance.available_cents(), 20_000);
        assert_eq!(balance.pending_payout_cents, 4_000);
        assert_eq!(balance.requestable_cents(), 16_000);
    }

    #[rstest]
    fn over_balance_is_insufficient(ledger: Vec<LedgerTransaction>) {
        let balance = LedgerBalance::from_transactions(&ledger);
        let err = PayoutPolicy::default()
            .evaluate(&balance, 16_001)
            .expect_err("exceeds requestable");
        assert_eq!(err.to_string(), "Insufficient balance");
    }

    #[rstest]
    #[case(0)]
    #[case(9_999)]
    fn under_minimum_is_rejected_regardless_of_balance(#[case] amount: i64) {
        let rich = LedgerBalance {
            completed_revenue_cents: 1_000_000,
            ..LedgerBalance::default()
        };
        let err = PayoutPolicy::default()
            .evaluate(&rich, amount)
            .expect_err("below minimum");
        assert_eq!(err.to_string(), "Minimum payout amount is $100");
    }

    #[rstest]
    fn exact_requestable_amount_is_accepted(ledger: Vec<LedgerTransaction>) {
        let balance = LedgerBalance::from_transactions(&ledger);
        assert_eq!(PayoutPolicy::new(1_000).evaluate(&balance, 16_000), Ok(()));
    }

    #[rstest]
    #[case(10_000, "$100")]
    #[case(2_550, "$25.50")]
    fn formats_minimum_in_dollars(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(format_dollars(&cents), expected);
    }

    #[rstest]
    #[case(0, RevenueAmountError::NonPositive)]
    #[case(-5, RevenueAmountError::NonPositive)]
    #[case(MAX_REVENUE_CENTS + 1, RevenueAmountError::TooLarge)]
    #[case(i64::MAX, RevenueAmountError::TooLarge)]
    fn revenue_amount_must_be_in_range(#[case] amount: i64, #[case] expected: RevenueAmountError) {
        assert_eq!(RevenueDraft::new(UserId::random(), amount, None), Err(expected));
    }

    #[rstest]
    fn largest_revenue_credit_is_accepted() {
        let draft = RevenueDraft::new(UserId::random(), MAX_REVENUE_CENTS, Some("  "))
            .expect("within range");
        assert_eq!(draft.description, None);
    }

    #[rstest]
    fn oversized_ledger_saturates_instead_of_overflowing() {
        let rows = [
            row(TransactionKind::Revenue, i64::MAX, TransactionStatus::Completed),
            row(TransactionKind::Revenue, i64::MAX, TransactionStatus::Completed),
            row(TransactionKind::Payout, i64::MIN, TransactionStatus::Pending),
            row(TransactionKind::Payout, i64::MIN, TransactionStatus::Pending),
        ];
        let balance = LedgerBalance::from_transactions(&rows);
        assert_eq!(balance.completed_revenue_cents, i64::MAX);
        assert_eq!(balance.pending_payout_cents, i64::MAX);
        assert_eq!(balance.requestable_cents(), 0);

        let debt = LedgerBalance {
            completed_payout_cents: i64::MAX,
            pending_payout_cents: i64::MAX,
            ..LedgerBalance::default()
        };
        assert_eq!(debt.requestable_cents(), i64::MIN);
    }
}
