use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::time_utils::YearMonth;

/// One membership payment read from the input export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date of the payment.
    pub date: NaiveDate,
    /// Member identifier (the "Triber Username" column).
    pub username: String,
    /// Price paid, exact decimal.
    pub price: Decimal,
    /// Subscription tier name.
    pub tier: String,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        username: impl Into<String>,
        price: Decimal,
        tier: impl Into<String>,
    ) -> Self {
        Self {
            date,
            username: username.into(),
            price,
            tier: tier.into(),
        }
    }

    /// Month the payment falls in.
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}

/// A twelve-month commitment inferred from a payment above the tier minimum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnualSubscription {
    pub start_month: YearMonth,
    pub username: String,
    pub tier: String,
}

/// Number of months an annual subscription covers, start month included.
pub const ANNUAL_TERM_MONTHS: u32 = 12;

impl AnnualSubscription {
    /// The months after `start_month` the subscription is projected into.
    ///
    /// Yields `start_month + 1` through `start_month + 11`; the start month
    /// itself is observed directly and never part of the projection.
    pub fn projected_months(&self) -> impl Iterator<Item = YearMonth> + '_ {
        (1..ANNUAL_TERM_MONTHS).map(move |i| self.start_month.plus_months(i))
    }

    /// Whether `month` lies inside the twelve-month window.
    pub fn covers(&self, month: YearMonth) -> bool {
        month >= self.start_month
            && month < self.start_month.plus_months(ANNUAL_TERM_MONTHS)
    }
}

/// Distinct members seen in one tier during one month.
#[derive(Debug, Clone, Default)]
pub struct TierStats {
    /// Every username active in the tier that month.
    pub members: HashSet<String>,
    /// Usernames known to be on an annual subscription that month.
    pub annuals: HashSet<String>,
}

impl TierStats {
    /// Record `username` as active. Returns `false` if already present.
    pub fn add_member(&mut self, username: &str) -> bool {
        if self.members.contains(username) {
            return false;
        }
        self.members.insert(username.to_string())
    }

    /// Record `username` as an annual subscriber. Returns `false` if already present.
    pub fn add_annual(&mut self, username: &str) -> bool {
        if self.annuals.contains(username) {
            return false;
        }
        self.annuals.insert(username.to_string())
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn annual_count(&self) -> usize {
        self.annuals.len()
    }

    /// Size of the set selected by `metric`.
    pub fn count(&self, metric: CountMetric) -> usize {
        match metric {
            CountMetric::Members => self.member_count(),
            CountMetric::Annuals => self.annual_count(),
        }
    }
}

/// Which per-cell set the report pivots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMetric {
    /// Distinct active members (direct and projected).
    #[default]
    Members,
    /// Distinct members known to be on an annual subscription.
    Annuals,
}

impl FromStr for CountMetric {
    type Err = ReportError;

    /// Case-insensitive construction from a string slice.
    ///
    /// Returns [`ReportError::InvalidCountMetric`] for unrecognised strings.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "members" => Ok(CountMetric::Members),
            "annuals" => Ok(CountMetric::Annuals),
            other => Err(ReportError::InvalidCountMetric(other.to_string())),
        }
    }
}

impl CountMetric {
    /// The canonical lowercase identifier for this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountMetric::Members => "members",
            CountMetric::Annuals => "annuals",
        }
    }
}

impl fmt::Display for CountMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
