//! Monthly membership aggregation with annual-subscription projection.
//!
//! Records are bucketed by (month, tier). Any payment above the tier's
//! minimum price is treated as the first month of an annual subscription and
//! the member is carried forward into the following eleven months.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};
use tribes_core::models::{AnnualSubscription, Record, TierStats};
use tribes_core::pricing::PriceRanges;
use tribes_core::time_utils::YearMonth;

// ── MonthlyIndex ──────────────────────────────────────────────────────────────

/// Month → tier → distinct member sets.
///
/// Stored unordered; the accessors sort on read.
#[derive(Debug, Clone, Default)]
pub struct MonthlyIndex {
    months: HashMap<YearMonth, HashMap<String, TierStats>>,
}

impl MonthlyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for `(month, tier)`, created empty on first access.
    pub fn entry(&mut self, month: YearMonth, tier: &str) -> &mut TierStats {
        self.months
            .entry(month)
            .or_default()
            .entry(tier.to_string())
            .or_default()
    }

    pub fn get(&self, month: YearMonth, tier: &str) -> Option<&TierStats> {
        self.months.get(&month).and_then(|tiers| tiers.get(tier))
    }

    /// Every month present, oldest first.
    pub fn months(&self) -> Vec<YearMonth> {
        let mut months: Vec<YearMonth> = self.months.keys().copied().collect();
        months.sort();
        months
    }

    /// Every tier present in any month, in lexical order.
    pub fn tiers(&self) -> Vec<&str> {
        self.months
            .values()
            .flat_map(|tiers| tiers.keys().map(String::as_str))
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .collect()
    }

    /// All `(month, tier)` pairs touched by either aggregation pass.
    pub fn keys(&self) -> impl Iterator<Item = (YearMonth, &str)> + '_ {
        self.months
            .iter()
            .flat_map(|(month, tiers)| tiers.keys().map(move |tier| (*month, tier.as_str())))
    }

    /// Number of `(month, tier)` pairs.
    pub fn len(&self) -> usize {
        self.months.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Output of [`MonthlyAggregator::aggregate`].
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// The completed month/tier index, projections included.
    pub index: MonthlyIndex,
    /// One entry per payment classified as annual, in input order.
    pub annual_subscriptions: Vec<AnnualSubscription>,
    /// Annual payments starting inside an earlier window for the same member and tier.
    pub overlapping_renewals: usize,
}

// ── MonthlyAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that builds the monthly index.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Bucket `records` by month and tier, then project annual subscribers.
    pub fn aggregate(records: &[Record], prices: &PriceRanges) -> Aggregation {
        let (index, annual_subscriptions) = Self::observe(records, prices);
        let index = Self::project(index, &annual_subscriptions);

        let overlapping_renewals = count_overlapping_renewals(&annual_subscriptions);
        if overlapping_renewals > 0 {
            warn!(
                "{} annual renewals overlap an earlier window for the same member and tier; \
                 overlapping months are counted once",
                overlapping_renewals
            );
        }

        debug!(
            "Aggregated {} records into {} month/tier cells ({} annual subscriptions)",
            records.len(),
            index.len(),
            annual_subscriptions.len()
        );

        Aggregation {
            index,
            annual_subscriptions,
            overlapping_renewals,
        }
    }

    /// First pass: record each payment in its own month and collect the
    /// payments classified as annual.
    pub fn observe(
        records: &[Record],
        prices: &PriceRanges,
    ) -> (MonthlyIndex, Vec<AnnualSubscription>) {
        let mut index = MonthlyIndex::new();
        let mut annuals = Vec::new();

        for record in records {
            let month = record.month();
            let stats = index.entry(month, &record.tier);
            stats.add_member(&record.username);

            if prices.is_annual(&record.tier, record.price) {
                stats.add_annual(&record.username);
                annuals.push(AnnualSubscription {
                    start_month: month,
                    username: record.username.clone(),
                    tier: record.tier.clone(),
                });
            }
        }

        (index, annuals)
    }

    /// Second pass: mark each annual subscriber active in the eleven months
    /// after the one they paid in. Months beyond the observed data are
    /// created as needed.
    pub fn project(mut index: MonthlyIndex, annuals: &[AnnualSubscription]) -> MonthlyIndex {
        for sub in annuals {
            for month in sub.projected_months() {
                let stats = index.entry(month, &sub.tier);
                stats.add_member(&sub.username);
                stats.add_annual(&sub.username);
            }
        }
        index
    }
}

/// Count annual payments that start inside a previous twelve-month window
/// for the same member and tier.
pub fn count_overlapping_renewals(annuals: &[AnnualSubscription]) -> usize {
    let mut by_member: HashMap<(&str, &str), Vec<&AnnualSubscription>> = HashMap::new();
    for sub in annuals {
        by_member
            .entry((sub.username.as_str(), sub.tier.as_str()))
            .or_default()
            .push(sub);
    }

    by_member
        .into_values()
        .map(|mut subs| {
            subs.sort_by_key(|sub| sub.start_month);
            subs.windows(2)
                .filter(|pair| pair[0].covers(pair[1].start_month))
                .count()
        })
        .sum()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
