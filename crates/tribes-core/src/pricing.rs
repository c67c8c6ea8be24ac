use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Record;

/// Lowest and highest price observed for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    fn new(price: Decimal) -> Self {
        Self {
            min: price,
            max: price,
        }
    }

    /// Widen the range so it includes `price`.
    fn observe(&mut self, price: Decimal) {
        if price < self.min {
            self.min = price;
        }
        if price > self.max {
            self.max = price;
        }
    }

    /// Distance between the highest and lowest observed price.
    pub fn spread(&self) -> Decimal {
        self.max - self.min
    }
}

/// Per-tier price ranges, used to tell annual payments from monthly ones.
///
/// The minimum is taken across all time. A tier name reused later with a
/// different pricing scheme keeps the old minimum, so payments under the new
/// scheme can be misclassified.
#[derive(Debug, Clone, Default)]
pub struct PriceRanges {
    ranges: HashMap<String, PriceRange>,
}

impl PriceRanges {
    /// Fold every record's price into its tier's range in a single pass.
    pub fn classify(records: &[Record]) -> Self {
        let mut ranges: HashMap<String, PriceRange> = HashMap::new();

        for record in records {
            ranges
                .entry(record.tier.clone())
                .and_modify(|range| range.observe(record.price))
                .or_insert_with(|| PriceRange::new(record.price));
        }

        let classified = Self { ranges };
        for (tier, range) in classified.sorted() {
            debug!(
                "Tier \"{}\": min {} max {} (spread {})",
                tier,
                range.min,
                range.max,
                range.spread()
            );
        }
        classified
    }

    pub fn get(&self, tier: &str) -> Option<&PriceRange> {
        self.ranges.get(tier)
    }

    /// A payment is annual when it is strictly above the tier minimum.
    ///
    /// Prices equal to the minimum are the base (monthly) price. Unknown
    /// tiers are never annual.
    pub fn is_annual(&self, tier: &str, price: Decimal) -> bool {
        self.ranges
            .get(tier)
            .map(|range| price > range.min)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges ordered by tier name.
    pub fn sorted(&self) -> Vec<(&str, &PriceRange)> {
        let mut out: Vec<(&str, &PriceRange)> = self
            .ranges
            .iter()
            .map(|(tier, range)| (tier.as_str(), range))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
