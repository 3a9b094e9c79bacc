use crate::analysis::View;
use crate::model::{Amount, TransactionRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Group totals ordered by group key. Dates and `YYYY-MM` month keys therefore come out in
/// chronological order and product names in sorted order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series<K: Ord> {
    data: BTreeMap<K, Amount>,
}

impl<K: Ord> Default for Series<K> {
    fn default() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Series<K> {
    pub fn get<Q>(&self, key: &Q) -> Option<Amount>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.data.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Amount)> + '_ {
        self.data.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The sum over all groups.
    pub fn total(&self) -> Amount {
        self.data.values().sum()
    }

    /// The group with the largest value. On a tie the group that comes first in key order wins.
    pub fn max(&self) -> Option<(&K, Amount)> {
        self.iter().fold(None, |best, (k, v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((k, v)),
        })
    }
}

impl<K: Ord + Display> Series<K> {
    /// Labels and values, in key order, ready for a chart or table.
    pub fn points(&self) -> Vec<Point> {
        self.iter()
            .map(|(k, value)| Point {
                label: k.to_string(),
                value,
            })
            .collect()
    }
}

impl<K: Ord> FromIterator<(K, Amount)> for Series<K> {
    fn from_iter<I: IntoIterator<Item = (K, Amount)>>(iter: I) -> Self {
        let mut data: BTreeMap<K, Amount> = BTreeMap::new();
        for (k, v) in iter {
            *data.entry(k).or_default() += v;
        }
        Self { data }
    }
}

/// One labeled value of a prepared series.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub label: String,
    pub value: Amount,
}

/// Sums `value` per `key` in a single pass over `records`.
pub fn group_by<'a, K, FK, FV>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
    key: FK,
    value: FV,
) -> Series<K>
where
    K: Ord,
    FK: Fn(&TransactionRecord) -> K,
    FV: Fn(&TransactionRecord) -> Amount,
{
    records.into_iter().map(|r| (key(r), value(r))).collect()
}

impl View<'_> {
    /// Sum of `quantity_sold` per product.
    pub fn total_quantity_by_product(&self) -> Series<String> {
        group_by(self.iter(), product_key, TransactionRecord::quantity_sold)
    }

    /// Sum of `revenue` per product.
    pub fn revenue_by_product(&self) -> Series<String> {
        group_by(self.iter(), product_key, TransactionRecord::revenue)
    }

    /// Sum of `revenue` per date.
    pub fn daily_revenue(&self) -> Series<NaiveDate> {
        group_by(self.iter(), TransactionRecord::date, TransactionRecord::revenue)
    }

    /// Sum of `quantity_sold` per `YYYY-MM` month.
    pub fn monthly_quantity(&self) -> Series<String> {
        group_by(self.iter(), month_key, TransactionRecord::quantity_sold)
    }

    /// Sum of `revenue` per `YYYY-MM` month.
    pub fn monthly_revenue(&self) -> Series<String> {
        group_by(self.iter(), month_key, TransactionRecord::revenue)
    }
}

fn product_key(r: &TransactionRecord) -> String {
    r.product().to_string()
}

fn month_key(r: &TransactionRecord) -> String {
    r.month().to_string()
}
