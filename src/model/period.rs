//! Calendar buckets: year, year/month and year/month/day.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Calendar granularity of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum Granularity {
    Year,
    Month,
    Day,
}

/// The posts of one calendar period.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PeriodBucket {
    /// `"1994"`, `"1994/03"` or `"1994/03/02"`.
    pub label: String,
    /// Label of the enclosing period; `None` for years.
    pub parent: Option<String>,
    /// Labels of the sub-periods.
    pub children: BTreeSet<String>,
    /// Archive positions of the member posts, in ingestion order.
    pub posts: Vec<usize>,
}

impl PeriodBucket {
    fn new(label: String, parent: Option<String>) -> Self {
        Self {
            label,
            parent,
            children: BTreeSet::new(),
            posts: Vec::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self.label.matches('/').count() {
            0 => Granularity::Year,
            1 => Granularity::Month,
            _ => Granularity::Day,
        }
    }
}

/// Labels of the year, month and day containing `date`.
pub fn period_labels(date: &DateTime<Utc>) -> [String; 3] {
    [
        date.format("%Y").to_string(),
        date.format("%Y/%m").to_string(),
        date.format("%Y/%m/%d").to_string(),
    ]
}

/// All buckets, keyed by label. Buckets are created on first use.
#[derive(Debug, Clone, Default)]
pub struct Periods {
    buckets: BTreeMap<String, PeriodBucket>,
}

impl Periods {
    /// Add the post at archive position `post` to the buckets for `date`.
    pub fn insert(&mut self, date: &DateTime<Utc>, post: usize) {
        let mut parent: Option<String> = None;
        for label in period_labels(date) {
            let bucket = self.buckets.entry(label.clone()).or_insert_with(|| {
                debug!(period = %label, "Adding period bucket");
                PeriodBucket::new(label.clone(), parent.clone())
            });
            bucket.posts.push(post);

            if let Some(parent_label) = &parent {
                if let Some(up) = self.buckets.get_mut(parent_label) {
                    up.children.insert(label.clone());
                }
            }
            parent = Some(label);
        }
    }

    /// Look up a bucket by its `/`-joined label.
    pub fn get(&self, label: &str) -> Option<&PeriodBucket> {
        self.buckets.get(label)
    }

    /// Year buckets, oldest first.
    pub fn years(&self) -> impl Iterator<Item = &PeriodBucket> {
        self.buckets
            .values()
            .filter(|bucket| bucket.granularity() == Granularity::Year)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_buckets_are_linked() {
        let mut periods = Periods::default();
        periods.insert(&day(2003, 7, 15), 0);

        let year = periods.get("2003").unwrap();
        let month = periods.get("2003/07").unwrap();
        let day = periods.get("2003/07/15").unwrap();

        assert_eq!(year.parent, None);
        assert_eq!(month.parent.as_deref(), Some("2003"));
        assert_eq!(day.parent.as_deref(), Some("2003/07"));
        assert!(year.children.contains("2003/07"));
        assert!(month.children.contains("2003/07/15"));
        for bucket in [year, month, day] {
            assert_eq!(bucket.posts, vec![0]);
        }
        assert_eq!(day.granularity(), Granularity::Day);
    }

    #[test]
    fn test_buckets_are_reused() {
        let mut periods = Periods::default();
        periods.insert(&day(2003, 7, 15), 0);
        periods.insert(&day(2003, 7, 15), 1);
        periods.insert(&day(2003, 8, 1), 2);

        assert_eq!(periods.len(), 5);
        assert_eq!(periods.get("2003").unwrap().posts, vec![0, 1, 2]);
        assert_eq!(periods.get("2003/07/15").unwrap().posts, vec![0, 1]);
        assert_eq!(periods.get("2003").unwrap().children.len(), 2);
        assert_eq!(periods.years().count(), 1);
    }
}
