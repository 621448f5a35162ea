//! Filtering stored articles for browsing.
//!
//! All text filters are case-insensitive substring matches. Date bounds are
//! inclusive and compare against `date_iso`; a record without `date_iso` never
//! satisfies a date bound.

use crate::models::ArticleRecord;
use crate::utils::contains_ci;
use chrono::NaiveDate;
use std::cmp::Reverse;

#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub author: Option<String>,
    /// Matched against `category` and every tag.
    pub category: Option<String>,
    pub title: Option<String>,
}

fn field_matches(value: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => value.is_some_and(|v| contains_ci(v, needle)),
    }
}

impl ArticleFilter {
    pub fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.author.is_none()
            && self.category.is_none()
            && self.title.is_none()
    }

    pub fn matches(&self, record: &ArticleRecord) -> bool {
        let date = record
            .date_iso
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        let in_range = match (self.from, self.to) {
            (None, None) => true,
            (from, to) => date.is_some_and(|d| {
                from.is_none_or(|f| d >= f) && to.is_none_or(|t| d <= t)
            }),
        };

        let category_ok = match self.category.as_deref() {
            None => true,
            Some(needle) => {
                field_matches(record.category.as_deref(), Some(needle))
                    || record.tags.iter().any(|t| contains_ci(t, needle))
            }
        };

        in_range
            && category_ok
            && field_matches(record.author.as_deref(), self.author.as_deref())
            && field_matches(record.title.as_deref(), self.title.as_deref())
    }

    /// Matching records, newest first; undated records sort last.
    pub fn apply(&self, records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
        let mut matching: Vec<_> = records.into_iter().filter(|r| self.matches(r)).collect();
        matching.sort_by_key(|r| Reverse(r.date_iso.clone()));
        matching
    }
}
