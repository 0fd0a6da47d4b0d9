use serde::Serialize;

use super::direction::Direction;
use super::time_bucket::TimeBucket;

/// Caller-supplied search constraints. Both absent matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub time_bucket: Option<TimeBucket>,
    pub direction: Option<Direction>,
}

impl FilterCriteria {
    pub const fn all() -> Self {
        FilterCriteria {
            time_bucket: None,
            direction: None,
        }
    }

    /// Normalises raw boundary strings. Blank or unrecognised values become
    /// absent constraints rather than errors.
    pub fn from_raw(time_bucket: Option<&str>, direction: Option<&str>) -> Self {
        FilterCriteria {
            time_bucket: time_bucket.and_then(TimeBucket::parse),
            direction: direction.and_then(Direction::parse),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.time_bucket.is_none() && self.direction.is_none()
    }

    /// Human-readable summary of the active constraints, e.g. for a results
    /// heading. `None` when nothing is filtered.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(bucket) = self.time_bucket {
            parts.push(format!("time '{}'", bucket.label()));
        }
        if let Some(direction) = self.direction {
            parts.push(format!("direction '{}'", direction.label()));
        }
        (!parts.is_empty()).then(|| parts.join(" + "))
    }
}

/// Conjunctive SQL predicate plus the values that must be bound to it.
///
/// Bucket ranges are inlined (closed set); the direction code is always a
/// bound `?` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFilter {
    conditions: Vec<String>,
    params: Vec<i64>,
}

impl SqlFilter {
    pub fn build(criteria: &FilterCriteria) -> Self {
        let mut filter = SqlFilter::default();
        if let Some(bucket) = criteria.time_bucket {
            filter.conditions.push(bucket.sql_condition());
        }
        if let Some(direction) = criteria.direction {
            filter.conditions.push("direction = ?".to_owned());
            filter.params.push(direction.code());
        }
        filter
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn params(&self) -> &[i64] {
        &self.params
    }

    /// `" WHERE a AND b"`, or an empty string when unconstrained.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_match_everything() {
        let filter = SqlFilter::build(&FilterCriteria::all());
        assert!(filter.conditions().is_empty());
        assert!(filter.params().is_empty());
        assert_eq!(filter.where_clause(), "");
    }

    #[test]
    fn direction_is_bound_not_inlined() {
        let criteria = FilterCriteria::from_raw(None, Some("3"));
        let filter = SqlFilter::build(&criteria);
        assert_eq!(filter.conditions(), ["direction = ?"]);
        assert_eq!(filter.params(), [3]);
        assert!(!filter.where_clause().contains('3'));
    }

    #[test]
    fn both_constraints_are_joined_with_and() {
        let criteria = FilterCriteria::from_raw(Some("morning"), Some("2"));
        let filter = SqlFilter::build(&criteria);
        assert_eq!(filter.conditions().len(), 2);
        assert_eq!(filter.conditions()[0], TimeBucket::Morning.sql_condition());
        assert_eq!(filter.params(), [2]);
        assert!(filter.where_clause().starts_with(" WHERE ("));
        assert!(filter.where_clause().ends_with(" AND direction = ?"));
    }

    #[test]
    fn unrecognised_values_are_absent_constraints() {
        let criteria = FilterCriteria::from_raw(Some("brunch"), Some("north"));
        assert!(criteria.is_empty());
        assert_eq!(SqlFilter::build(&criteria), SqlFilter::default());

        let criteria = FilterCriteria::from_raw(Some(""), Some(" "));
        assert_eq!(criteria, FilterCriteria::all());
    }

    #[test]
    fn describe_lists_active_constraints() {
        assert_eq!(FilterCriteria::all().describe(), None);
        let criteria = FilterCriteria::from_raw(Some("night"), Some("1"));
        assert_eq!(
            criteria.describe().as_deref(),
            Some("time 'Night (20:00-06:00)' + direction 'North → South'")
        );
    }
}
