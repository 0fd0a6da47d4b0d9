pub mod charts;
pub mod records;

use axum::http::header;
use axum::response::IntoResponse;
use maud::{DOCTYPE, Markup, html};
use serde::Deserialize;

use crate::styles::{self, Global as GlobalClass};
use crate::traffic::{Direction, FilterCriteria, TimeBucket};

/// Raw `?time_bucket=&direction=&page=` params. Everything is a string so
/// malformed values fall back to "no constraint" instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub time_bucket: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
}

impl FilterQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_raw(self.time_bucket.as_deref(), self.direction.as_deref())
    }

    /// Requested page; missing or unparseable means 1. Values below 1 are
    /// clamped later by the query.
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Records,
    Charts,
}

pub fn page_shell(title: &str, active: NavItem, content: Markup) -> Markup {
    let nav_link = |item: NavItem, href: &str, label: &str| {
        html! {
            @if item == active {
                a.(GlobalClass::NAV_ACTIVE) href=(href) { (label) }
            } @else {
                a href=(href) { (label) }
            }
        }
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/styles.css";
            }
            body {
                nav.(GlobalClass::NAV) {
                    (nav_link(NavItem::Records, "/", "> records"))
                    (nav_link(NavItem::Charts, "/charts", "> charts"))
                }
                (content)
            }
        }
    }
}

pub fn time_bucket_select(selected: Option<TimeBucket>) -> Markup {
    html! {
        label {
            "time of day"
            select name="time_bucket" {
                option value="" selected[selected.is_none()] { "All day" }
                @for bucket in TimeBucket::ALL {
                    option value=(bucket.name()) selected[selected == Some(bucket)] {
                        (bucket.label())
                    }
                }
            }
        }
    }
}

pub fn direction_select(selected: Option<Direction>) -> Markup {
    html! {
        label {
            "direction"
            select name="direction" {
                option value="" selected[selected.is_none()] { "All directions" }
                @for direction in Direction::ALL {
                    option value=(direction.code()) selected[selected == Some(direction)] {
                        (direction.label())
                    }
                }
            }
        }
    }
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], styles::ALL.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(time_bucket: Option<&str>, direction: Option<&str>, page: Option<&str>) -> FilterQuery {
        FilterQuery {
            time_bucket: time_bucket.map(str::to_owned),
            direction: direction.map(str::to_owned),
            page: page.map(str::to_owned),
        }
    }

    #[test]
    fn page_defaults_to_one_when_missing_or_malformed() {
        assert_eq!(query(None, None, None).page(), 1);
        assert_eq!(query(None, None, Some("abc")).page(), 1);
        assert_eq!(query(None, None, Some("")).page(), 1);
        assert_eq!(query(None, None, Some(" 4 ")).page(), 4);
        assert_eq!(query(None, None, Some("-2")).page(), -2);
    }

    #[test]
    fn criteria_ignore_unknown_values() {
        let criteria = query(Some("evening"), Some("9"), None).criteria();
        assert_eq!(criteria.time_bucket, Some(TimeBucket::Evening));
        assert_eq!(criteria.direction, None);
    }

    #[test]
    fn selects_mark_current_choice() {
        let markup = direction_select(Some(Direction::SouthToNorth)).into_string();
        assert!(markup.contains(r#"<option value="2" selected>"#));
        let markup = time_bucket_select(None).into_string();
        assert!(markup.contains(r#"<option value="" selected>"#));
    }
}
