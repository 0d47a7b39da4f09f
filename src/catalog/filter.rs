//! Category filter predicate applied over the component corpus
//!
//! The predicate is pure and total: it never fails, and a record missing a
//! field only fails the constraint that needed that field.

use serde::{Deserialize, Serialize};

use crate::catalog::component::Component;

/// Optional filter criteria; absent fields are unconstrained
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring match over the searchable text fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Exact match against either category level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<String>,

    /// Inclusive reference-price bounds (the 0.0 sentinel never matches)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,

    /// Inclusive total-dose bounds in krad
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_dose_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_dose_max: Option<f64>,
}

impl FilterCriteria {
    /// True when no constraint is set (the identity filter)
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.is_empty())
            && self.category.is_none()
            && self.manufacturer.is_none()
            && self.quality_level.is_none()
            && self.lifecycle.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.total_dose_min.is_none()
            && self.total_dose_max.is_none()
    }

    /// Decide inclusion for a single component. Criteria AND-compose.
    pub fn matches(&self, component: &Component) -> bool {
        if let Some(term) = self.search.as_deref() {
            let term = term.trim();
            if !term.is_empty() && !search_text_matches(component, term) {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            if component.primary_category != category && component.secondary_category != category {
                return false;
            }
        }

        if let Some(manufacturer) = self.manufacturer.as_deref() {
            if component.manufacturer != manufacturer {
                return false;
            }
        }

        if let Some(quality) = self.quality_level.as_deref() {
            if !component.quality_level.eq_ignore_ascii_case(quality) {
                return false;
            }
        }

        if let Some(lifecycle) = self.lifecycle.as_deref() {
            if !component
                .lifecycle
                .to_string()
                .eq_ignore_ascii_case(lifecycle.trim())
            {
                return false;
            }
        }

        if self.price_min.is_some() || self.price_max.is_some() {
            match component.quoted_price() {
                Some(price) => {
                    if self.price_min.is_some_and(|min| price < min) {
                        return false;
                    }
                    if self.price_max.is_some_and(|max| price > max) {
                        return false;
                    }
                }
                // no quote: fails only the price constraint
                None => return false,
            }
        }

        if self.total_dose_min.is_some() || self.total_dose_max.is_some() {
            match component.total_dose_krad {
                Some(dose) => {
                    if self.total_dose_min.is_some_and(|min| dose < min) {
                        return false;
                    }
                    if self.total_dose_max.is_some_and(|max| dose > max) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}

/// Case-insensitive substring match over part number, manufacturer,
/// description, functional performance, and both category levels
fn search_text_matches(component: &Component, term: &str) -> bool {
    let needle = term.to_lowercase();
    [
        component.part_number.as_str(),
        component.manufacturer.as_str(),
        component.description.as_str(),
        component.functional_performance.as_str(),
        component.primary_category.as_str(),
        component.secondary_category.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}
