//! Category statistics and filter-option summaries over the corpus

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::component::Component;

/// Distinct filter options plus the observed price range, for populating
/// filter controls
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub manufacturers: Vec<String>,
    pub quality_levels: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

/// Per-primary-category aggregate
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
    /// Average over quoted prices only (no-quote sentinels excluded)
    pub avg_price: Option<f64>,
    pub subcategories: Vec<SubcategoryStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryStats {
    pub name: String,
    pub count: usize,
    pub avg_price: Option<f64>,
}

/// Collect the distinct filter options over the whole corpus
pub fn filter_options(corpus: &[Component]) -> FilterOptions {
    let mut categories = std::collections::BTreeSet::new();
    let mut manufacturers = std::collections::BTreeSet::new();
    let mut quality_levels = std::collections::BTreeSet::new();
    let mut price_min: Option<f64> = None;
    let mut price_max: Option<f64> = None;

    for component in corpus {
        if !component.primary_category.is_empty() {
            categories.insert(component.primary_category.clone());
        }
        if !component.manufacturer.is_empty() {
            manufacturers.insert(component.manufacturer.clone());
        }
        if !component.quality_level.is_empty() {
            quality_levels.insert(component.quality_level.clone());
        }
        if let Some(price) = component.quoted_price() {
            price_min = Some(price_min.map_or(price, |m: f64| m.min(price)));
            price_max = Some(price_max.map_or(price, |m: f64| m.max(price)));
        }
    }

    FilterOptions {
        categories: categories.into_iter().collect(),
        manufacturers: manufacturers.into_iter().collect(),
        quality_levels: quality_levels.into_iter().collect(),
        price_min,
        price_max,
    }
}

/// Aggregate the corpus by primary category with secondary breakdowns
pub fn category_stats(corpus: &[Component]) -> Vec<CategoryStats> {
    let mut groups: BTreeMap<&str, Vec<&Component>> = BTreeMap::new();
    for component in corpus {
        groups
            .entry(component.primary_category.as_str())
            .or_default()
            .push(component);
    }

    groups
        .into_iter()
        .map(|(category, members)| {
            let mut subgroups: BTreeMap<&str, Vec<&Component>> = BTreeMap::new();
            for member in &members {
                subgroups
                    .entry(member.secondary_category.as_str())
                    .or_default()
                    .push(member);
            }

            let subcategories = subgroups
                .into_iter()
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, sub_members)| SubcategoryStats {
                    name: name.to_string(),
                    count: sub_members.len(),
                    avg_price: average_price(&sub_members),
                })
                .collect();

            CategoryStats {
                category: category.to_string(),
                count: members.len(),
                avg_price: average_price(&members),
                subcategories,
            }
        })
        .collect()
}

fn average_price(members: &[&Component]) -> Option<f64> {
    let quoted: Vec<f64> = members.iter().filter_map(|c| c.quoted_price()).collect();
    if quoted.is_empty() {
        None
    } else {
        Some(quoted.iter().sum::<f64>() / quoted.len() as f64)
    }
}
