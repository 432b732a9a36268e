//! Client-side farmer list filter.

use crate::models::Farmer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    Email,
    RegistrationDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Search, status filter and sort applied to a page of farmers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerFilter {
    /// Case-insensitive substring of the full name or email
    pub search: Option<String>,
    pub active: ActiveFilter,
    /// `None` keeps the server's order
    pub sort_by: Option<SortBy>,
    pub sort_order: SortOrder,
}

impl FarmerFilter {
    pub fn matches(&self, farmer: &Farmer) -> bool {
        let status_ok = match self.active {
            ActiveFilter::All => true,
            ActiveFilter::Active => farmer.active,
            ActiveFilter::Inactive => !farmer.active,
        };
        if !status_ok {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                farmer.full_name().to_lowercase().contains(&needle)
                    || farmer.email.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Matching farmers, sorted as requested.
    pub fn apply(&self, farmers: &[Farmer]) -> Vec<Farmer> {
        let mut selected: Vec<Farmer> = farmers.iter().filter(|f| self.matches(f)).cloned().collect();
        if let Some(sort_by) = self.sort_by {
            selected.sort_by(|a, b| {
                let ordering = compare(sort_by, a, b);
                match self.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        selected
    }
}

fn compare(sort_by: SortBy, a: &Farmer, b: &Farmer) -> Ordering {
    match sort_by {
        SortBy::Name => a
            .full_name()
            .to_lowercase()
            .cmp(&b.full_name().to_lowercase()),
        SortBy::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        SortBy::RegistrationDate => a.registration_date.cmp(&b.registration_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer(first: &str, email: &str, active: bool, registered: &str) -> Farmer {
        Farmer {
            first_name: first.into(),
            last_name: "Mwangi".into(),
            email: email.into(),
            active,
            registration_date: registered.into(),
            ..Default::default()
        }
    }

    fn farmers() -> Vec<Farmer> {
        vec![
            farmer("Wanjiru", "w@farm.co", true, "2024-03-01"),
            farmer("Baraka", "baraka@agri.org", false, "2023-11-20"),
            farmer("Achieng", "achieng@farm.co", true, "2024-01-15"),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = FarmerFilter {
            search: Some("FARM.CO".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&farmers()).len(), 2);

        let by_name = FarmerFilter {
            search: Some("baraka mw".into()),
            ..Default::default()
        };
        assert_eq!(by_name.apply(&farmers())[0].first_name, "Baraka");
    }

    #[test]
    fn test_status_and_sort() {
        let filter = FarmerFilter {
            active: ActiveFilter::Active,
            sort_by: Some(SortBy::RegistrationDate),
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let names: Vec<_> = filter
            .apply(&farmers())
            .into_iter()
            .map(|f| f.first_name)
            .collect();
        assert_eq!(names, vec!["Wanjiru", "Achieng"]);

        let by_name = FarmerFilter {
            sort_by: Some(SortBy::Name),
            ..Default::default()
        };
        assert_eq!(by_name.apply(&farmers())[0].first_name, "Achieng");
    }
}
