//! Read-side views over the catalog.
//!
//! Nothing here is cached: every call derives from the current items, so a
//! view read after a mutation always reflects it.

use serde::{Deserialize, Serialize};

use crate::item::MenuItem;
use crate::store::CatalogStore;

/// Category selection in the customer view. `All` is the "no filter" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Label of the sentinel, as shown first in the category bar.
    pub const ALL: &'static str = "All";

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => Self::ALL,
            CategoryFilter::Category(name) => name,
        }
    }

    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => item.category() == name,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == Self::ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => CategoryFilter::ALL.to_string(),
            CategoryFilter::Category(name) => name,
        }
    }
}

impl core::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct, non-empty, ascending category labels.
///
/// Cloning restarts the sequence from the beginning of the same snapshot.
#[derive(Debug, Clone)]
pub struct Categories<'a> {
    inner: std::vec::IntoIter<&'a str>,
}

impl<'a> Categories<'a> {
    fn from_items<I>(items: I) -> Self
    where
        I: Iterator<Item = &'a MenuItem>,
    {
        let mut labels: Vec<&'a str> = items
            .map(MenuItem::category)
            .filter(|c| !c.is_empty())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        Self {
            inner: labels.into_iter(),
        }
    }
}

impl<'a> Iterator for Categories<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Categories<'_> {}

impl CatalogStore {
    /// Every category in use, including those of hidden items and specials.
    pub fn categories(&self) -> Categories<'_> {
        Categories::from_items(self.items().iter())
    }

    /// Categories offered in the customer's category bar.
    pub fn customer_categories(&self) -> Categories<'_> {
        Categories::from_items(self.items().iter().filter(|item| item.is_browsable()))
    }

    /// Browsable items, narrowed to `filter` unless it is `All`.
    pub fn list_for_customer<'a>(
        &'a self,
        filter: &'a CategoryFilter,
    ) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items()
            .iter()
            .filter(move |item| item.is_browsable() && filter.matches(item))
    }

    /// Enabled specials, in insertion order. Display caps are the caller's concern.
    pub fn list_specials(&self) -> impl Iterator<Item = &MenuItem> + '_ {
        self.items()
            .iter()
            .filter(|item| item.is_special() && !item.is_disabled())
    }

    /// Every item, unfiltered, in insertion order.
    pub fn list_for_admin(&self) -> impl Iterator<Item = &MenuItem> + '_ {
        self.items().iter()
    }
}
