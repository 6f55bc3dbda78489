//! This file defines the `Category` type and a typed lookup table for resolving category IDs.
//!
//! Categories are read-only reference data owned by the API. An expense may refer to a category
//! that has since been deleted, so lookups return a [CategoryLookup] instead of assuming a match.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::CategoryId;

/// The label displayed for expenses whose category could not be found.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown category";

/// A named classification bucket for expenses, e.g. "Food" or "Rent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
}

/// The result of looking up a category by its ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLookup<'a> {
    /// The category exists.
    Found(&'a Category),
    /// No category has the given ID.
    NotFound(CategoryId),
}

impl<'a> CategoryLookup<'a> {
    /// The name to show to the user, falling back to [UNKNOWN_CATEGORY_LABEL].
    pub fn display_name(&self) -> &'a str {
        match self {
            CategoryLookup::Found(category) => &category.name,
            CategoryLookup::NotFound(_) => UNKNOWN_CATEGORY_LABEL,
        }
    }

    /// The category, if it was found.
    pub fn category(&self) -> Option<&'a Category> {
        match self {
            CategoryLookup::Found(category) => Some(category),
            CategoryLookup::NotFound(_) => None,
        }
    }
}

/// The list of categories fetched from the API, indexed by ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories {
    categories: Vec<Category>,
    index: HashMap<CategoryId, usize>,
}

impl Categories {
    /// Create a lookup table from the categories returned by the API.
    ///
    /// If two categories share an ID, the first one wins.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut index = HashMap::with_capacity(categories.len());

        for (position, category) in categories.iter().enumerate() {
            index.entry(category.id).or_insert(position);
        }

        Self { categories, index }
    }

    /// Find the category with the ID `id`.
    pub fn lookup(&self, id: CategoryId) -> CategoryLookup<'_> {
        match self.index.get(&id) {
            Some(&position) => CategoryLookup::Found(&self.categories[position]),
            None => CategoryLookup::NotFound(id),
        }
    }

    /// Whether a category with the ID `id` exists.
    pub fn contains(&self, id: CategoryId) -> bool {
        self.index.contains_key(&id)
    }

    /// The categories in the order the API returned them.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl From<Vec<Category>> for Categories {
    fn from(categories: Vec<Category>) -> Self {
        Self::new(categories)
    }
}
