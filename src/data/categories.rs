//! Static category table.
//!
//! A local `id,name,parent_id` CSV mirroring the provider's category tree. It
//! backs the hierarchical browse (`categories` subcommand) and turns the user's
//! level-1/2/3 name selections into the root ids for the category descent.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use crate::domain::Category;
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn from_csv(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::input(format!("Failed to open category table '{}': {e}", path.display())))?;
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

        let mut categories = Vec::new();
        for (idx, result) in reader.deserialize::<Category>().enumerate() {
            let category = result.map_err(|e| {
                AppError::input(format!(
                    "Invalid category table '{}' line {}: {e}",
                    path.display(),
                    idx + 2
                ))
            })?;
            categories.push(category);
        }
        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn top_level(&self) -> Vec<&Category> {
        self.children_of(&[0])
    }

    pub fn children_of(&self, parent_ids: &[u32]) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| parent_ids.contains(&c.parent_id))
            .collect()
    }

    /// Ids of categories named in `names` whose parent is in `parent_ids`.
    pub fn select(&self, names: &[String], parent_ids: &[u32]) -> Vec<u32> {
        self.children_of(parent_ids)
            .into_iter()
            .filter(|c| names.iter().any(|n| n == &c.name))
            .map(|c| c.id)
            .collect()
    }

    /// Resolve three levels of name selections into descent roots.
    ///
    /// Every selected id is a root, except that selecting a subcategory
    /// replaces its parent: a level-1 category with a selected level-2 child is
    /// dropped, and likewise for level 2 vs level 3.
    pub fn search_roots(&self, level1: &[String], level2: &[String], level3: &[String]) -> Vec<u32> {
        let ids1 = self.select(level1, &[0]);
        let ids2 = self.select(level2, &ids1);
        let ids3 = self.select(level3, &ids2);

        let replaced: HashSet<u32> = ids2
            .iter()
            .chain(ids3.iter())
            .filter_map(|id| self.get(*id).map(|c| c.parent_id))
            .collect();

        let mut seen = HashSet::new();
        ids1.into_iter()
            .chain(ids2)
            .chain(ids3)
            .filter(|id| !replaced.contains(id) && seen.insert(*id))
            .collect()
    }
}
