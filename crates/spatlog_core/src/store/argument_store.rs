//! Argument/category state container.
//!
//! # Responsibility
//! - Own the argument log and the category set for one session.
//! - Provide CRUD entry points plus the derived statistics the dashboard and
//!   analytics views read.
//!
//! # Invariants
//! - `arguments` keeps insertion order, which is display order.
//! - Lookups by id resolve to the first match; duplicate ids may coexist.
//! - Deleting a category never touches arguments referencing it.
//! - A resolved argument only returns to ongoing via `reopen_argument`.

use crate::model::argument::{Argument, ArgumentId, ArgumentPatch, ArgumentStatus};
use crate::model::category::{default_categories, Category, CategoryPatch};
use crate::storage::{self, KeyValueStorage, StorageKey};
use crate::store::{persist_pair, EntityKind, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use log::info;

/// Per-category argument count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStat {
    pub category_id: String,
    pub name: String,
    pub count: usize,
}

/// Result of removing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRemoval {
    pub removed: Category,
    /// Arguments that still reference the removed category id.
    pub orphaned_arguments: Vec<ArgumentId>,
}

/// Session-owned argument and category collections.
pub struct ArgumentStore<S: KeyValueStorage> {
    storage: S,
    arguments: Vec<Argument>,
    categories: Vec<Category>,
    initialized: bool,
}

impl<S: KeyValueStorage> ArgumentStore<S> {
    /// Creates an empty store seeded with default categories in memory only.
    ///
    /// Call [`ArgumentStore::initialize`] before use to load persisted state.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            arguments: Vec::new(),
            categories: default_categories(),
            initialized: false,
        }
    }

    /// Loads persisted collections once per session.
    ///
    /// # Side effects
    /// - Writes the default categories when none are stored yet.
    pub fn initialize(&mut self) -> StoreResult<()> {
        if self.initialized {
            return Ok(());
        }

        let stored_arguments = storage::load(&self.storage, StorageKey::Arguments)?;
        let stored_categories = storage::load(&self.storage, StorageKey::Categories)?;

        let seeded = stored_categories.is_none();
        if let Some(arguments) = stored_arguments {
            self.arguments = arguments;
        }
        if let Some(categories) = stored_categories {
            self.categories = categories;
        }
        if seeded {
            storage::save(&self.storage, StorageKey::Arguments, &self.arguments)?;
            storage::save(&self.storage, StorageKey::Categories, &self.categories)?;
        }

        self.initialized = true;
        info!(
            "event=store_init module=argument_store status=ok arguments={} categories={} seeded={}",
            self.arguments.len(),
            self.categories.len(),
            seeded
        );
        Ok(())
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn argument(&self, id: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Appends `argument` to the log. Duplicate ids are not rejected.
    pub fn add_argument(&mut self, argument: Argument) -> StoreResult<()> {
        argument.validate()?;

        let mut next = self.arguments.clone();
        next.push(argument);
        self.commit_arguments(next)?;

        info!(
            "event=argument_add module=argument_store status=ok total={}",
            self.arguments.len()
        );
        Ok(())
    }

    /// Merges `patch` over the first argument with `id`.
    ///
    /// # Errors
    /// - `NotFound` when no argument has `id`.
    /// - `Validation` when a field the patch sets is invalid.
    /// - `InvalidTransition` when the patch moves `resolved -> ongoing`.
    pub fn update_argument(&mut self, id: &str, patch: &ArgumentPatch) -> StoreResult<Argument> {
        let index = self.argument_index(id)?;
        patch.validate()?;
        let current = &self.arguments[index];
        if current.status == ArgumentStatus::Resolved
            && patch.status == Some(ArgumentStatus::Ongoing)
        {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: ArgumentStatus::Resolved,
                to: ArgumentStatus::Ongoing,
            });
        }

        self.replace_argument(index, |argument| argument.apply(patch))
    }

    /// Marks the argument resolved and records how it was settled.
    pub fn resolve_argument(
        &mut self,
        id: &str,
        resolution: Option<String>,
    ) -> StoreResult<Argument> {
        let patch = ArgumentPatch {
            status: Some(ArgumentStatus::Resolved),
            resolution: Some(resolution),
            ..ArgumentPatch::default()
        };
        self.update_argument(id, &patch)
    }

    /// Moves a resolved argument back to ongoing and clears its resolution.
    pub fn reopen_argument(&mut self, id: &str) -> StoreResult<Argument> {
        let index = self.argument_index(id)?;
        self.replace_argument(index, |argument| {
            argument.status = ArgumentStatus::Ongoing;
            argument.resolution = None;
        })
    }

    pub fn add_category(&mut self, category: Category) -> StoreResult<()> {
        category.validate()?;

        let mut next = self.categories.clone();
        next.push(category);
        self.commit_categories(next)?;

        info!(
            "event=category_add module=argument_store status=ok total={}",
            self.categories.len()
        );
        Ok(())
    }

    pub fn update_category(&mut self, id: &str, patch: &CategoryPatch) -> StoreResult<Category> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Category, id))?;
        patch.validate()?;

        let mut updated = self.categories[index].clone();
        updated.apply(patch);

        let mut next = self.categories.clone();
        next[index] = updated.clone();
        self.commit_categories(next)?;
        Ok(updated)
    }

    /// Removes the first category with `id` without cascading.
    ///
    /// The returned report lists arguments left pointing at the removed id.
    pub fn delete_category(&mut self, id: &str) -> StoreResult<CategoryRemoval> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Category, id))?;

        let mut next = self.categories.clone();
        let removed = next.remove(index);
        self.commit_categories(next)?;

        // A duplicate id further down keeps those arguments attached.
        let orphaned_arguments = if self.category(id).is_some() {
            Vec::new()
        } else {
            self.arguments
                .iter()
                .filter(|argument| argument.category == id)
                .map(|argument| argument.id.clone())
                .collect()
        };

        info!(
            "event=category_delete module=argument_store status=ok orphaned={}",
            orphaned_arguments.len()
        );
        Ok(CategoryRemoval {
            removed,
            orphaned_arguments,
        })
    }

    /// Percentage of resolved arguments, `0.0` for an empty log.
    pub fn resolution_rate(&self) -> f64 {
        if self.arguments.is_empty() {
            return 0.0;
        }
        let resolved = self
            .arguments
            .iter()
            .filter(|argument| argument.is_resolved())
            .count();
        resolved as f64 / self.arguments.len() as f64 * 100.0
    }

    /// Argument count per category, in category order.
    pub fn category_stats(&self) -> Vec<CategoryStat> {
        self.categories
            .iter()
            .map(|category| CategoryStat {
                category_id: category.id.clone(),
                name: category.name.clone(),
                count: self
                    .arguments
                    .iter()
                    .filter(|argument| argument.category == category.id)
                    .count(),
            })
            .collect()
    }

    /// Arguments dated within `[start, end)`, in log order.
    pub fn arguments_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Argument> {
        self.arguments
            .iter()
            .filter(|argument| argument.date >= start && argument.date < end)
            .collect()
    }

    /// Arguments whose category id matches no known category.
    pub fn dangling_arguments(&self) -> Vec<&Argument> {
        self.arguments
            .iter()
            .filter(|argument| self.category(&argument.category).is_none())
            .collect()
    }

    fn argument_index(&self, id: &str) -> StoreResult<usize> {
        self.arguments
            .iter()
            .position(|argument| argument.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Argument, id))
    }

    fn replace_argument(
        &mut self,
        index: usize,
        change: impl FnOnce(&mut Argument),
    ) -> StoreResult<Argument> {
        let mut updated = self.arguments[index].clone();
        change(&mut updated);

        let mut next = self.arguments.clone();
        next[index] = updated.clone();
        self.commit_arguments(next)?;
        Ok(updated)
    }

    fn commit_arguments(&mut self, next: Vec<Argument>) -> StoreResult<()> {
        persist_pair(
            &self.storage,
            (StorageKey::Arguments, next.as_slice()),
            &self.arguments,
            (StorageKey::Categories, self.categories.as_slice()),
        )?;
        self.arguments = next;
        Ok(())
    }

    fn commit_categories(&mut self, next: Vec<Category>) -> StoreResult<()> {
        persist_pair(
            &self.storage,
            (StorageKey::Categories, next.as_slice()),
            &self.categories,
            (StorageKey::Arguments, self.arguments.as_slice()),
        )?;
        self.categories = next;
        Ok(())
    }
}
