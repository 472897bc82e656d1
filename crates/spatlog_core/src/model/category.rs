//! Argument category model and seeded defaults.

use crate::model::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Named, colored classification bucket for arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Free-form display hint, usually `#RRGGBB`.
    pub color: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("category", "id", &self.id)?;
        require_text("category", "name", &self.name)
    }

    pub fn apply(&mut self, patch: &CategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

/// Partial update for a [`Category`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl CategoryPatch {
    /// Checks only the fields this patch sets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("category", "name", name)?;
        }
        Ok(())
    }
}

/// Categories written on first run.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("housework", "家务分工", "#4F46E5"),
        Category::new("finance", "金钱支出", "#059669"),
        Category::new("habits", "个人习惯", "#B45309"),
        Category::new("entertainment", "娱乐选择", "#7C3AED"),
        Category::new("communication", "沟通问题", "#DC2626"),
        Category::new("emergency", "突发事件", "#DB2777"),
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_categories, Category, CategoryPatch};
    use crate::model::ValidationError;

    #[test]
    fn defaults_are_valid_and_ordered() {
        let ids: Vec<_> = default_categories().into_iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            [
                "housework",
                "finance",
                "habits",
                "entertainment",
                "communication",
                "emergency"
            ]
        );
        for category in default_categories() {
            category.validate().unwrap();
        }
    }

    #[test]
    fn color_is_free_form() {
        Category::new("chores", "Chores", "blue").validate().unwrap();
        Category::new("chores", "Chores", "rgb(1,2,3)")
            .validate()
            .unwrap();
    }

    #[test]
    fn patch_validation_ignores_unset_fields() {
        assert!(CategoryPatch::default().validate().is_ok());
        assert_eq!(
            CategoryPatch {
                name: Some(" ".to_string()),
                ..CategoryPatch::default()
            }
            .validate(),
            Err(ValidationError::EmptyField {
                entity: "category",
                field: "name"
            })
        );
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let mut category = Category::new("chores", "Chores", "#112233");
        category.apply(&CategoryPatch {
            color: Some("#445566".to_string()),
            ..CategoryPatch::default()
        });
        assert_eq!(category.name, "Chores");
        assert_eq!(category.color, "#445566");
    }
}
