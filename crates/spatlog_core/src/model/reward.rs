//! Reward/punishment definitions and the awarded-reward log entry.
//!
//! # Invariants
//! - `RewardRecord` is an immutable snapshot: renaming or deleting the source
//!   `Reward` later never rewrites existing records.

use crate::model::{require_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a definition is a reward or a punishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Reward,
    Punishment,
}

/// A definable consequence that can be awarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: RewardKind,
}

impl Reward {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("reward", "id", &self.id)?;
        require_text("reward", "name", &self.name)?;
        Ok(())
    }

    pub fn apply(&mut self, patch: &RewardPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
    }
}

/// Reward definition without an id; the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReward {
    pub name: String,
    pub description: String,
    pub kind: RewardKind,
}

impl NewReward {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: RewardKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }

    pub(crate) fn into_reward(self) -> Reward {
        Reward {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            description: self.description,
            kind: self.kind,
        }
    }
}

/// Partial update for a [`Reward`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<RewardKind>,
}

impl RewardPatch {
    /// Checks only the fields this patch sets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("reward", "name", name)?;
        }
        Ok(())
    }
}

/// Append-only log entry for one award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRecord {
    pub id: String,
    /// Soft reference to the source `Reward::id`.
    pub reward_id: String,
    /// Name of the reward at award time.
    pub reward_name: String,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    #[serde(with = "crate::model::timestamp")]
    pub date: DateTime<Utc>,
}

impl RewardRecord {
    /// Snapshots `reward` as awarded at `date`.
    pub fn snapshot(reward: &Reward, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reward_id: reward.id.clone(),
            reward_name: reward.name.clone(),
            kind: reward.kind,
            date,
        }
    }
}

/// Rewards written on first run.
pub fn default_rewards() -> Vec<Reward> {
    vec![
        Reward {
            id: "1".to_string(),
            name: "约会".to_string(),
            description: "晚餐".to_string(),
            kind: RewardKind::Reward,
        },
        Reward {
            id: "2".to_string(),
            name: "马杀鸡".to_string(),
            description: "30 分钟按摩".to_string(),
            kind: RewardKind::Reward,
        },
        Reward {
            id: "3".to_string(),
            name: "家务".to_string(),
            description: "收拾家务".to_string(),
            kind: RewardKind::Punishment,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_rewards, NewReward, RewardKind, RewardPatch, RewardRecord};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn record_uses_camel_case_keys() {
        let reward = NewReward::new("Dinner", "pick any place", RewardKind::Reward).into_reward();
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut record = RewardRecord::snapshot(&reward, date);
        record.id = "r-1".to_string();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "r-1",
                "rewardId": reward.id,
                "rewardName": "Dinner",
                "type": "reward",
                "date": "2024-06-01T12:00:00Z"
            })
        );
    }

    #[test]
    fn reward_kind_serializes_as_type() {
        let value = serde_json::to_value(&default_rewards()[2]).unwrap();
        assert_eq!(value["type"], "punishment");
        assert_eq!(value["id"], "3");
    }

    #[test]
    fn generated_ids_are_unique() {
        let first = NewReward::new("a", "", RewardKind::Reward).into_reward();
        let second = NewReward::new("a", "", RewardKind::Reward).into_reward();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn patch_validation_rejects_blank_name_only_when_set() {
        assert!(RewardPatch::default().validate().is_ok());
        let blank = RewardPatch {
            name: Some("\t".to_string()),
            ..RewardPatch::default()
        };
        assert!(blank.validate().is_err());
    }
}
