//! Reward definition and award-log state container.
//!
//! # Responsibility
//! - Own reward/punishment definitions and the append-only award log.
//! - Snapshot a reward into a `RewardRecord` when it is awarded.
//!
//! # Invariants
//! - Records are never modified or removed once appended.
//! - Awarding an unknown reward id changes nothing.

use crate::model::reward::{
    default_rewards, NewReward, Reward, RewardKind, RewardPatch, RewardRecord,
};
use crate::storage::{self, KeyValueStorage, StorageKey};
use crate::store::{persist_pair, EntityKind, StoreError, StoreResult};
use chrono::Utc;
use log::{info, warn};

/// Award log counts by snapshot kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardTally {
    pub rewards: usize,
    pub punishments: usize,
}

/// Session-owned reward definitions and award records.
pub struct RewardStore<S: KeyValueStorage> {
    storage: S,
    rewards: Vec<Reward>,
    records: Vec<RewardRecord>,
    initialized: bool,
}

impl<S: KeyValueStorage> RewardStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            rewards: default_rewards(),
            records: Vec::new(),
            initialized: false,
        }
    }

    /// Loads persisted collections once per session.
    ///
    /// # Side effects
    /// - Writes the default rewards when none are stored yet.
    pub fn initialize(&mut self) -> StoreResult<()> {
        if self.initialized {
            return Ok(());
        }

        let stored_rewards = storage::load(&self.storage, StorageKey::Rewards)?;
        let stored_records = storage::load(&self.storage, StorageKey::RewardRecords)?;

        let seeded = stored_rewards.is_none();
        if let Some(rewards) = stored_rewards {
            self.rewards = rewards;
        }
        if let Some(records) = stored_records {
            self.records = records;
        }
        if seeded {
            storage::save(&self.storage, StorageKey::Rewards, &self.rewards)?;
            storage::save(&self.storage, StorageKey::RewardRecords, &self.records)?;
        }

        self.initialized = true;
        info!(
            "event=store_init module=reward_store status=ok rewards={} records={} seeded={}",
            self.rewards.len(),
            self.records.len(),
            seeded
        );
        Ok(())
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    pub fn records(&self) -> &[RewardRecord] {
        &self.records
    }

    pub fn reward(&self, id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|reward| reward.id == id)
    }

    /// Creates a reward with a fresh id and returns it.
    pub fn add_reward(&mut self, new_reward: NewReward) -> StoreResult<Reward> {
        let reward = new_reward.into_reward();
        reward.validate()?;

        let mut next = self.rewards.clone();
        next.push(reward.clone());
        self.commit_rewards(next)?;

        info!(
            "event=reward_add module=reward_store status=ok total={}",
            self.rewards.len()
        );
        Ok(reward)
    }

    pub fn update_reward(&mut self, id: &str, patch: &RewardPatch) -> StoreResult<Reward> {
        let index = self.reward_index(id)?;
        patch.validate()?;

        let mut updated = self.rewards[index].clone();
        updated.apply(patch);

        let mut next = self.rewards.clone();
        next[index] = updated.clone();
        self.commit_rewards(next)?;
        Ok(updated)
    }

    /// Removes the first reward with `id`; existing records keep their snapshot.
    pub fn delete_reward(&mut self, id: &str) -> StoreResult<Reward> {
        let index = self.reward_index(id)?;

        let mut next = self.rewards.clone();
        let removed = next.remove(index);
        self.commit_rewards(next)?;
        Ok(removed)
    }

    /// Records that the reward `reward_id` was awarded now.
    ///
    /// # Errors
    /// - `NotFound` when no reward has `reward_id`; the log is untouched.
    pub fn add_reward_record(&mut self, reward_id: &str) -> StoreResult<RewardRecord> {
        let Some(reward) = self.reward(reward_id) else {
            warn!("event=reward_record_add module=reward_store status=not_found");
            return Err(StoreError::not_found(EntityKind::Reward, reward_id));
        };
        let record = RewardRecord::snapshot(reward, Utc::now());

        let mut next = self.records.clone();
        next.push(record.clone());
        persist_pair(
            &self.storage,
            (StorageKey::RewardRecords, next.as_slice()),
            &self.records,
            (StorageKey::Rewards, self.rewards.as_slice()),
        )?;
        self.records = next;

        info!(
            "event=reward_record_add module=reward_store status=ok total={}",
            self.records.len()
        );
        Ok(record)
    }

    /// Log entries awarded from `reward_id`, oldest first.
    pub fn records_for(&self, reward_id: &str) -> Vec<&RewardRecord> {
        self.records
            .iter()
            .filter(|record| record.reward_id == reward_id)
            .collect()
    }

    pub fn tally(&self) -> RewardTally {
        self.records
            .iter()
            .fold(RewardTally::default(), |mut tally, record| {
                match record.kind {
                    RewardKind::Reward => tally.rewards += 1,
                    RewardKind::Punishment => tally.punishments += 1,
                }
                tally
            })
    }

    fn reward_index(&self, id: &str) -> StoreResult<usize> {
        self.rewards
            .iter()
            .position(|reward| reward.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Reward, id))
    }

    fn commit_rewards(&mut self, next: Vec<Reward>) -> StoreResult<()> {
        persist_pair(
            &self.storage,
            (StorageKey::Rewards, next.as_slice()),
            &self.rewards,
            (StorageKey::RewardRecords, self.records.as_slice()),
        )?;
        self.rewards = next;
        Ok(())
    }
}
