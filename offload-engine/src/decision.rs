/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Run-level record of where every task executed.

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{SimContext, Target, TaskKey};

// ── OffloadClass ──────────────────────────────────────────────────────────────

/// Tier that executed a task.
///
/// Serialized as a single character: `0` RSU, `1` HAP, `2` local, `x`
/// unresolved (no tier meets the deadline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffloadClass {
    Rsu,
    Hap,
    Local,
    Unresolved,
}

impl OffloadClass {
    pub fn code(self) -> char {
        match self {
            OffloadClass::Rsu => '0',
            OffloadClass::Hap => '1',
            OffloadClass::Local => '2',
            OffloadClass::Unresolved => 'x',
        }
    }
}

impl From<Target> for OffloadClass {
    fn from(target: Target) -> Self {
        match target {
            Target::Rsu(_) => OffloadClass::Rsu,
            Target::Hap => OffloadClass::Hap,
        }
    }
}

// ── DecisionVector ────────────────────────────────────────────────────────────

/// Per-task offload class, ordered by VU index then task index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionVector {
    entries: BTreeMap<TaskKey, OffloadClass>,
}

/// Number of tasks per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub rsu: usize,
    pub hap: usize,
    pub local: usize,
    pub unresolved: usize,
}

impl DecisionVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the class of `key`.
    pub fn insert(&mut self, key: TaskKey, class: OffloadClass) {
        self.entries.insert(key, class);
    }

    /// Merge `other` into `self`; entries in `other` win.
    pub fn merge(&mut self, other: DecisionVector) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: TaskKey) -> Option<OffloadClass> {
        self.entries.get(&key).copied()
    }

    pub fn contains(&self, key: TaskKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskKey, OffloadClass)> + '_ {
        self.entries.iter().map(|(k, c)| (*k, *c))
    }

    /// Keys classified as [`OffloadClass::Unresolved`].
    pub fn unresolved(&self) -> Vec<TaskKey> {
        self.iter()
            .filter(|(_, c)| *c == OffloadClass::Unresolved)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn counts(&self) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for (_, class) in self.iter() {
            match class {
                OffloadClass::Rsu => counts.rsu += 1,
                OffloadClass::Hap => counts.hap += 1,
                OffloadClass::Local => counts.local += 1,
                OffloadClass::Unresolved => counts.unresolved += 1,
            }
        }
        counts
    }

    /// Give every task of `ctx` that has no entry yet a class: `Local` if the
    /// vehicle can finish it within its deadline, `Unresolved` otherwise.
    ///
    /// Returns the number of entries added.
    pub fn classify_remaining(&mut self, ctx: &SimContext) -> usize {
        let mut added = 0usize;
        for key in ctx.task_keys() {
            if self.contains(key) {
                continue;
            }
            let Some((vu, task)) = ctx.task(key) else {
                continue;
            };
            let class = if ctx.network.local_ms(task, vu) <= task.deadline_ms {
                OffloadClass::Local
            } else {
                OffloadClass::Unresolved
            };
            self.insert(key, class);
            added += 1;
        }
        added
    }

    /// Ordered code string, one character per task.
    pub fn to_code_string(&self) -> String {
        self.entries.values().map(|c| c.code()).collect()
    }
}

impl fmt::Display for DecisionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
