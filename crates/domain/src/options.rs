// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Selectable evaluation options: roles, target groups and variants.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Target groups offered before any user targets are known.
pub const DEFAULT_TARGETS: &[&str] = &["U21", "NT"];

/// Variants offered before any user targets are known.
pub const DEFAULT_VARIANTS: &[&str] = &["Normal"];

/// Variants always offered once user targets have been merged.
pub const BUILT_IN_VARIANTS: &[&str] = &["Counter-attack", "PNF"];

/// A selectable role and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    pub label: String,
    pub value: String,
}

impl RoleOption {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// The selectable roles, in display order.
#[must_use]
pub fn role_options() -> Vec<RoleOption> {
    vec![
        RoleOption::new("Centrocampista (Midfielder)", "midfielder"),
        RoleOption::new("Difensore (Defender)", "defender"),
        RoleOption::new("Terzino (Wingback)", "wingback"),
        RoleOption::new("Attaccante (Forward)", "forward"),
        RoleOption::new("Ala (Winger)", "winger"),
        RoleOption::new("Portiere (Goalkeeper)", "goalkeeper"),
    ]
}

/// A user-defined skill target stored in the remote data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: String,
    pub name: String,
    pub variant: String,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

/// The option lists presented for role, target group and variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    pub roles: Vec<RoleOption>,
    pub targets: Vec<String>,
    pub variants: Vec<String>,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            roles: role_options(),
            targets: DEFAULT_TARGETS.iter().map(ToString::to_string).collect(),
            variants: DEFAULT_VARIANTS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl EvaluationOptions {
    /// Adds the names and variants of user targets to the option lists.
    ///
    /// Targets become the current targets followed by each user target name.
    /// Variants become the current variants, each user target variant, then
    /// the built-in variants. Duplicates keep their first position.
    #[must_use]
    pub fn merge_user_targets(mut self, user_targets: &[UserTarget]) -> Self {
        self.targets = dedup_in_order(
            self.targets
                .into_iter()
                .chain(user_targets.iter().map(|t| t.name.clone())),
        );
        self.variants = dedup_in_order(
            self.variants
                .into_iter()
                .chain(user_targets.iter().map(|t| t.variant.clone()))
                .chain(BUILT_IN_VARIANTS.iter().map(ToString::to_string)),
        );
        self
    }
}

fn dedup_in_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}
