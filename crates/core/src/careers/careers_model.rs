//! Career catalog domain models.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Numeric identifier of a career in the catalog.
pub type CareerId = i64;

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub id: CareerId,
    pub name: String,
}

/// Canonical form used when comparing career display names.
pub fn normalize_career_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lookup tables over the career catalog, built once per resolution.
#[derive(Debug, Clone, Default)]
pub struct CareerIndex {
    names_by_id: HashMap<CareerId, String>,
    ids_by_name: HashMap<String, Vec<CareerId>>,
}

impl CareerIndex {
    pub fn new(careers: Vec<Career>) -> Self {
        let mut index = CareerIndex::default();
        for career in careers {
            let normalized = normalize_career_name(&career.name);
            if normalized.is_empty() {
                continue;
            }
            index
                .ids_by_name
                .entry(normalized.clone())
                .or_default()
                .push(career.id);
            index.names_by_id.insert(career.id, normalized);
        }
        index
    }

    /// Normalized display name for a career id.
    pub fn name_of(&self, id: CareerId) -> Option<&str> {
        self.names_by_id.get(&id).map(String::as_str)
    }

    /// All ids whose display name matches `name` after normalization.
    pub fn ids_named(&self, name: &str) -> &[CareerId] {
        self.ids_by_name
            .get(&normalize_career_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Builds the target set for a posting's career ids.
    pub fn targets_for(&self, ids: &[CareerId]) -> TargetCareers {
        let names = ids
            .iter()
            .filter_map(|id| self.name_of(*id))
            .map(str::to_string)
            .collect();
        TargetCareers {
            ids: ids.iter().copied().collect(),
            names,
        }
    }
}

/// The careers a posting targets, expressed both ways enrollment sources
/// may refer to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCareers {
    pub ids: HashSet<CareerId>,
    /// Normalized display names of `ids`, as resolved through the catalog.
    pub names: HashSet<String>,
}

impl TargetCareers {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.names.is_empty()
    }

    /// Match by exact id, or by display name when the row only carries a name
    /// (or carries an id the catalog knows under a target's name).
    pub fn matches(&self, career_id: Option<CareerId>, career_name: Option<&str>) -> bool {
        if let Some(id) = career_id {
            if self.ids.contains(&id) {
                return true;
            }
        }
        career_name
            .map(normalize_career_name)
            .is_some_and(|name| !name.is_empty() && self.names.contains(&name))
    }

    pub fn sorted_ids(&self) -> Vec<CareerId> {
        let mut ids: Vec<CareerId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }
}
