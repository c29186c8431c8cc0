////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::collections::HashMap;

use indexmap::IndexMap;

/// One admitted command, in the order it was admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRecord {
    pub scope: String,
    pub name: String,
}

/// Result of [`CommandRegistry::admit`]. Both lists keep the candidate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Admission {
    pub admitted: Vec<String>,
    pub duplicates: Vec<String>,
}

/// Tracks which scope (version or extension group) first claimed each command name during one
/// generation run, and hands out the export ordinals.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    /// name -> index into `log`
    claimed: HashMap<String, usize>,
    log: Vec<AdmissionRecord>,
    per_scope: IndexMap<String, Vec<String>>,
    ordinal: u32,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        CommandRegistry {
            claimed: HashMap::new(),
            log: Vec::new(),
            per_scope: IndexMap::new(),
            ordinal: 1,
        }
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims every candidate that no earlier scope claimed; the rest come back as duplicates.
    pub fn admit(&mut self, scope: &str, candidates: &[String]) -> Admission {
        let mut admission = Admission::default();
        let scope_commands = self.per_scope.entry(scope.to_owned()).or_default();

        for name in candidates {
            if self.claimed.contains_key(name) {
                admission.duplicates.push(name.clone());
                continue;
            }

            self.claimed.insert(name.clone(), self.log.len());
            self.log.push(AdmissionRecord {
                scope: scope.to_owned(),
                name: name.clone(),
            });
            scope_commands.push(name.clone());
            admission.admitted.push(name.clone());
        }

        trace!(
            "{}: admitted {}, {} already defined",
            scope,
            admission.admitted.len(),
            admission.duplicates.len()
        );
        admission
    }

    /// Returns the current ordinal and advances the counter.
    pub fn next_ordinal(&mut self) -> u32 {
        let ordinal = self.ordinal;
        self.ordinal += 1;
        ordinal
    }

    /// Number of ordinals handed out so far.
    pub fn ordinals_assigned(&self) -> u32 {
        self.ordinal - 1
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains_key(name)
    }

    /// The scope that first claimed `name`.
    pub fn claimed_by(&self, name: &str) -> Option<&str> {
        self.claimed.get(name).map(|&index| self.log[index].scope.as_str())
    }

    /// Commands first claimed by `scope`, in admission order.
    pub fn commands(&self, scope: &str) -> &[String] {
        self.per_scope.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.per_scope.keys().map(String::as_str)
    }

    /// All claimed commands, scope by scope in the order the scopes were first seen.
    pub fn all_commands(&self) -> Vec<&str> {
        self.per_scope
            .values()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect()
    }

    /// The admission log.
    pub fn admitted(&self) -> &[AdmissionRecord] {
        &self.log
    }

    /// `"Invalid"` followed by the entry point names (command name without its 2 character
    /// prefix) of every claimed command, sorted.
    pub fn entry_point_enum(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .all_commands()
            .into_iter()
            .map(|name| name.get(2..).unwrap_or(name).to_owned())
            .collect();
        names.sort();
        names.insert(0, "Invalid".to_owned());
        names
    }
}
