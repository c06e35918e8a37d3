//! Referential Integrity Checker
//!
//! Walks every reference-bearing field of a validated [`TenantConfig`] and
//! reports references to entities that do not exist, plus feature flags
//! that are switched on while the collection backing them is empty.
//!
//! Output is sorted by entity type, entity id, then field, so two runs over
//! the same document produce identical lists.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::{BTreeSet, HashMap};

use crate::dependency::reference_edges;
use crate::document::TenantConfig;
use crate::issue::{sort_issues, EntityType, ValidationIssue};

/// A feature flag and the collection it needs to be useful
#[derive(Debug, Clone, Copy)]
pub struct FeatureDependency {
    pub flag: &'static str,
    pub collection: EntityType,
}

pub const FEATURE_DEPENDENCIES: &[FeatureDependency] = &[
    FeatureDependency {
        flag: "conversational_forms",
        collection: EntityType::Form,
    },
    FeatureDependency {
        flag: "conversation_branching",
        collection: EntityType::Branch,
    },
    FeatureDependency {
        flag: "smart_cta",
        collection: EntityType::Cta,
    },
];

/// Check every cross-entity reference in `config`
pub fn check_references(config: &TenantConfig) -> Vec<ValidationIssue> {
    ReferenceChecker::new(config).check()
}

/// Cross-reference checker with optional "did you mean" suggestions
pub struct ReferenceChecker<'a> {
    config: &'a TenantConfig,
    suggest_fixes: bool,
}

impl<'a> ReferenceChecker<'a> {
    pub fn new(config: &'a TenantConfig) -> Self {
        Self {
            config,
            suggest_fixes: true,
        }
    }

    pub fn suggest_fixes(mut self, enabled: bool) -> Self {
        self.suggest_fixes = enabled;
        self
    }

    pub fn check(&self) -> Vec<ValidationIssue> {
        let index = self.build_index();
        let mut issues = Vec::new();

        for edge in reference_edges(self.config) {
            let exists = index
                .get(&edge.to.entity_type)
                .is_some_and(|ids| ids.contains(edge.to.id.as_str()));
            if exists {
                continue;
            }

            let mut issue = ValidationIssue::error(
                edge.from.entity_type,
                edge.from.id.clone(),
                format!("references non-existent {}", edge.to.entity_type),
            )
            .with_field(edge.field);

            if self.suggest_fixes {
                if let Some(fix) = suggest(&index, edge.to.entity_type, &edge.to.id) {
                    issue = issue.with_suggestion(fix);
                }
            }
            issues.push(issue);
        }

        issues.extend(self.check_features());
        sort_issues(&mut issues);
        issues
    }

    fn build_index(&self) -> HashMap<EntityType, BTreeSet<&'a str>> {
        [EntityType::Program, EntityType::Form, EntityType::Cta, EntityType::Branch]
            .into_iter()
            .map(|t| (t, self.config.ids(t).into_iter().collect()))
            .collect()
    }

    fn check_features(&self) -> Vec<ValidationIssue> {
        FEATURE_DEPENDENCIES
            .iter()
            .filter(|dep| {
                self.config.feature_enabled(dep.flag)
                    && self.config.collection_len(dep.collection) == 0
            })
            .map(|dep| {
                let section = dep.collection.collection_key().unwrap_or_default();
                ValidationIssue::warning(
                    EntityType::Feature,
                    dep.flag,
                    format!("feature is enabled but {} is empty", section),
                )
                .with_suggestion(format!(
                    "add at least one {} or disable {}",
                    dep.collection, dep.flag
                ))
            })
            .collect()
    }
}

/// Closest existing id of the target type, if any looks similar
fn suggest(
    index: &HashMap<EntityType, BTreeSet<&str>>,
    target: EntityType,
    missing: &str,
) -> Option<String> {
    let candidates = index.get(&target)?;
    if candidates.is_empty() {
        return Some(format!("create {} '{}' or remove the reference", target, missing));
    }

    let matcher = SkimMatcherV2::default();
    let best = candidates
        .iter()
        .filter_map(|c| matcher.fuzzy_match(c, missing).map(|score| (score, *c)))
        .max_by_key(|(score, _)| *score)
        .or_else(|| {
            candidates
                .iter()
                .filter_map(|c| matcher.fuzzy_match(missing, c).map(|score| (score, *c)))
                .max_by_key(|(score, _)| *score)
        });

    best.map(|(_, id)| format!("did you mean '{}'?", id))
}
