//! Dependency Graph / Safe-Delete Analyzer
//!
//! Reference edges between entities, inverted into a petgraph `DiGraph` so
//! "who points at this?" is an incoming-edge lookup. The graph is a pure
//! function of a [`TenantConfig`] snapshot and is rebuilt on demand.
//!
//! Deletion checks are one hop: deleting a program only asks which forms
//! reference it. Callers that cascade must delete bottom-up, re-querying
//! after each step. [`DependencyGraph::transitive_dependents`] is available
//! for planning such cascades but does not affect [`can_delete`].

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::document::TenantConfig;
use crate::issue::EntityType;

/// Graph node: an entity identified by type and id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub id: String,
}

impl EntityRef {
    pub fn new(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self {
            entity_type,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.id)
    }
}

/// One reference from an entity field to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from: EntityRef,
    /// Field holding the reference (`programId`, `formId`, ...)
    pub field: &'static str,
    pub to: EntityRef,
}

/// Every reference in the config: form → program, start_form CTA → form,
/// branch → primary and secondary CTAs. Ordered by source type, then id.
pub fn reference_edges(config: &TenantConfig) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();

    for form in config.forms.values() {
        edges.push(DependencyEdge {
            from: EntityRef::new(EntityType::Form, &form.id),
            field: "programId",
            to: EntityRef::new(EntityType::Program, &form.program_id),
        });
    }

    for cta in config.ctas.values() {
        if let Some(form_id) = cta.action.target_form() {
            edges.push(DependencyEdge {
                from: EntityRef::new(EntityType::Cta, &cta.id),
                field: "formId",
                to: EntityRef::new(EntityType::Form, form_id),
            });
        }
    }

    for branch in config.branches.values() {
        edges.push(DependencyEdge {
            from: EntityRef::new(EntityType::Branch, &branch.id),
            field: "primaryCta",
            to: EntityRef::new(EntityType::Cta, &branch.primary_cta),
        });
        for secondary in &branch.secondary_ctas {
            edges.push(DependencyEdge {
                from: EntityRef::new(EntityType::Branch, &branch.id),
                field: "secondaryCtas",
                to: EntityRef::new(EntityType::Cta, secondary),
            });
        }
    }

    edges
}

/// Entities that directly reference a given entity, bucketed by type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependents {
    pub programs: Vec<String>,
    pub forms: Vec<String>,
    pub ctas: Vec<String>,
    pub branches: Vec<String>,
}

impl Dependents {
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
            && self.forms.is_empty()
            && self.ctas.is_empty()
            && self.branches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.programs.len() + self.forms.len() + self.ctas.len() + self.branches.len()
    }

    fn from_refs<'a>(refs: impl IntoIterator<Item = &'a EntityRef>) -> Self {
        let mut buckets: [BTreeSet<String>; 4] = Default::default();
        for r in refs {
            let slot = match r.entity_type {
                EntityType::Program => 0,
                EntityType::Form => 1,
                EntityType::Cta => 2,
                EntityType::Branch => 3,
                _ => continue,
            };
            buckets[slot].insert(r.id.clone());
        }
        let [programs, forms, ctas, branches] =
            buckets.map(|b| b.into_iter().collect::<Vec<String>>());
        Self {
            programs,
            forms,
            ctas,
            branches,
        }
    }
}

/// Reverse-reference index over one config snapshot
pub struct DependencyGraph {
    /// Edges point from the referencing entity to the referenced one
    graph: DiGraph<EntityRef, &'static str>,
    node_indices: HashMap<EntityRef, NodeIndex>,
}

impl DependencyGraph {
    pub fn build(config: &TenantConfig) -> Self {
        let edges = reference_edges(config);
        let mut graph = DiGraph::with_capacity(edges.len() * 2, edges.len());
        let mut node_indices: HashMap<EntityRef, NodeIndex> = HashMap::new();

        for edge in edges {
            let from = *node_indices
                .entry(edge.from.clone())
                .or_insert_with(|| graph.add_node(edge.from.clone()));
            let to = *node_indices
                .entry(edge.to.clone())
                .or_insert_with(|| graph.add_node(edge.to.clone()));
            graph.add_edge(from, to, edge.field);
        }

        Self { graph, node_indices }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Immediate incoming references
    pub fn refs_in(&self, target: &EntityRef) -> Vec<&EntityRef> {
        let Some(&node_idx) = self.node_indices.get(target) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(node_idx, Direction::Incoming)
            .filter_map(|e| self.graph.node_weight(e.source()))
            .collect()
    }

    /// Immediate outgoing references
    pub fn refs_out(&self, source: &EntityRef) -> Vec<&EntityRef> {
        let Some(&node_idx) = self.node_indices.get(source) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(node_idx, Direction::Outgoing)
            .filter_map(|e| self.graph.node_weight(e.target()))
            .collect()
    }

    /// One-hop dependents of an entity
    pub fn dependents(&self, target: &EntityRef) -> Dependents {
        Dependents::from_refs(self.refs_in(target))
    }

    /// Everything that reaches `target` through any number of references
    pub fn transitive_dependents(&self, target: &EntityRef) -> Dependents {
        let Some(&start) = self.node_indices.get(target) else {
            return Dependents::default();
        };

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        let mut found = Vec::new();

        while let Some(node_idx) = stack.pop() {
            if !visited.insert(node_idx) {
                continue;
            }
            if node_idx != start {
                if let Some(node) = self.graph.node_weight(node_idx) {
                    found.push(node);
                }
            }
            for edge in self.graph.edges_directed(node_idx, Direction::Incoming) {
                stack.push(edge.source());
            }
        }

        Dependents::from_refs(found)
    }
}

/// One-hop dependents of `entity_type`/`entity_id` in `config`
pub fn dependents(config: &TenantConfig, entity_type: EntityType, entity_id: &str) -> Dependents {
    DependencyGraph::build(config).dependents(&EntityRef::new(entity_type, entity_id))
}

/// True iff nothing references the entity
pub fn can_delete(config: &TenantConfig, entity_type: EntityType, entity_id: &str) -> bool {
    dependents(config, entity_type, entity_id).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        ConversationBranch, ConversationalForm, CtaAction, CtaDefinition, Program,
    };

    fn form(id: &str, program: &str) -> ConversationalForm {
        ConversationalForm {
            id: id.into(),
            program_id: program.into(),
            title: id.into(),
            description: String::new(),
            trigger_phrases: vec![id.into()],
            fields: Vec::new(),
        }
    }

    fn cta(id: &str, action: CtaAction) -> CtaDefinition {
        CtaDefinition {
            id: id.into(),
            label: id.into(),
            color: None,
            action,
        }
    }

    fn sample() -> TenantConfig {
        let mut config = TenantConfig::new("acme", "1.0");
        config.programs.insert(
            "p1".into(),
            Program {
                id: "p1".into(),
                name: "P1".into(),
                description: None,
            },
        );
        config.forms.insert("f2".into(), form("f2", "p1"));
        config.forms.insert("f1".into(), form("f1", "p1"));
        config.ctas.insert(
            "apply".into(),
            cta("apply", CtaAction::StartForm { form_id: "f1".into() }),
        );
        config.ctas.insert("info".into(), cta("info", CtaAction::ShowInfo { prompt: "Hi".into() }));
        config.branches.insert(
            "b1".into(),
            ConversationBranch {
                id: "b1".into(),
                detection_keywords: vec!["apply".into()],
                primary_cta: "apply".into(),
                secondary_ctas: vec!["info".into()],
            },
        );
        config
    }

    #[test]
    fn test_dependents_sorted_one_hop() {
        let config = sample();
        let deps = dependents(&config, EntityType::Program, "p1");
        assert_eq!(deps.forms, vec!["f1", "f2"]);
        assert!(deps.ctas.is_empty() && deps.branches.is_empty());
        assert!(!can_delete(&config, EntityType::Program, "p1"));
    }

    #[test]
    fn test_leaf_entities_can_be_deleted() {
        let config = sample();
        assert!(can_delete(&config, EntityType::Branch, "b1"));
        assert!(can_delete(&config, EntityType::Form, "f2"));
        assert!(!can_delete(&config, EntityType::Form, "f1"));
        assert!(can_delete(&config, EntityType::Program, "unknown"));
    }

    #[test]
    fn test_transitive_dependents() {
        let graph = DependencyGraph::build(&sample());
        let deps = graph.transitive_dependents(&EntityRef::new(EntityType::Program, "p1"));
        assert_eq!(deps.forms, vec!["f1", "f2"]);
        assert_eq!(deps.ctas, vec!["apply"]);
        assert_eq!(deps.branches, vec!["b1"]);
    }

    #[test]
    fn test_edges_and_refs_out() {
        let config = sample();
        let edges = reference_edges(&config);
        assert_eq!(edges.len(), 5);

        let graph = DependencyGraph::build(&config);
        assert_eq!(graph.edge_count(), 5);
        let mut out: Vec<String> = graph
            .refs_out(&EntityRef::new(EntityType::Branch, "b1"))
            .into_iter()
            .map(ToString::to_string)
            .collect();
        out.sort();
        assert_eq!(out, vec!["cta:apply", "cta:info"]);
    }
}
