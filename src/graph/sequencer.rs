//! Dependency-respecting ordering of build units.
//!
//! Aggregate descriptors list their units in build order: every unit comes
//! after all units it depends on. The sequencer places units greedily,
//! preferring libraries over executables when several are eligible, and
//! reports the exact cyclic core when no order exists.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, trace};

use super::DependencyMap;
use crate::core::GenerationError;

/// Orders the units of a [`DependencyMap`].
///
/// Edges point from a dependent unit to the unit it depends on, so a unit is
/// eligible once none of its outgoing neighbors are still unplaced.
pub struct Sequencer<'a> {
    map: &'a DependencyMap,
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl<'a> Sequencer<'a> {
    /// Build the project-to-project graph for `map`.
    pub fn new(map: &'a DependencyMap) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for name in map.names() {
            let index = graph.add_node(name.to_string());
            node_map.insert(name.to_string(), index);
        }

        for unit in map.units() {
            let from = node_map[&unit.name];
            for dep in map.project_dependencies(unit) {
                let to = node_map[&dep.name];
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self {
            map,
            graph,
            node_map,
        }
    }

    /// Number of project-to-project edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Compute the build order.
    ///
    /// Candidates are scanned in name order. The first eligible library is
    /// placed; if no library is eligible, the first eligible unit of any kind.
    ///
    /// # Errors
    ///
    /// [`GenerationError::CyclicDependency`] naming the cyclic core and its
    /// in-core edges when the remaining units cannot be placed.
    pub fn order(&self) -> Result<Vec<String>, GenerationError> {
        let mut unplaced: BTreeSet<&str> = self.map.names().collect();
        let mut order = Vec::with_capacity(unplaced.len());

        while !unplaced.is_empty() {
            let mut fallback = None;
            let mut chosen = None;

            for &name in &unplaced {
                if !self.is_eligible(name, &unplaced) {
                    continue;
                }
                let is_library =
                    self.map.get(name).is_some_and(|unit| unit.output_type.is_library());
                if is_library {
                    chosen = Some(name);
                    break;
                }
                fallback.get_or_insert(name);
            }

            let Some(next) = chosen.or(fallback) else {
                return Err(self.cycle_error(&unplaced));
            };

            trace!("Placing {} at position {}", next, order.len());
            unplaced.remove(next);
            order.push(next.to_string());
        }

        debug!("Sequenced {} units", order.len());
        Ok(order)
    }

    fn is_eligible(&self, name: &str, unplaced: &BTreeSet<&str>) -> bool {
        let index = self.node_map[name];
        self.graph
            .neighbors_directed(index, Direction::Outgoing)
            .all(|dep| !unplaced.contains(self.graph[dep].as_str()))
    }

    /// Strip units that no other remaining unit references, until stable.
    ///
    /// Each stalled unit still depends on another stalled unit, so what is
    /// left has an in-core successor and an in-core predecessor for every
    /// member.
    pub fn cyclic_core(&self, remaining: &BTreeSet<&str>) -> BTreeSet<String> {
        let mut core: BTreeSet<String> = remaining.iter().map(|s| (*s).to_string()).collect();

        loop {
            let leaves: Vec<String> = core
                .iter()
                .filter(|name| {
                    let index = self.node_map[name.as_str()];
                    !self
                        .graph
                        .neighbors_directed(index, Direction::Incoming)
                        .any(|dependent| core.contains(&self.graph[dependent]))
                })
                .cloned()
                .collect();

            if leaves.is_empty() {
                break;
            }
            for leaf in leaves {
                trace!("{} is blocked by the cycle but not part of it", leaf);
                core.remove(&leaf);
            }
        }

        core
    }

    fn cycle_error(&self, unplaced: &BTreeSet<&str>) -> GenerationError {
        let core = self.cyclic_core(unplaced);
        let mut edges = BTreeMap::new();

        for name in &core {
            let index = self.node_map[name.as_str()];
            let mut deps: Vec<String> = self
                .graph
                .neighbors_directed(index, Direction::Outgoing)
                .map(|dep| self.graph[dep].clone())
                .filter(|dep| core.contains(dep))
                .collect();
            deps.sort();
            edges.insert(name.clone(), deps);
        }

        GenerationError::CyclicDependency {
            core: core.into_iter().collect(),
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildUnit, OutputType};
    use std::path::Path;

    fn map(text: &str) -> DependencyMap {
        DependencyMap::parse(Path::new("deps.txt"), text).unwrap()
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    fn assert_respects_dependencies(map: &DependencyMap, order: &[String]) {
        for unit in map.units() {
            for dep in map.project_dependencies(unit) {
                assert!(
                    position(order, &dep.name) < position(order, &unit.name),
                    "{} must come before {}",
                    dep.name,
                    unit.name
                );
            }
        }
    }

    #[test]
    fn test_simple_chain() {
        let map = map("A,Library\nB,Library\n  A\nC,Exe\n  B\n");
        let order = Sequencer::new(&map).order().unwrap();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_dependencies_reorder_names() {
        let map = map("A,Library\n  C\nB,Library\n  A\nC,Library\n");
        let order = Sequencer::new(&map).order().unwrap();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_libraries_preferred_over_executables() {
        // Both are eligible from the start; the library wins despite sorting later.
        let map = map("App,Exe\nZLib,Library\n");
        let order = Sequencer::new(&map).order().unwrap();
        assert_eq!(order, vec!["ZLib", "App"]);
    }

    #[test]
    fn test_executable_placed_when_no_library_eligible() {
        let map = map("Lib,Library\n  Tool\nTool,Exe\n");
        let order = Sequencer::new(&map).order().unwrap();
        assert_eq!(order, vec!["Tool", "Lib"]);
    }

    #[test]
    fn test_diamond() {
        let map = map("A,Exe\n  B\n  C\nB,Library\n  D\nC,Library\n  D\nD,Library\n");
        let order = Sequencer::new(&map).order().unwrap();
        assert_eq!(order.len(), 4);
        assert_respects_dependencies(&map, &order);
    }

    #[test]
    fn test_external_references_do_not_constrain_order() {
        let map = map("B,Library\n  System.Xml\nA,Library\n  B\n  System.Data\n");
        let sequencer = Sequencer::new(&map);
        assert_eq!(sequencer.edge_count(), 1);
        assert_eq!(sequencer.order().unwrap(), vec!["B", "A"]);
    }

    #[test]
    fn test_reference_by_output_name_is_an_edge() {
        let map = map("Client,WinExe,PetraClient\nPlugin,Library\n  PetraClient\n");
        let order = Sequencer::new(&map).order().unwrap();
        assert_eq!(order, vec!["Client", "Plugin"]);
    }

    #[test]
    fn test_two_cycle_reports_both_edges() {
        let map = map("A,Library\n  B\nB,Library\n  A\n");
        let err = Sequencer::new(&map).order().unwrap_err();

        match err {
            GenerationError::CyclicDependency { core, edges } => {
                assert_eq!(core, vec!["A", "B"]);
                assert_eq!(edges["A"], vec!["B"]);
                assert_eq!(edges["B"], vec!["A"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_units_blocked_by_cycle_are_not_reported() {
        // D and E depend on the A-B-C cycle but are not part of it; Free is placeable.
        let map = map(
            "A,Library\n  B\nB,Library\n  C\nC,Library\n  A\nD,Exe\n  A\nE,Library\n  D\nFree,Library\n",
        );
        let err = Sequencer::new(&map).order().unwrap_err();

        match err {
            GenerationError::CyclicDependency { core, edges } => {
                assert_eq!(core, vec!["A", "B", "C"]);
                assert_eq!(edges["A"], vec!["B"]);
                assert_eq!(edges["B"], vec!["C"]);
                assert_eq!(edges["C"], vec!["A"]);
                assert!(!edges.contains_key("D"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reported_core_members_have_in_core_neighbors() {
        let map = map("A,Library\n  B\nB,Library\n  A\n  C\nC,Library\n  D\nD,Library\n  C\nX,Exe\n  C\n");
        let err = Sequencer::new(&map).order().unwrap_err();

        let GenerationError::CyclicDependency { core, edges } = err else {
            panic!("expected a cycle");
        };
        for name in &core {
            assert!(!edges[name].is_empty(), "{name} has no in-core dependency");
            assert!(
                edges.values().any(|deps| deps.contains(name)),
                "{name} is not depended upon inside the core"
            );
        }
        assert!(!core.contains(&"X".to_string()));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut map = DependencyMap::default();
        let mut unit = BuildUnit::new("Self", OutputType::Library);
        unit.references.push("Self".to_string());
        map.add_unit(unit);

        let err = Sequencer::new(&map).order().unwrap_err();
        assert!(err.to_string().contains("Self -> Self"));
    }

    #[test]
    fn test_empty_map() {
        let map = DependencyMap::default();
        assert!(Sequencer::new(&map).order().unwrap().is_empty());
    }
}
