//! Bottom-up costing over the module instantiation graph.

use super::*;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{ DiGraph, NodeIndex };
use petgraph::Direction::{ Incoming, Outgoing };
use std::collections::{ BTreeSet, HashMap };

/// Resolves module transistor counts against a [CostRegistry].
///
/// Every resolved module is written back to the registry, so a
/// resolver can be fed several batches, later ones instantiating
/// modules of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    registry: CostRegistry,
}

impl Resolver {
    pub fn new(registry: CostRegistry) -> Resolver {
        Resolver { registry }
    }

    #[inline]
    pub fn registry(&self) -> &CostRegistry {
        &self.registry
    }

    #[inline]
    pub fn into_registry(self) -> CostRegistry {
        self.registry
    }

    /// Builds the dependency graph of `modules`, with an edge from
    /// each instantiated module to the module instantiating it.
    ///
    /// Primitives, and modules the registry already knows, add no
    /// edge. Any other component name is an error.
    fn build_graph(
        &self, modules: &[Module]
    ) -> Result<DiGraph<usize, ()>, TransCountError> {
        let name2idx: HashMap<&str, usize> = modules.iter().enumerate()
            .map(|(i, m)| (m.name.as_str(), i))
            .collect();
        let mut graph = DiGraph::<usize, ()>::with_capacity(modules.len(), 0);
        for i in 0..modules.len() {
            graph.add_node(i);
        }
        for (i, m) in modules.iter().enumerate() {
            for inst in &m.instances {
                let comp = inst.component.as_str();
                if self.registry.primitive(comp).is_some() {
                    continue
                }
                match name2idx.get(comp) {
                    Some(&dep) => {
                        graph.update_edge(NodeIndex::new(dep), NodeIndex::new(i), ());
                    },
                    None if self.registry.module_cost(comp).is_some() => {},
                    None => return Err(TransCountError::UnknownComponent {
                        module: m.name.clone(),
                        component: inst.component.clone(),
                    })
                }
            }
        }
        Ok(graph)
    }

    /// Picks a real cycle among the modules left unresolved, to name
    /// it in the error.
    fn cycle_error(
        graph: &DiGraph<usize, ()>, modules: &[Module], left: &[bool]
    ) -> TransCountError {
        let mut sccs: Vec<Vec<usize>> = tarjan_scc(graph).into_iter()
            .map(|scc| {
                let mut v: Vec<usize> = scc.into_iter().map(|n| graph[n]).collect();
                v.sort_unstable();
                v
            })
            .filter(|scc| left[scc[0]] && (
                scc.len() > 1 || graph.contains_edge(
                    NodeIndex::new(scc[0]), NodeIndex::new(scc[0]))))
            .collect();
        sccs.sort_unstable();
        // a node left over implies a cycle upstream of it.
        let cycle = sccs.into_iter().next().unwrap_or_default();
        TransCountError::DependencyCycle {
            module: cycle.first().map(|&i| modules[i].name.clone()).unwrap_or_default(),
            cycle: cycle.iter().map(|&i| modules[i].name.clone()).collect(),
        }
    }

    /// Sum of instance and assign costs, with every instance already
    /// known to the registry.
    fn module_cost(&self, m: &Module) -> Result<u64, TransCountError> {
        let mut total = m.assign_transistors();
        for inst in &m.instances {
            let comp = self.registry.lookup(&inst.component)
                .ok_or_else(|| TransCountError::UnknownComponent {
                    module: m.name.clone(),
                    component: inst.component.clone(),
                })?;
            total = comp.cost(inst.input_count)
                .and_then(|c| total.checked_add(c))
                .ok_or_else(|| TransCountError::CountOverflow { module: m.name.clone() })?;
        }
        Ok(total)
    }

    /// Resolves all `modules` and returns them in resolution order:
    /// every module comes after all modules it instantiates, and
    /// among modules ready at the same time source order wins.
    ///
    /// Modules resolved earlier keep their count, which is recorded
    /// in the registry if it is not there yet.
    ///
    /// Fails without resolving anything if a module instantiates an
    /// unknown component or the instantiation graph has a cycle. A
    /// count overflowing `u64` stops resolution at that module, with
    /// the modules before it already recorded.
    pub fn resolve(&mut self, modules: Vec<Module>) -> Result<Vec<Module>, TransCountError> {
        let timer = clilog::stimer!("resolve");
        let graph = self.build_graph(&modules)?;

        let mut indegree: Vec<usize> = graph.node_indices()
            .map(|n| graph.neighbors_directed(n, Incoming).count())
            .collect();
        let mut ready: BTreeSet<usize> = indegree.iter().enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();
        let mut order = Vec::with_capacity(modules.len());
        while let Some(i) = ready.pop_first() {
            order.push(i);
            for next in graph.neighbors_directed(NodeIndex::new(i), Outgoing) {
                let j = graph[next];
                indegree[j] -= 1;
                if indegree[j] == 0 {
                    ready.insert(j);
                }
            }
        }
        if order.len() != modules.len() {
            let mut left = vec![true; modules.len()];
            for &i in &order {
                left[i] = false;
            }
            return Err(Resolver::cycle_error(&graph, &modules, &left))
        }

        let mut slots: Vec<Option<Module>> = modules.into_iter().map(Some).collect();
        let mut resolved = Vec::with_capacity(slots.len());
        for i in order {
            let Some(mut m) = slots[i].take() else { continue };
            if m.is_resolved() {
                let count = m.transistor_count.unwrap_or_default();
                if self.registry.module_cost(&m.name) != Some(count) {
                    self.registry.record_module(&m.name, count);
                }
                clilog::debug!("module {} already resolved: {} transistors", m.name, count);
                resolved.push(m);
                continue
            }
            let count = self.module_cost(&m)?;
            m.set_transistor_count(count);
            self.registry.record_module(&m.name, count);
            clilog::debug!("resolved module {}: {} transistors", m.name, count);
            resolved.push(m);
        }
        clilog::finish!(timer);
        Ok(resolved)
    }
}
