use super::{Graph, NodeId};
use crate::error::MiniflowError;
use crate::matrix::Matrix;
use crate::scalar::Element;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Values bound to the root Input nodes before sorting.
///
/// A `BTreeMap` keeps iteration (and therefore discovery) order deterministic.
pub type Bindings<T = f64> = BTreeMap<NodeId, Matrix<T>>;

/// Read-only adjacency view consumed by [`topological_order`].
pub trait Topology {
    /// Number of addressable nodes; valid handles are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Nodes `id` depends on.
    fn inbound(&self, id: NodeId) -> &[NodeId];

    /// Nodes that consume `id`.
    fn outbound(&self, id: NodeId) -> &[NodeId];
}

impl<T: Element> Topology for Graph<T> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn inbound(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].inbound
    }

    fn outbound(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].outbound
    }
}

/// Orders every node reachable from `roots` so that each node comes after all of its
/// (reachable) inbound nodes.
///
/// Reachability follows outbound edges breadth-first from the roots, in the order given.
/// Ordering is Kahn's algorithm over the discovered set; among ready nodes the one
/// discovered first is emitted first, so identical graphs always sort identically.
///
/// # Errors
/// * `UnknownNode` if a root is not a valid handle.
/// * `CyclicGraph` if some discovered node can never become ready.
pub fn topological_order<G: Topology + ?Sized>(
    graph: &G,
    roots: &[NodeId],
) -> Result<Vec<NodeId>, MiniflowError> {
    for &root in roots {
        if root.0 >= graph.node_count() {
            return Err(MiniflowError::UnknownNode(root));
        }
    }

    // Discovery: rank of each reachable node, in BFS order.
    let mut rank: HashMap<NodeId, usize> = HashMap::new();
    let mut discovered: Vec<NodeId> = Vec::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for &root in roots {
        if !rank.contains_key(&root) {
            rank.insert(root, discovered.len());
            discovered.push(root);
            queue.push_back(root);
        }
    }
    while let Some(id) = queue.pop_front() {
        for &consumer in graph.outbound(id) {
            if !rank.contains_key(&consumer) {
                rank.insert(consumer, discovered.len());
                discovered.push(consumer);
                queue.push_back(consumer);
            }
        }
    }

    // In-degree over distinct discovered sources only.
    let mut in_degree: Vec<usize> = Vec::with_capacity(discovered.len());
    for &id in &discovered {
        let mut sources: Vec<NodeId> = graph.inbound(id).to_vec();
        sources.sort_unstable();
        sources.dedup();
        let total = sources.len();
        sources.retain(|source| rank.contains_key(source));
        if sources.len() < total {
            log::warn!(
                "topological_sort: node {} has {} inbound node(s) not reachable from the bound roots",
                id,
                total - sources.len()
            );
        }
        in_degree.push(sources.len());
    }

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &degree)| degree == 0)
        .map(|(r, _)| r)
        .collect();
    let mut order = Vec::with_capacity(discovered.len());
    let mut placed = vec![false; discovered.len()];

    while let Some(r) = ready.pop_first() {
        let id = discovered[r];
        order.push(id);
        placed[r] = true;
        let mut consumers: Vec<NodeId> = graph.outbound(id).to_vec();
        consumers.sort_unstable();
        consumers.dedup();
        for consumer in consumers {
            let cr = rank[&consumer];
            if placed[cr] || in_degree[cr] == 0 {
                continue;
            }
            in_degree[cr] -= 1;
            if in_degree[cr] == 0 {
                ready.insert(cr);
            }
        }
    }

    if order.len() != discovered.len() {
        let unplaced: Vec<NodeId> = discovered
            .iter()
            .zip(placed.iter())
            .filter(|(_, &done)| !done)
            .map(|(&id, _)| id)
            .collect();
        return Err(MiniflowError::CyclicGraph { unplaced });
    }
    Ok(order)
}

impl<T: Element> Graph<T> {
    /// Binds the root Inputs and returns every node reachable from them in dependency order.
    ///
    /// Bound values are written to the roots before the order is computed, so the first
    /// forward pass can run straight away. Every recorded gradient in the graph is
    /// cleared, so a node left out of the new order cannot keep a stale total.
    ///
    /// # Errors
    /// * `UnknownNode` / `NotAnInput` if a binding key is not an Input of this graph.
    /// * `CyclicGraph` as in [`topological_order`].
    pub fn topological_sort(&mut self, bindings: Bindings<T>) -> Result<Vec<NodeId>, MiniflowError> {
        let roots: Vec<NodeId> = bindings.keys().copied().collect();
        for node in &mut self.nodes {
            node.gradients.clear();
        }
        for (id, value) in bindings {
            self.set_value(id, value)?;
        }
        let order = topological_order(self, &roots)?;
        log::debug!(
            "topological_sort: {} root(s), {} node(s) ordered",
            roots.len(),
            order.len()
        );
        Ok(order)
    }
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod tests;
