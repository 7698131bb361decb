/*!
# Single-Source Shortest Paths

- [`Dijkstra`]: binary heap with lazy deletion, optional early stop at a target and multiple sources
  (distance to the *nearest* source). Requires non-negative weights.
- [`BellmanFord`]: `n - 1` relaxation rounds with early exit; supports negative weights and reports a
  reachable negative cycle as [`Error::NegativeCycle`].
- [`ShortestPaths::a_star`]: goal-directed search guided by a heuristic.

Results are returned as a [`ShortestPathTree`] where unreachable nodes have distance `None`.
*/

use std::collections::BinaryHeap;

use num::Zero;
use tracing::{debug, warn};

use super::*;

/// Distances and predecessors computed by a single-source (or multi-source) shortest path algorithm
#[derive(Clone, Debug)]
pub struct ShortestPathTree<W> {
    sources: Vec<Node>,
    dist: Vec<Option<W>>,
    pred: Vec<Option<OptionalNode>>,
}

impl<W: Weight> ShortestPathTree<W> {
    fn new(n: NumNodes, sources: Vec<Node>) -> Self {
        let mut dist = vec![None; n as usize];
        for &s in &sources {
            dist[s as usize] = Some(W::zero());
        }
        Self {
            sources,
            dist,
            pred: vec![None; n as usize],
        }
    }

    /// Returns the source the tree was grown from (the first one if there are multiple)
    pub fn source(&self) -> Node {
        self.sources[0]
    }

    /// Returns all sources
    pub fn sources(&self) -> &[Node] {
        &self.sources
    }

    /// Returns the distance from the (nearest) source to `v` or `None` if `v` is unreachable.
    /// ** Panics if `v >= n` **
    pub fn distance_to(&self, v: Node) -> Option<W> {
        self.dist[v as usize]
    }

    /// Returns *true* if `v` was reached
    /// ** Panics if `v >= n` **
    pub fn is_reachable(&self, v: Node) -> bool {
        self.dist[v as usize].is_some()
    }

    /// Returns the predecessor of `v` on a shortest path (`None` for sources and unreachable nodes)
    /// ** Panics if `v >= n` **
    pub fn predecessor_of(&self, v: Node) -> Option<Node> {
        self.pred[v as usize].map(|p| p.get())
    }

    /// Returns a shortest path from the (nearest) source to `v`, including both endpoints,
    /// or `None` if `v` is unreachable.
    /// ** Panics if `v >= n` **
    pub fn path_to(&self, v: Node) -> Option<Vec<Node>> {
        self.dist[v as usize]?;

        let mut path = vec![v];
        let mut node = v;
        while let Some(p) = self.predecessor_of(node) {
            path.push(p);
            node = p;
        }
        path.reverse();
        Some(path)
    }

    /// Returns the source from which `v` was reached
    pub fn root_of(&self, v: Node) -> Option<Node> {
        self.path_to(v).map(|p| p[0])
    }

    /// Returns the distance array
    pub fn distances(&self) -> &[Option<W>] {
        &self.dist
    }

    /// Iterates over all reached nodes together with their distance
    pub fn reachable(&self) -> impl Iterator<Item = (Node, W)> + '_ {
        self.dist
            .iter()
            .enumerate()
            .filter_map(|(v, d)| d.map(|d| (v as Node, d)))
    }

    /// Returns the reached node with the smallest distance that satisfies `filter`.
    /// Ties are broken by the smaller node.
    pub fn closest<F>(&self, mut filter: F) -> Option<(Node, W)>
    where
        F: FnMut(Node) -> bool,
    {
        self.reachable()
            .filter(|&(v, _)| filter(v))
            .min_by(|a, b| cmp_weights(&a.1, &b.1).then(a.0.cmp(&b.0)))
    }
}

/// Dijkstra's algorithm with a lazy-deletion binary heap.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let g = AdjArray::<u32>::from_edges(4, [(0, 1, 1), (1, 2, 1), (0, 2, 5), (2, 3, 1)]);
///
/// let tree = Dijkstra::new(&g, 0).stop_at(2).run();
/// assert_eq!(tree.distance_to(2), Some(2));
/// assert_eq!(tree.path_to(2), Some(vec![0, 1, 2]));
/// ```
pub struct Dijkstra<'a, G> {
    graph: &'a G,
    sources: Vec<Node>,
    stop_at: Option<Node>,
}

impl<G> WithGraphRef<G> for Dijkstra<'_, G> {
    fn graph_ref(&self) -> &G {
        self.graph
    }
}

impl<'a, G> Dijkstra<'a, G>
where
    G: WeightedAdjacencyList<Weight: Weight>,
{
    /// Prepares a search from `source`
    /// ** Panics if `source >= n` **
    pub fn new(graph: &'a G, source: Node) -> Self {
        assert!(source < graph.number_of_nodes());
        Self {
            graph,
            sources: vec![source],
            stop_at: None,
        }
    }

    /// Adds another source: distances are then measured to the nearest source
    pub fn add_source(&mut self, source: Node) {
        assert!(source < self.graph.number_of_nodes());
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }

    /// Builder variant of [`Dijkstra::add_source`]
    pub fn with_source(mut self, source: Node) -> Self {
        self.add_source(source);
        self
    }

    /// Stops the search once `target` is settled. Distances of nodes settled after `target`
    /// (and their paths) are then not final.
    pub fn set_stop_at(&mut self, target: Node) {
        self.stop_at = Some(target);
    }

    /// Builder variant of [`Dijkstra::set_stop_at`]
    pub fn stop_at(mut self, target: Node) -> Self {
        self.set_stop_at(target);
        self
    }

    /// Runs the search
    pub fn run(&self) -> ShortestPathTree<G::Weight> {
        let mut tree = ShortestPathTree::new(self.graph.number_of_nodes(), self.sources.clone());
        let mut settled = self.graph.vertex_bitset_unset();

        let mut heap: BinaryHeap<_> = self
            .sources
            .iter()
            .map(|&s| MinScored(G::Weight::zero(), s))
            .collect();

        while let Some(MinScored(d, u)) = heap.pop() {
            if settled.set_bit(u) {
                continue;
            }

            if self.stop_at == Some(u) {
                break;
            }

            for (v, w) in self.graph.weighted_neighbors_of(u) {
                debug_assert!(w >= G::Weight::zero(), "Dijkstra requires non-negative weights");
                if settled.get_bit(v) {
                    continue;
                }

                let nd = d + w;
                if tree.dist[v as usize].is_none_or(|old| nd < old) {
                    tree.dist[v as usize] = Some(nd);
                    tree.pred[v as usize] = OptionalNode::new(u);
                    heap.push(MinScored(nd, v));
                }
            }
        }

        tree
    }
}

/// Bellman-Ford algorithm supporting negative edge weights.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let g = AdjArray::<i32>::from_edges(3, [(0, 1, 4), (0, 2, 5), (2, 1, -3)]);
/// let tree = BellmanFord::new(&g, 0).run().unwrap();
/// assert_eq!(tree.distance_to(1), Some(2));
///
/// let cyclic = AdjArray::<i32>::from_edges(2, [(0, 1, 1), (1, 0, -2)]);
/// assert!(BellmanFord::new(&cyclic, 0).run().is_err());
/// ```
pub struct BellmanFord<'a, G> {
    graph: &'a G,
    source: Node,
}

impl<'a, G> BellmanFord<'a, G>
where
    G: WeightedAdjacencyList<Weight: Weight>,
{
    /// ** Panics if `source >= n` **
    pub fn new(graph: &'a G, source: Node) -> Self {
        assert!(source < graph.number_of_nodes());
        Self { graph, source }
    }

    /// Relaxes every edge once; returns the head of the first improved edge if any
    fn relax_all(&self, tree: &mut ShortestPathTree<G::Weight>) -> Option<Node> {
        let mut improved = None;
        for WeightedEdge(u, v, w) in self.graph.weighted_edges(false) {
            let Some(du) = tree.dist[u as usize] else {
                continue;
            };

            let nd = du + w;
            if tree.dist[v as usize].is_none_or(|old| nd < old) {
                tree.dist[v as usize] = Some(nd);
                tree.pred[v as usize] = OptionalNode::new(u);
                improved.get_or_insert(v);
            }
        }
        improved
    }

    /// Runs the search and returns [`Error::NegativeCycle`] if a negative cycle is reachable
    /// from the source
    pub fn run(&self) -> Result<ShortestPathTree<G::Weight>> {
        let n = self.graph.number_of_nodes();
        let mut tree = ShortestPathTree::new(n, vec![self.source]);

        for round in 1..n {
            if self.relax_all(&mut tree).is_none() {
                debug!(round, "bellman-ford converged");
                return Ok(tree);
            }
        }

        // one more improving relaxation proves a negative cycle
        if let Some(node) = self.relax_all(&mut tree) {
            warn!(source = self.source, node, "negative cycle detected");
            return Err(Error::NegativeCycle { node });
        }

        Ok(tree)
    }
}

/// Result of an A* search
#[derive(Clone, Debug, PartialEq)]
pub struct AStarPath<W> {
    /// Total weight of the path
    pub cost: W,
    /// Nodes of the path including both endpoints
    pub path: Vec<Node>,
}

/// Provides shortest path algorithms directly on weighted graphs
pub trait ShortestPaths: WeightedAdjacencyList<Weight: Weight> + Sized {
    /// Runs Dijkstra's algorithm from `source`
    fn dijkstra(&self, source: Node) -> ShortestPathTree<Self::Weight> {
        Dijkstra::new(self, source).run()
    }

    /// Distance and path from `source` to `target` (Dijkstra, stopping once `target` is settled)
    fn shortest_route(&self, source: Node, target: Node) -> Option<(Self::Weight, Vec<Node>)> {
        let tree = Dijkstra::new(self, source).stop_at(target).run();
        Some((tree.distance_to(target)?, tree.path_to(target)?))
    }

    /// Distances to the nearest of several sources
    /// ** Panics if `sources` is empty **
    fn multi_source_dijkstra<I>(&self, sources: I) -> ShortestPathTree<Self::Weight>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut sources = sources.into_iter();
        let first = sources.next().expect("at least one source required");
        let mut dijkstra = Dijkstra::new(self, first);
        for s in sources {
            dijkstra.add_source(s);
        }
        dijkstra.run()
    }

    /// Runs Bellman-Ford from `source`
    fn bellman_ford(&self, source: Node) -> Result<ShortestPathTree<Self::Weight>> {
        BellmanFord::new(self, source).run()
    }

    /// A* search from `start` to `goal`.
    ///
    /// The heuristic estimates the remaining distance to `goal`; the result is optimal if it never
    /// overestimates. Nodes are re-expanded whenever a cheaper path to them is found.
    ///
    /// # Examples
    /// ```
    /// use casework::{prelude::*, algo::*};
    ///
    /// let g = AdjArrayUndir::<u32>::from_edges(4, [(0, 1, 1), (1, 3, 5), (0, 2, 2), (2, 3, 1)]);
    /// let found = g.a_star(0, 3, |u| 3u32.abs_diff(u)).unwrap();
    /// assert_eq!(found.cost, 3);
    /// assert_eq!(found.path, vec![0, 2, 3]);
    /// ```
    fn a_star<H>(&self, start: Node, goal: Node, mut heuristic: H) -> Option<AStarPath<Self::Weight>>
    where
        H: FnMut(Node) -> Self::Weight,
    {
        let mut tree = ShortestPathTree::new(self.number_of_nodes(), vec![start]);
        let mut heap = BinaryHeap::from([MinScored(heuristic(start), start)]);
        let mut expansions = 0usize;

        while let Some(MinScored(f, u)) = heap.pop() {
            let g = tree.dist[u as usize]?;
            if u == goal {
                debug!(expansions, "a* reached goal");
                return Some(AStarPath {
                    cost: g,
                    path: tree.path_to(goal)?,
                });
            }

            // stale entry
            if f > g + heuristic(u) {
                continue;
            }
            expansions += 1;

            for (v, w) in self.weighted_neighbors_of(u) {
                let ng = g + w;
                if tree.dist[v as usize].is_none_or(|old| ng < old) {
                    tree.dist[v as usize] = Some(ng);
                    tree.pred[v as usize] = OptionalNode::new(u);
                    heap.push(MinScored(ng + heuristic(v), v));
                }
            }
        }

        None
    }
}

impl<G> ShortestPaths for G where G: WeightedAdjacencyList<Weight: Weight> {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn city_roads() -> AdjArrayUndir<u32> {
        AdjArrayUndir::from_edges(
            6,
            [
                (0, 1, 7),
                (0, 2, 9),
                (0, 5, 14),
                (1, 2, 10),
                (1, 3, 15),
                (2, 3, 11),
                (2, 5, 2),
                (3, 4, 6),
                (4, 5, 9),
            ],
        )
    }

    #[test]
    fn dijkstra_textbook() {
        let g = city_roads();
        let tree = g.dijkstra(0);
        assert_eq!(
            tree.distances(),
            &[Some(0), Some(7), Some(9), Some(20), Some(20), Some(11)]
        );
        assert_eq!(tree.path_to(4), Some(vec![0, 2, 5, 4]));
        assert_eq!(tree.predecessor_of(0), None);
        assert_eq!(g.shortest_route(0, 3), Some((20, vec![0, 2, 3])));
    }

    #[test]
    fn unreachable_is_none() {
        let g = AdjArray::<u32>::from_edges(4, [(0, 1, 3), (2, 3, 1)]);
        let tree = g.dijkstra(0);
        assert_eq!(tree.distance_to(3), None);
        assert_eq!(tree.path_to(3), None);
        assert!(!tree.is_reachable(2));
        assert_eq!(tree.reachable().collect_vec(), vec![(0, 0), (1, 3)]);
    }

    #[test]
    fn multi_source() {
        let g = AdjArrayUndir::<u32>::from_edges(5, [(0, 1, 4), (1, 2, 4), (2, 3, 1), (3, 4, 1)]);
        let tree = g.multi_source_dijkstra([0, 4]);
        assert_eq!(tree.distance_to(1), Some(4));
        assert_eq!(tree.distance_to(2), Some(2));
        assert_eq!(tree.root_of(2), Some(4));
        assert_eq!(tree.closest(|v| v != 0 && v != 4), Some((3, 1)));
    }

    #[test]
    fn bellman_ford_negative_edges() {
        let g = AdjArray::<i64>::from_edges(
            5,
            [(0, 1, 6), (0, 2, 7), (1, 3, 5), (1, 2, 8), (2, 3, -3), (3, 1, -2), (2, 4, 9)],
        );
        let tree = g.bellman_ford(0).unwrap();
        assert_eq!(
            tree.distances(),
            &[Some(0), Some(2), Some(7), Some(4), Some(16)]
        );
        assert_eq!(tree.path_to(1), Some(vec![0, 2, 3, 1]));
    }

    #[test]
    fn bellman_ford_negative_cycle() {
        let g = AdjArray::<i32>::from_edges(4, [(0, 1, 1), (1, 2, -1), (2, 1, -1), (3, 0, 1)]);
        assert!(matches!(
            g.bellman_ford(0),
            Err(Error::NegativeCycle { .. })
        ));

        // cycle not reachable from the source
        let g = AdjArray::<i32>::from_edges(4, [(0, 1, 1), (2, 3, -1), (3, 2, -1)]);
        let tree = g.bellman_ford(0).unwrap();
        assert_eq!(tree.distance_to(2), None);
    }

    #[test]
    fn a_star_matches_dijkstra() {
        let g = city_roads();
        for goal in 0..6 {
            let found = g.a_star(0, goal, |_| 0).unwrap();
            assert_eq!(Some(found.cost), g.dijkstra(0).distance_to(goal));
            assert_eq!(found.path.first(), Some(&0));
            assert_eq!(found.path.last(), Some(&goal));
        }

        let g = AdjArray::<u32>::from_edges(3, [(0, 1, 1)]);
        assert_eq!(g.a_star(0, 2, |_| 0), None);
    }

    #[test]
    fn dijkstra_vs_bellman_ford_random() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [5 as NumNodes, 20, 50] {
            for _ in 0..10 {
                let edges = (0..3 * n)
                    .map(|_| {
                        (
                            rng.random_range(0..n),
                            rng.random_range(0..n),
                            rng.random_range(0..100u64),
                        )
                    })
                    .collect_vec();
                let g = AdjArray::<u64>::from_edges(n, edges);

                let s = rng.random_range(0..n);
                let dijkstra = g.dijkstra(s);
                let bellman_ford = g.bellman_ford(s).unwrap();
                assert_eq!(dijkstra.distances(), bellman_ford.distances());

                for v in 0..n {
                    if let Some(path) = dijkstra.path_to(v) {
                        let len: u64 = path
                            .iter()
                            .tuple_windows()
                            .map(|(&a, &b)| g.weight_of(a, b).unwrap())
                            .sum();
                        assert_eq!(Some(len), dijkstra.distance_to(v));
                    }
                }
            }
        }
    }
}
