/// Every graph representation should pass the same basic checks against a bitset adjacency matrix
macro_rules! test_graph_ops {
    ($env:ident, $graph:ident, $undirected:literal) => {
        #[cfg(test)]
        mod $env {
            use crate::{ops::*, repr::*, *};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;
            use stream_bitset::prelude::*;

            /// Creates a list of at most `m_ub` random distinct edges for nodes `0..n`
            fn random_edges<R: Rng>(rng: &mut R, n: NumNodes, m_ub: NumEdges) -> Vec<Edge> {
                let mut edges = (0..m_ub)
                    .map(|_| {
                        let e = Edge(rng.random_range(0..n), rng.random_range(0..n));
                        if $undirected { e.normalized() } else { e }
                    })
                    .collect_vec();
                edges.sort_unstable();
                edges.dedup();
                edges
            }

            #[test]
            fn graph_new() {
                for n in 1..50 {
                    let graph = <$graph>::new(n);

                    assert_eq!(graph.number_of_edges(), 0);
                    assert_eq!(graph.number_of_nodes(), n);
                    assert_eq!(graph.vertices().collect_vec(), (0..n).collect_vec());
                    assert!(graph.is_singleton_graph());
                }
            }

            #[test]
            fn adjacency_list() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for n in [10 as NumNodes, 20, 50] {
                    for m_ub in [n * 2, n * 5] {
                        let edges = random_edges(rng, n, m_ub);

                        let mut adj_matrix = vec![NodeBitSet::new(n); n as usize];
                        for &Edge(u, v) in &edges {
                            adj_matrix[u as usize].set_bit(v);
                            if $undirected {
                                adj_matrix[v as usize].set_bit(u);
                            }
                        }

                        let graph = <$graph>::from_edges(n, edges.iter().copied());

                        assert_eq!(graph.number_of_edges(), edges.len() as NumEdges);
                        assert_eq!(graph.ordered_edges($undirected), edges);

                        for u in 0..n {
                            assert_eq!(graph.neighbors_of_as_bitset(u), adj_matrix[u as usize]);
                            assert_eq!(graph.degree_of(u), adj_matrix[u as usize].cardinality());
                            for v in 0..n {
                                assert_eq!(graph.has_edge(u, v), adj_matrix[u as usize].get_bit(v));
                            }
                        }
                    }
                }
            }

            #[test]
            fn edge_editing() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for n in [10 as NumNodes, 20, 50] {
                    let edges = random_edges(rng, n, n * 4);
                    let mut graph = <$graph>::new(n);
                    let mut adj_matrix = vec![NodeBitSet::new(n); n as usize];

                    for Edge(u, v) in edges {
                        assert!(!graph.try_add_edge(u, v, ()));
                        assert!(graph.try_add_edge(u, v, ()));
                        adj_matrix[u as usize].set_bit(v);
                        if $undirected {
                            adj_matrix[v as usize].set_bit(u);
                        }
                    }

                    let mut m = graph.number_of_edges();
                    for _ in 0..(4 * n) {
                        let u = rng.random_range(0..n);
                        let v = rng.random_range(0..n);

                        if adj_matrix[u as usize].clear_bit(v) {
                            assert!(graph.try_remove_edge(u, v));
                            m -= 1;
                            if $undirected && u != v {
                                assert!(adj_matrix[v as usize].clear_bit(u));
                            }
                        } else {
                            assert!(!graph.try_remove_edge(u, v));
                        }

                        assert_eq!(m, graph.number_of_edges());
                    }
                }
            }
        }
    };
}

pub(crate) use test_graph_ops;
