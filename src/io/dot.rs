//! # Dot
//!
//! The Dot-Format is a very extensive format used by [GraphViz](https://graphviz.org/) to allow
//! for detailed visualizations. We only use basic functionality to draw weighted edges and to
//! highlight routes (shortest paths, evacuation routes, vehicle tours).
//!
//! ```
//! use casework::{prelude::*, io::*};
//!
//! let g = AdjArrayUndir::<u32>::from_edges(3, [(0, 1, 4), (1, 2, 1), (0, 2, 7)]);
//!
//! let mut out = Vec::new();
//! DotWriter::new()
//!     .highlight_path([0, 1, 2], DotColor::Red)
//!     .try_write_graph(&g, &mut out)
//!     .unwrap();
//!
//! let dot = String::from_utf8(out).unwrap();
//! assert!(dot.starts_with("graph {"));
//! assert!(dot.contains("u1--u2[label=4, color=red, penwidth=2];"));
//! assert!(dot.contains("u1--u3[label=7];"));
//! ```
//!
//! Note that for nodes, the latest coloring is the one that will be applied in a visualizer.

use std::{fmt::Display, io::Write};

use fxhash::FxHashSet;
use itertools::Itertools;

use super::*;

/// A writer for the Dot-Format
#[derive(Debug, Clone)]
pub struct DotWriter {
    /// Increment nodes by 1 before writing
    inc_nodes: bool,
    /// Prefix of a node (default: 'u')
    prefix: String,
    /// Edges (normalized for undirected graphs) drawn in a highlight color
    highlighted: Vec<(Edge, DotColor)>,
}

impl Default for DotWriter {
    fn default() -> Self {
        Self {
            inc_nodes: true,
            prefix: "u".to_string(),
            highlighted: Vec::new(),
        }
    }
}

impl DotWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// If *false*, nodes retain their internal value (-1 that of input)
    pub fn inc_nodes(mut self, inc_nodes: bool) -> Self {
        self.inc_nodes = inc_nodes;
        self
    }

    /// Set the prefix of a node (`u` by default)
    pub fn node_prefix<S>(mut self, prefix: S) -> DotWriter
    where
        S: Into<String>,
    {
        self.prefix = prefix.into();
        self
    }

    /// Draws every edge between consecutive nodes of `path` in `color`.
    /// Later highlights take precedence over earlier ones.
    pub fn highlight_path<I>(mut self, path: I, color: DotColor) -> DotWriter
    where
        I: IntoIterator<Item = Node>,
    {
        self.highlighted
            .extend(path.into_iter().tuple_windows().map(|(u, v)| (Edge(u, v), color)));
        self
    }

    /// Writes the opening brackets of the graph.
    /// Must know if the graph is undirected
    pub fn start_graph<W>(&self, writer: &mut W, directed: bool) -> Result<()>
    where
        W: Write,
    {
        let graph_name = if directed { "digraph" } else { "graph" };

        writeln!(writer, "{graph_name} {{")
    }

    /// Formats a node depending on `self.prefix, self.inc_nodes`
    fn format_node(&self, u: Node) -> String {
        let u = u + self.inc_nodes as Node;
        format!("{}{u}", self.prefix)
    }

    /// Highlight color of an edge, if any
    fn color_of(&self, e: Edge, directed: bool) -> Option<DotColor> {
        self.highlighted.iter().rev().find_map(|&(h, c)| {
            let hit = if directed { h == e } else { h.normalized() == e.normalized() };
            hit.then_some(c)
        })
    }

    /// Writes an iterator of weighted edges to `writer`, one edge per line with the weight as label.
    pub fn write_edges<W, I, X>(&self, writer: &mut W, edges: I, directed: bool) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = WeightedEdge<X>>,
        X: Display,
    {
        let edge_dir = if directed { "->" } else { "--" };

        for WeightedEdge(u, v, w) in edges {
            let style = match self.color_of(Edge(u, v), directed) {
                Some(c) => format!("[label={w}, color={c}, penwidth=2]"),
                None => format!("[label={w}]"),
            };
            writeln!(
                writer,
                "{}{edge_dir}{}{style};",
                self.format_node(u),
                self.format_node(v)
            )?;
        }
        Ok(())
    }

    /// Writes a list of colored nodes to `writer`.
    pub fn color_nodes<W, I>(&self, writer: &mut W, nodes: I, color: DotColor) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = Node>,
    {
        for u in nodes {
            writeln!(writer, "{}[style=filled, color={color}];", self.format_node(u))?;
        }
        Ok(())
    }

    /// Closes the Dot-Graph, thus finishing the graph
    pub fn finish_graph<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        writeln!(writer, "}}")
    }
}

impl<G> GraphWriter<G> for DotWriter
where
    G: WeightedAdjacencyList + GraphType,
    G::Weight: Display,
{
    fn try_write_graph<W>(&self, graph: &G, mut writer: W) -> Result<()>
    where
        W: Write,
    {
        let directed = G::is_directed();
        self.start_graph(&mut writer, directed)?;
        self.write_edges(&mut writer, graph.weighted_edges(!directed), directed)?;

        // endpoints of highlighted routes are drawn in the color of their route
        let mut colored = FxHashSet::default();
        for &(Edge(u, v), c) in self.highlighted.iter().rev() {
            for x in [u, v] {
                if colored.insert(x) {
                    self.color_nodes(&mut writer, [x], c)?;
                }
            }
        }

        self.finish_graph(&mut writer)
    }
}

/// Trait for writing a graph to a writer in the Dot-Format.
/// Shorthand for default settings.
pub trait DotWrite {
    /// Tries to write the graph to a writer
    fn try_write_dot<W>(&self, writer: W) -> Result<()>
    where
        W: Write;

    /// Tries to write the graph to a file
    fn try_write_dot_file<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_dot(writer)
    }
}

impl<G> DotWrite for G
where
    G: WeightedAdjacencyList + GraphType,
    G::Weight: Display,
{
    fn try_write_dot<W>(&self, writer: W) -> Result<()>
    where
        W: Write,
    {
        DotWriter::default().try_write_graph(self, writer)
    }
}

impl Display for DotColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_lowercase())
    }
}

/// Colors used for highlighting, a subset of the SVG color scheme of
/// `https://graphviz.gitlab.io/doc/info/colors.html#svg`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DotColor {
    Black,
    Blue,
    Brown,
    Crimson,
    DarkGreen,
    DarkOrange,
    DodgerBlue,
    ForestGreen,
    Gold,
    Gray,
    Green,
    Magenta,
    Navy,
    Orange,
    OrangeRed,
    Purple,
    Red,
    RoyalBlue,
    SeaGreen,
    Teal,
    Tomato,
}
