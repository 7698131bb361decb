//! # EdgeList
//!
//! The EdgeList-Format consists of a header, followed by `m` non-comment-lines `u v w`
//! representing an edge `WeightedEdge(u - 1, v - 1, w)`. For undirected graphs, every edge is
//! listed once.
//!
//! ```text
//! c road network of the transit sample
//! p sp 3 2
//! 1 2 4
//! 2 3 7
//! ```

use std::{fmt::Display, io::Lines, marker::PhantomData};

use tracing::warn;

use super::*;

/// A GraphReader for the EdgeList-Format
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// HeaderFormat
    header: Header,
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            header: Header::default(),
            comment_identifier: "c".to_string(),
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the header format
    pub fn header_format(mut self, format: Header) -> EdgeListReader {
        self.header = format;
        self
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> EdgeListReader {
        self.comment_identifier = c.into();
        self
    }
}

impl<G> GraphReader<G> for EdgeListReader
where
    G: GraphFromScratch,
    G::Weight: FromStr,
{
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        let edges_reader =
            EdgeListEdgesReader::<R, G::Weight>::try_new(reader, &self.header, &self.comment_identifier)?;
        let n = edges_reader.number_of_nodes();
        let m = edges_reader.number_of_edges();

        let edges = edges_reader.collect::<Result<Vec<_>>>()?;
        if edges.len() != m as usize {
            warn!(header = m, found = edges.len(), "number of edges differs from header");
        }

        Ok(G::from_edges(n, edges))
    }
}

/// Trait for creating graphs from an EdgeListReader.
/// Used as shorthand for default EdgeListReader settings
pub trait EdgeListRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_edge_list(BufReader::new(File::open(path)?))
    }
}

impl<G> EdgeListRead for G
where
    G: GraphFromScratch,
    G::Weight: FromStr,
{
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        EdgeListReader::default().try_read_graph(reader)
    }
}

/// Real EdgeListReader that consumes the reader and yields 0-indexed weighted edges
pub struct EdgeListEdgesReader<'a, R, W> {
    /// Lines in the reader
    lines: Lines<R>,
    /// Number of nodes parsed from header
    number_of_nodes: NumNodes,
    /// Number of edges parsed from header
    number_of_edges: NumEdges,
    /// Comment identifier
    comment_identifier: &'a str,
    _weight: PhantomData<W>,
}

impl<'a, R: BufRead, W: FromStr> EdgeListEdgesReader<'a, R, W> {
    /// Creates a new EdgeListEdgesReader and tries to parse the first non-comment-line as the header
    pub fn try_new(reader: R, header_format: &Header, comment_identifier: &'a str) -> Result<Self> {
        let mut edge_list_reader = Self {
            lines: reader.lines(),
            number_of_nodes: 0,
            number_of_edges: 0,
            comment_identifier,
            _weight: PhantomData,
        };

        let header = edge_list_reader
            .next_non_comment_line()?
            .ok_or(io_error!(ErrorKind::NotFound, "Header not found"))?;
        (
            edge_list_reader.number_of_nodes,
            edge_list_reader.number_of_edges,
        ) = header_format.parse_header(&header)?;

        Ok(edge_list_reader)
    }

    /// Returns the parsed number of edges in the graph
    pub fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }

    /// Returns the parsed number of nodes in the graph
    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    /// Returns the next non-empty non-comment-line if it exists or propagates an error
    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with(self.comment_identifier) {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    /// Tries to parse an edge from the next non-comment-line
    fn parse_edge_line(&mut self) -> Result<Option<WeightedEdge<W>>> {
        let Some(line) = self.next_non_comment_line()? else {
            return Ok(None);
        };
        let mut parts = line.split_whitespace();

        let from: Node = parse_next_value!(parts, "Source node");
        let dest: Node = parse_next_value!(parts, "Target node");
        let weight: W = parse_next_value!(parts, "Edge weight");

        for u in [from, dest] {
            raise_error_unless!(
                (1..=self.number_of_nodes).contains(&u),
                ErrorKind::InvalidData,
                format!("Node {u} out of range 1..={}", self.number_of_nodes)
            );
        }

        Ok(Some(WeightedEdge(from - 1, dest - 1, weight)))
    }
}

impl<'a, R: BufRead, W: FromStr> Iterator for EdgeListEdgesReader<'a, R, W> {
    type Item = Result<WeightedEdge<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_edge_line().transpose()
    }
}

/// A writer for the EdgeList-Format
#[derive(Debug, Clone)]
pub struct EdgeListWriter {
    /// HeaderFormat
    header: Header,
    /// Comment lines written directly after the header
    comments: Vec<String>,
}

impl Default for EdgeListWriter {
    fn default() -> Self {
        Self {
            header: Header::new_problem("sp"),
            comments: Vec::new(),
        }
    }
}

impl EdgeListWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the header format
    pub fn header_format(mut self, format: Header) -> EdgeListWriter {
        self.header = format;
        self
    }

    /// Adds a comment line (`c {comment}`) after the header
    pub fn comment<S: Into<String>>(mut self, comment: S) -> EdgeListWriter {
        self.comments.push(comment.into());
        self
    }
}

impl<G> GraphWriter<G> for EdgeListWriter
where
    G: WeightedAdjacencyList + GraphEdgeOrder + GraphType,
    G::Weight: Display,
{
    fn try_write_graph<W: Write>(&self, graph: &G, mut writer: W) -> Result<()> {
        self.header.write_header(
            &mut writer,
            graph.number_of_nodes(),
            graph.number_of_edges(),
        )?;

        for comment in &self.comments {
            writeln!(writer, "c {comment}")?;
        }

        for WeightedEdge(u, v, w) in graph.weighted_edges(G::is_undirected()) {
            writeln!(writer, "{} {} {w}", u + 1, v + 1)?;
        }

        writer.flush()
    }
}

/// Trait for writing a graph to a writer in the EdgeList-Format.
/// Shorthand for default settings.
pub trait EdgeListWrite {
    /// Tries to write the graph to a writer
    fn try_write_edge_list<W: Write>(&self, writer: W) -> Result<()>;

    /// Tries to write the graph to a file
    fn try_write_edge_list_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_edge_list(writer)
    }
}

impl<G> EdgeListWrite for G
where
    G: WeightedAdjacencyList + GraphEdgeOrder + GraphType,
    G::Weight: Display,
{
    fn try_write_edge_list<W: Write>(&self, writer: W) -> Result<()> {
        EdgeListWriter::default().try_write_graph(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = "c sample\np sp 4 3\n1 2 4\n\nc inner comment\n2 3 1.5\n4 1 10\n";

    #[test]
    fn read_weighted() {
        let g = AdjArray::<f64>::try_read_edge_list(NETWORK.as_bytes()).unwrap();
        assert_eq!(g.number_of_nodes(), 4);
        assert_eq!(g.number_of_edges(), 3);
        assert_eq!(g.weight_of(1, 2), Some(1.5));
        assert_eq!(g.weight_of(3, 0), Some(10.0));
        assert!(!g.has_edge(0, 3));
    }

    #[test]
    fn invalid_input() {
        for input in [
            "",
            "p sp 2 1\n1 3 4\n",
            "p sp 2 1\n0 1 4\n",
            "p sp 2 1\n1 2\n",
            "p sp 2 1\n1 2 x\n",
        ] {
            let err = AdjArray::<u32>::try_read_edge_list(input.as_bytes()).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::InvalidData | ErrorKind::NotFound), "{input}");
        }
    }

    #[test]
    fn write_then_read_undirected() {
        let g = AdjArrayUndir::<u32>::from_edges(4, [(0, 1, 3), (2, 1, 8), (3, 3, 1)]);

        let mut buf = Vec::new();
        EdgeListWriter::new()
            .comment("generated")
            .try_write_graph(&g, &mut buf)
            .unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("p sp 4 3\nc generated\n"));

        let h = AdjArrayUndir::<u32>::try_read_edge_list(buf.as_slice()).unwrap();
        assert_eq!(h.ordered_edges(false), g.ordered_edges(false));
        assert_eq!(h.total_weight(), 12);
    }
}
