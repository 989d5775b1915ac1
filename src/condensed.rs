//! Condensed encoding of the `n × n` square lattice.
//!
//! Instead of one variable per site plus one per edge, this encoding keeps only the
//! edge variables and relates them face by face. Every unit square of the grid is
//! bounded by two horizontal and two vertical edges; the eight clauses emitted for a
//! face forbid exactly the assignments where an odd number of those four edges is
//! true:
//!
//! ```text
//!        h[i][j]
//!      +---------+
//!      |         |
//! v[i][j]       v[i+1][j]
//!      |         |
//!      +---------+
//!       h[i][j+1]
//! ```
//!
//! All edge variables carry the fixed weight pair `(exp(-1), exp(1))`.

use log::debug;

use crate::formula::{FormulaSink, WeightedCnf};
use crate::types::{Lit, Var};

/// Edge variables allocated by [`two_d_condense`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondensedEncoding {
    /// `(n-1) × n` horizontal edge variables.
    pub horizontal: Vec<Vec<Var>>,
    /// `n × (n-1)` vertical edge variables.
    pub vertical: Vec<Vec<Var>>,
}

impl CondensedEncoding {
    pub fn num_vars(&self) -> usize {
        self.horizontal.iter().chain(self.vertical.iter()).map(Vec::len).sum()
    }

    /// Number of faces (unit squares) the encoding constrains.
    pub fn num_faces(&self) -> usize {
        self.horizontal.len() * self.vertical.first().map_or(0, Vec::len)
    }
}

/// The eight odd-negation sign patterns, in emission order.
fn face_clauses(edges: [Var; 4]) -> impl Iterator<Item = [Lit; 4]> {
    let single_negation = (0..4).map(move |k| {
        let mut clause = edges.map(Var::pos);
        clause[k] = edges[k].neg();
        clause
    });
    let single_positive = (0..4).map(move |k| {
        let mut clause = edges.map(Var::neg);
        clause[k] = edges[k].pos();
        clause
    });
    single_negation.chain(single_positive)
}

/// Encodes the `n × n` lattice into `sink` using face-parity clauses.
///
/// Horizontal edge variables are allocated first, row by row, then vertical ones.
/// For `n < 2` nothing is allocated.
pub fn two_d_condense<S: FormulaSink + ?Sized>(n: usize, sink: &mut S) -> CondensedEncoding {
    let (neg, pos) = ((-1.0f64).exp(), 1.0f64.exp());
    let m = n.saturating_sub(1);

    let horizontal: Vec<Vec<Var>> = (0..m)
        .map(|_| (0..n).map(|_| sink.declare_variable(neg, pos)).collect())
        .collect();
    let vertical: Vec<Vec<Var>> = (0..n)
        .map(|_| (0..m).map(|_| sink.declare_variable(neg, pos)).collect())
        .collect();

    for i in 0..m {
        for j in 0..m {
            let edges = [horizontal[i][j], horizontal[i][j + 1], vertical[i][j], vertical[i + 1][j]];
            for clause in face_clauses(edges) {
                sink.add_clause(&clause);
            }
        }
    }

    let encoding = CondensedEncoding { horizontal, vertical };
    debug!(
        "Condensed {}x{} lattice: {} edge variables, {} faces",
        n,
        n,
        encoding.num_vars(),
        encoding.num_faces()
    );
    encoding
}

/// Builds the condensed formula for the `n × n` lattice.
pub fn two_d_condense_cnf(n: usize) -> WeightedCnf {
    let mut cnf = WeightedCnf::new();
    two_d_condense(n, &mut cnf);
    cnf
}
