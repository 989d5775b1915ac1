//! Weighted CNF formulas.
//!
//! The encoders in this crate never depend on a concrete formula representation.
//! They talk to a [`FormulaSink`], which only has to hand out fresh variables and
//! accept clauses. [`WeightedCnf`] is the in-memory sink shipped with the crate; it
//! can be written out in the weighted DIMACS dialect understood by model counters.
//!
//! # Weighted DIMACS
//!
//! ```text
//! p cnf <vars> <clauses>
//! c p weight <v> <positive weight> 0
//! c p weight -<v> <negative weight> 0
//! <lit> <lit> ... 0
//! ```

use std::fmt::Write as _;
use std::io;

use crate::types::{Lit, Var};
use crate::utils::format_real;

/// Capability interface for anything that accepts weighted variables and clauses.
pub trait FormulaSink {
    /// Allocates a fresh variable contributing `neg_weight` when assigned false
    /// and `pos_weight` when assigned true.
    fn declare_variable(&mut self, neg_weight: f64, pos_weight: f64) -> Var;

    /// Appends a clause (disjunction of literals).
    fn add_clause(&mut self, lits: &[Lit]);
}

/// An in-memory weighted CNF formula.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedCnf {
    weights: Vec<(f64, f64)>,
    clauses: Vec<Vec<Lit>>,
}

impl WeightedCnf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_vars(&self) -> usize {
        self.weights.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Returns the `(negative, positive)` weight pair of `var`, if it was declared.
    pub fn weights(&self, var: Var) -> Option<(f64, f64)> {
        self.weights.get(var.index()).copied()
    }

    /// Clauses in the order they were added.
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// Checks whether a full assignment (indexed by `Var::index`) satisfies every clause.
    ///
    /// # Panics
    ///
    /// Panics if `assignment` is shorter than [`num_vars`][Self::num_vars].
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        assert!(assignment.len() >= self.num_vars(), "assignment does not cover all variables");
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|lit| lit.eval(assignment[lit.var().index()])))
    }

    /// Product of the weights selected by a full assignment.
    pub fn assignment_weight(&self, assignment: &[bool]) -> f64 {
        self.weights
            .iter()
            .zip(assignment)
            .map(|(&(neg, pos), &value)| if value { pos } else { neg })
            .product()
    }

    /// Renders the formula in weighted DIMACS format.
    pub fn to_dimacs_string(&self) -> String {
        let mut out = String::new();
        writeln!(out, "p cnf {} {}", self.num_vars(), self.num_clauses()).unwrap();
        for (i, &(neg, pos)) in self.weights.iter().enumerate() {
            let v = i + 1;
            writeln!(out, "c p weight {} {} 0", v, format_real(pos)).unwrap();
            writeln!(out, "c p weight -{} {} 0", v, format_real(neg)).unwrap();
        }
        for clause in self.clauses.iter() {
            for lit in clause.iter() {
                write!(out, "{} ", lit).unwrap();
            }
            writeln!(out, "0").unwrap();
        }
        out
    }

    /// Writes the formula in weighted DIMACS format.
    pub fn write_dimacs<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_dimacs_string().as_bytes())?;
        writer.flush()
    }
}

impl FormulaSink for WeightedCnf {
    fn declare_variable(&mut self, neg_weight: f64, pos_weight: f64) -> Var {
        self.weights.push((neg_weight, pos_weight));
        Var::new(self.weights.len() as u32)
    }

    /// # Panics
    ///
    /// Panics on an empty clause or on a literal over an undeclared variable.
    fn add_clause(&mut self, lits: &[Lit]) {
        assert!(!lits.is_empty(), "Clause must not be empty");
        for lit in lits {
            assert!(
                lit.var().index() < self.num_vars(),
                "Literal {} refers to an undeclared variable",
                lit
            );
        }
        self.clauses.push(lits.to_vec());
    }
}
