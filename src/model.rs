//! The Ising model.
//!
//! An [`IsingModel`] is a set of `n` spin sites with a local field `h_i` on each site
//! and a pairwise coupling `J_ij` on each pair `i < j`, together with the inverse
//! temperature `beta` and the field orientation `mu`. The energy of a spin
//! configuration `s ∈ {-1, +1}^n` is
//!
//! ```text
//! H(s) = -Σ_i h_i s_i - Σ_{i<j} J_ij s_i s_j
//! ```
//!
//! # Storage
//!
//! Fields are stored densely (every site has one, possibly zero). Couplings are stored
//! sparsely, keyed by `(i, j)` with `i < j`; a zero coupling is never stored, so
//! "absent" and "zero" are the same thing. Iterating the couplings yields them in
//! row-major order, which is the order every encoder and writer in this crate relies on.
//!
//! The classic interchange form is a square upper-triangular matrix with `h_i` on the
//! diagonal and `J_ij` above it. [`IsingModel::from_matrix`] and [`IsingModel::to_matrix`]
//! convert to and from that view.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct IsingModel {
    beta: f64,
    mu: f64,
    fields: Vec<f64>,
    couplings: BTreeMap<(usize, usize), f64>,
}

fn check_finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(format!("{} must be finite, got {}", what, value)))
    }
}

impl IsingModel {
    /// Creates a model with `num_sites` sites and no fields or couplings.
    ///
    /// Fails with [`Error::InvalidModel`] if `beta` or `mu` is not finite.
    pub fn new(num_sites: usize, beta: f64, mu: f64) -> Result<Self> {
        check_finite("beta", beta)?;
        check_finite("mu", mu)?;
        Ok(Self {
            beta,
            mu,
            fields: vec![0.0; num_sites],
            couplings: BTreeMap::new(),
        })
    }

    /// Builds a model from a square interaction matrix.
    ///
    /// The diagonal holds the fields and the strict upper triangle the couplings.
    /// Entries below the diagonal carry no meaning and are ignored.
    pub fn from_matrix(beta: f64, mu: f64, interactions: &[Vec<f64>]) -> Result<Self> {
        let n = interactions.len();
        let mut model = Self::new(n, beta, mu)?;
        let mut ignored = 0usize;
        for (i, row) in interactions.iter().enumerate() {
            if row.len() != n {
                return Err(Error::invalid(format!(
                    "interaction matrix must be square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &value) in row.iter().enumerate() {
                check_finite(&format!("interaction ({}, {})", i, j), value)?;
                if i == j {
                    model.fields[i] = value;
                } else if i < j {
                    if value != 0.0 {
                        model.couplings.insert((i, j), value);
                    }
                } else if value != 0.0 {
                    ignored += 1;
                }
            }
        }
        if ignored > 0 {
            debug!("Ignored {} non-zero entries below the diagonal", ignored);
        }
        Ok(model)
    }

    /// Number of spin sites.
    pub fn num_sites(&self) -> usize {
        self.fields.len()
    }

    /// Inverse temperature.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Field orientation; scales every field term.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Local field on site `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn field(&self, i: usize) -> f64 {
        self.fields[i]
    }

    /// Coupling between sites `i` and `j`.
    ///
    /// Returns zero for absent pairs and for `i >= j` (the lower triangle is meaningless).
    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.couplings.get(&(i, j)).copied().unwrap_or(0.0)
    }

    pub fn set_field(&mut self, i: usize, h: f64) -> Result<()> {
        self.check_site(i)?;
        check_finite("field", h)?;
        self.fields[i] = h;
        Ok(())
    }

    /// Sets `J_ij` for `i < j`. Setting zero removes the coupling.
    pub fn set_coupling(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.check_site(i)?;
        self.check_site(j)?;
        if i >= j {
            return Err(Error::invalid(format!(
                "coupling ({}, {}) is not above the diagonal",
                i, j
            )));
        }
        check_finite("coupling", value)?;
        if value == 0.0 {
            self.couplings.remove(&(i, j));
        } else {
            self.couplings.insert((i, j), value);
        }
        Ok(())
    }

    fn check_site(&self, i: usize) -> Result<()> {
        if i < self.num_sites() {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "site {} out of range for a model with {} sites",
                i,
                self.num_sites()
            )))
        }
    }

    /// Non-zero fields as `(site, h)`, in site order.
    pub fn fields(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.fields.iter().copied().enumerate().filter(|&(_, h)| h != 0.0)
    }

    /// Non-zero couplings as `((i, j), J)`, in row-major order.
    pub fn couplings(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.couplings.iter().map(|(&pair, &value)| (pair, value))
    }

    /// Number of sites with a non-zero field.
    pub fn num_unary_funcs(&self) -> usize {
        self.fields().count()
    }

    /// Number of pairs with a non-zero coupling.
    pub fn num_binary_funcs(&self) -> usize {
        self.couplings.len()
    }

    /// Dense upper-triangular view: fields on the diagonal, couplings above it,
    /// zeros below.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.num_sites();
        let mut matrix = vec![vec![0.0; n]; n];
        for (i, &h) in self.fields.iter().enumerate() {
            matrix[i][i] = h;
        }
        for (&(i, j), &value) in self.couplings.iter() {
            matrix[i][j] = value;
        }
        matrix
    }

    /// Energy `H(s)` of a spin configuration (`true` is spin +1, `false` is spin -1).
    ///
    /// # Panics
    ///
    /// Panics if `spins.len() != self.num_sites()`.
    pub fn energy(&self, spins: &[bool]) -> f64 {
        assert_eq!(spins.len(), self.num_sites(), "one spin per site expected");
        let s = |i: usize| if spins[i] { 1.0 } else { -1.0 };
        let field_term: f64 = self.fields().map(|(i, h)| h * s(i)).sum();
        let coupling_term: f64 = self.couplings().map(|((i, j), value)| value * s(i) * s(j)).sum();
        -field_term - coupling_term
    }
}
