//! Reduction of an Ising partition function to Weighted Model Counting.
//!
//! For `H(s) = -Σ h_i s_i - Σ J_ij s_i s_j` the partition function
//! `Z = Σ_s exp(-beta · H(s))` factors into one term per site and one per coupling:
//!
//! ```text
//! Z = Σ_s Π_i exp(mu · beta · h_i · s_i) · Π_{i<j} exp(beta · J_ij · s_i s_j)
//! ```
//!
//! Each site `i` becomes a variable `v_i` (true = spin +1) weighted
//! `(exp(-mu·beta·h_i), exp(mu·beta·h_i))`. Each non-zero coupling becomes a variable
//! `c_ij` weighted `(exp(-beta·J_ij), exp(beta·J_ij))` and constrained by four clauses
//! to be true exactly when `v_i` and `v_j` agree:
//!
//! ```text
//! ( c ∨  v_i ∨  v_j)
//! ( c ∨ ¬v_i ∨ ¬v_j)
//! (¬c ∨  v_i ∨ ¬v_j)
//! (¬c ∨ ¬v_i ∨  v_j)
//! ```
//!
//! The weighted model count of the result is therefore exactly `Z`.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{Error, Result};
use crate::formula::{FormulaSink, WeightedCnf};
use crate::model::IsingModel;
use crate::types::Var;

/// Variables allocated by [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    sites: Vec<Var>,
    couplings: BTreeMap<(usize, usize), Var>,
}

impl Encoding {
    /// Variable of site `i` (true means spin +1).
    pub fn site(&self, i: usize) -> Var {
        self.sites[i]
    }

    /// Agreement variable of the coupling `(i, j)`, if the coupling is non-zero.
    pub fn coupling(&self, i: usize, j: usize) -> Option<Var> {
        self.couplings.get(&(i, j)).copied()
    }

    pub fn num_vars(&self) -> usize {
        self.sites.len() + self.couplings.len()
    }

    /// Reads the spin configuration out of a full assignment of the formula.
    pub fn spins(&self, assignment: &[bool]) -> Vec<bool> {
        self.sites.iter().map(|v| assignment[v.index()]).collect()
    }
}

fn weight_pair(what: impl FnOnce() -> String, exponent: f64) -> Result<(f64, f64)> {
    let neg = (-exponent).exp();
    let pos = exponent.exp();
    if neg.is_finite() && pos.is_finite() && neg > 0.0 && pos > 0.0 {
        Ok((neg, pos))
    } else {
        Err(Error::invalid(format!(
            "weight of {} is not representable: exp(±{})",
            what(),
            exponent
        )))
    }
}

/// Encodes `model` into `sink`.
///
/// Variables are allocated site by site: the variable of site `i` followed by the
/// coupling variables of `(i, j)` for every `j > i` with non-zero `J_ij`. All clauses
/// are added afterwards, in the same row-major pair order.
pub fn encode<S: FormulaSink + ?Sized>(model: &IsingModel, sink: &mut S) -> Result<Encoding> {
    let n = model.num_sites();
    let beta = model.beta();
    let mu = model.mu();

    let mut sites = Vec::with_capacity(n);
    let mut couplings = BTreeMap::new();
    let mut pairs = model.couplings().peekable();

    for i in 0..n {
        let (neg, pos) = weight_pair(|| format!("field {}", i), mu * beta * model.field(i))?;
        sites.push(sink.declare_variable(neg, pos));

        while let Some(&((a, b), value)) = pairs.peek() {
            if a != i {
                break;
            }
            let (neg, pos) = weight_pair(|| format!("coupling ({}, {})", a, b), beta * value)?;
            couplings.insert((a, b), sink.declare_variable(neg, pos));
            pairs.next();
        }
    }

    for (&(i, j), &c) in couplings.iter() {
        let (vi, vj) = (sites[i], sites[j]);
        sink.add_clause(&[c.pos(), vi.pos(), vj.pos()]);
        sink.add_clause(&[c.pos(), vi.neg(), vj.neg()]);
        sink.add_clause(&[c.neg(), vi.pos(), vj.neg()]);
        sink.add_clause(&[c.neg(), vi.neg(), vj.pos()]);
    }

    debug!(
        "Encoded {} sites and {} couplings into {} variables and {} clauses",
        n,
        couplings.len(),
        n + couplings.len(),
        4 * couplings.len()
    );
    Ok(Encoding { sites, couplings })
}

impl IsingModel {
    /// Builds the weighted formula whose weighted model count is the partition function.
    pub fn to_wmc(&self) -> Result<WeightedCnf> {
        let mut cnf = WeightedCnf::new();
        encode(self, &mut cnf)?;
        Ok(cnf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::types::Lit;

    fn lits(xs: &[i32]) -> Vec<Lit> {
        xs.iter().copied().map(Lit::from_dimacs).collect()
    }

    fn two_site() -> IsingModel {
        IsingModel::from_matrix(1.0, 1.0, &[vec![1.0, 2.0], vec![0.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_two_site_example() {
        let cnf = two_site().to_wmc().unwrap();
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.num_clauses(), 4);

        assert_eq!(cnf.weights(Var::new(1)), Some(((-1.0f64).exp(), 1.0f64.exp())));
        assert_eq!(cnf.weights(Var::new(2)), Some(((-2.0f64).exp(), 2.0f64.exp())));
        assert_eq!(cnf.weights(Var::new(3)), Some((1.0, 1.0)));

        // coupling variable 2 ties site variables 1 and 3
        assert_eq!(cnf.clauses()[0], lits(&[2, 1, 3]));
        assert_eq!(cnf.clauses()[1], lits(&[2, -1, -3]));
        assert_eq!(cnf.clauses()[2], lits(&[-2, 1, -3]));
        assert_eq!(cnf.clauses()[3], lits(&[-2, -1, 3]));
    }

    #[test]
    fn test_interleaved_allocation_order() {
        let mut model = IsingModel::new(3, 1.0, 1.0).unwrap();
        model.set_coupling(0, 2, 1.0).unwrap();
        model.set_coupling(1, 2, 1.0).unwrap();

        let mut cnf = WeightedCnf::new();
        let enc = encode(&model, &mut cnf).unwrap();
        assert_eq!(enc.site(0).id(), 1);
        assert_eq!(enc.coupling(0, 2).map(Var::id), Some(2));
        assert_eq!(enc.site(1).id(), 3);
        assert_eq!(enc.coupling(1, 2).map(Var::id), Some(4));
        assert_eq!(enc.site(2).id(), 5);
        assert_eq!(enc.coupling(0, 1), None);
        assert_eq!(enc.num_vars(), cnf.num_vars());
    }

    #[test]
    fn test_sparsity() {
        let mut model = IsingModel::new(10, 0.3, 1.0).unwrap();
        model.set_coupling(0, 9, 1.0).unwrap();
        model.set_coupling(3, 4, -2.0).unwrap();
        model.set_field(5, 0.5).unwrap();
        let cnf = model.to_wmc().unwrap();
        assert_eq!(cnf.num_vars(), 10 + 2);
        assert_eq!(cnf.num_clauses(), 4 * 2);
    }

    #[test]
    fn test_field_scaled_by_mu() {
        let mut model = IsingModel::new(1, 2.0, -0.5).unwrap();
        model.set_field(0, 3.0).unwrap();
        let cnf = model.to_wmc().unwrap();
        // mu * beta * h = -3
        assert_eq!(cnf.weights(Var::new(1)), Some((3.0f64.exp(), (-3.0f64).exp())));
    }

    #[test]
    fn test_agreement_gadget() {
        let cnf = two_site().to_wmc().unwrap();
        // variables: v0 = 1, c01 = 2, v1 = 3
        for v0 in [false, true] {
            for v1 in [false, true] {
                for c in [false, true] {
                    let sat = cnf.is_satisfied_by(&[v0, c, v1]);
                    assert_eq!(sat, c == (v0 == v1), "v0={} v1={} c={}", v0, v1, c);
                }
            }
        }
    }

    #[test]
    fn test_spins_from_assignment() {
        let mut cnf = WeightedCnf::new();
        let enc = encode(&two_site(), &mut cnf).unwrap();
        assert_eq!(enc.spins(&[true, false, false]), vec![true, false]);
    }

    #[test]
    fn test_overflowing_weight_is_rejected() {
        let mut model = IsingModel::new(2, 1000.0, 1.0).unwrap();
        model.set_coupling(0, 1, 1000.0).unwrap();
        assert!(matches!(model.to_wmc(), Err(Error::InvalidModel(_))));
    }
}
