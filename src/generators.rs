//! Generators of common Ising model families.
//!
//! Grid generators enumerate every ordered pair of distinct grid coordinates, ask the
//! caller's coupling function for the interaction strength, and then keep only the
//! upper triangle (the function is expected to be symmetric, so the lower triangle is
//! a double count). Random graphs draw each edge independently.
//!
//! All generated models have zero fields.

use log::debug;
use rand::distr::weighted::WeightedIndex;
use rand::distr::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};
use crate::model::IsingModel;
use crate::utils::{linear_index_2d, linear_index_3d};

/// Dense scratch matrix used while a grid model is being populated.
struct Scratch {
    values: Vec<Vec<f64>>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self {
            values: vec![vec![0.0; n]; n],
        }
    }

    fn set(&mut self, a: usize, b: usize, value: f64) {
        self.values[a][b] = value;
    }

    /// Zeroes the lower triangle, keeping only one copy of each symmetric pair.
    fn drop_double_counts(&mut self) {
        let n = self.values.len();
        for i in 0..n {
            for j in (i + 1)..n {
                self.values[j][i] = 0.0;
            }
        }
    }

    fn into_model(self, beta: f64) -> Result<IsingModel> {
        IsingModel::from_matrix(beta, 1.0, &self.values)
    }
}

/// Generates an `x × y` grid with couplings given by `f(x1, y1, x2, y2)`.
///
/// Site `(i, j)` maps to index `i * y + j`. `f` is called once per ordered pair of
/// distinct sites and should be symmetric; only `f(a, b)` with `index(a) < index(b)`
/// survives.
pub fn two_d_grid<F>(x: usize, y: usize, f: F, beta: f64) -> Result<IsingModel>
where
    F: Fn(usize, usize, usize, usize) -> f64,
{
    let n = x
        .checked_mul(y)
        .ok_or_else(|| Error::invalid(format!("grid {}x{} is too large", x, y)))?;
    let mut scratch = Scratch::new(n);
    for i1 in 0..x {
        for j1 in 0..y {
            for i2 in 0..x {
                for j2 in 0..y {
                    if (i1, j1) == (i2, j2) {
                        continue;
                    }
                    let a = linear_index_2d(i1, j1, y);
                    let b = linear_index_2d(i2, j2, y);
                    scratch.set(a, b, f(i1, j1, i2, j2));
                }
            }
        }
    }
    scratch.drop_double_counts();

    let model = scratch.into_model(beta)?;
    debug!(
        "Generated {}x{} grid: {} sites, {} couplings",
        x,
        y,
        model.num_sites(),
        model.num_binary_funcs()
    );
    Ok(model)
}

/// Generates an `x × y × z` grid with couplings given by `f(x1, y1, z1, x2, y2, z2)`.
///
/// Site `(i, j, k)` maps to index `i * y * z + j * z + k`.
pub fn three_d_grid<F>(x: usize, y: usize, z: usize, f: F, beta: f64) -> Result<IsingModel>
where
    F: Fn(usize, usize, usize, usize, usize, usize) -> f64,
{
    let n = x
        .checked_mul(y)
        .and_then(|xy| xy.checked_mul(z))
        .ok_or_else(|| Error::invalid(format!("grid {}x{}x{} is too large", x, y, z)))?;
    let mut scratch = Scratch::new(n);
    let coords = move || (0..x).flat_map(move |i| (0..y).flat_map(move |j| (0..z).map(move |k| (i, j, k))));
    for (i1, j1, k1) in coords() {
        for (i2, j2, k2) in coords() {
            if (i1, j1, k1) == (i2, j2, k2) {
                continue;
            }
            let a = linear_index_3d(i1, j1, k1, y, z);
            let b = linear_index_3d(i2, j2, k2, y, z);
            scratch.set(a, b, f(i1, j1, k1, i2, j2, k2));
        }
    }
    scratch.drop_double_counts();

    let model = scratch.into_model(beta)?;
    debug!(
        "Generated {}x{}x{} grid: {} sites, {} couplings",
        x,
        y,
        z,
        model.num_sites(),
        model.num_binary_funcs()
    );
    Ok(model)
}

/// Nearest-neighbour coupling for [`two_d_grid`]: `j` between sites at Manhattan
/// distance 1, zero elsewhere.
pub fn nearest_neighbor_2d(j: f64) -> impl Fn(usize, usize, usize, usize) -> f64 {
    move |x1, y1, x2, y2| {
        if x1.abs_diff(x2) + y1.abs_diff(y2) == 1 {
            j
        } else {
            0.0
        }
    }
}

/// Nearest-neighbour coupling for [`three_d_grid`].
pub fn nearest_neighbor_3d(j: f64) -> impl Fn(usize, usize, usize, usize, usize, usize) -> f64 {
    move |x1, y1, z1, x2, y2, z2| {
        if x1.abs_diff(x2) + y1.abs_diff(y2) + z1.abs_diff(z2) == 1 {
            j
        } else {
            0.0
        }
    }
}

/// Generates a random graph on `n` sites with expected degree `exp_degree`.
///
/// Each pair `i < j` is an edge with probability `exp_degree / n`; an edge gets a
/// coupling drawn uniformly from `[j_lb, j_ub]`. Pairs are visited column by column
/// (`j` outer, `i < j` inner), which fixes the order of draws from `rng`.
pub fn random_graph<R: Rng + ?Sized>(
    n: usize,
    exp_degree: f64,
    beta: f64,
    j_lb: f64,
    j_ub: f64,
    rng: &mut R,
) -> Result<IsingModel> {
    for (what, value) in [("expected degree", exp_degree), ("beta", beta), ("j_lb", j_lb), ("j_ub", j_ub)] {
        if !value.is_finite() {
            return Err(Error::invalid(format!("{} must be finite, got {}", what, value)));
        }
    }
    if exp_degree < 0.0 || exp_degree > n as f64 {
        return Err(Error::invalid(format!(
            "expected degree {} must lie in [0, {}]",
            exp_degree, n
        )));
    }
    if j_lb > j_ub {
        return Err(Error::invalid(format!(
            "coupling bounds are inverted: [{}, {}]",
            j_lb, j_ub
        )));
    }

    let mut model = IsingModel::new(n, beta, 1.0)?;
    if n == 0 {
        return Ok(model);
    }

    // Index 1 of {0, 1} means "edge present".
    let edge = WeightedIndex::new([n as f64 - exp_degree, exp_degree])
        .map_err(|e| Error::invalid(format!("bad edge probability: {}", e)))?;
    let strength = Uniform::new_inclusive(j_lb, j_ub)
        .map_err(|e| Error::invalid(format!("bad coupling range [{}, {}]: {}", j_lb, j_ub, e)))?;
    for j in 0..n {
        for i in 0..j {
            if edge.sample(rng) == 1 {
                let value = strength.sample(rng);
                model.set_coupling(i, j, value)?;
            }
        }
    }

    debug!(
        "Generated random graph: {} sites, {} couplings (expected degree {})",
        n,
        model.num_binary_funcs(),
        exp_degree
    );
    Ok(model)
}

/// [`random_graph`] driven by a `ChaCha8Rng` seeded with `seed`.
///
/// The same arguments always produce the same model.
pub fn random_graph_seeded(
    n: usize,
    exp_degree: f64,
    beta: f64,
    j_lb: f64,
    j_ub: f64,
    seed: u64,
) -> Result<IsingModel> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_graph(n, exp_degree, beta, j_lb, j_ub, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn assert_lower_triangle_zero(model: &IsingModel) {
        let matrix = model.to_matrix();
        for i in 0..matrix.len() {
            for j in 0..i {
                assert_eq!(matrix[i][j], 0.0, "entry ({}, {}) below the diagonal", i, j);
            }
        }
    }

    #[test]
    fn test_scratch_drops_double_counts() {
        let mut scratch = Scratch::new(3);
        for a in 0..3 {
            for b in 0..3 {
                if a != b {
                    scratch.set(a, b, (a + b) as f64);
                }
            }
        }
        scratch.drop_double_counts();
        assert_eq!(
            scratch.values,
            vec![vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 3.0], vec![0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_two_d_grid_nearest_neighbor() {
        let model = two_d_grid(3, 3, nearest_neighbor_2d(1.0), 0.5).unwrap();
        assert_eq!(model.num_sites(), 9);
        // 2 * 3 * (3 - 1) edges in a 3x3 grid
        assert_eq!(model.num_binary_funcs(), 12);
        assert_eq!(model.num_unary_funcs(), 0);
        assert_eq!(model.beta(), 0.5);
        assert_eq!(model.coupling(0, 1), 1.0);
        assert_eq!(model.coupling(0, 3), 1.0);
        assert_eq!(model.coupling(0, 4), 0.0);
        assert_eq!(model.coupling(2, 3), 0.0);
        assert_lower_triangle_zero(&model);
    }

    #[test]
    fn test_two_d_grid_keeps_upper_value_of_asymmetric_function() {
        // f(a, b) where index(a) < index(b) must win
        let model = two_d_grid(1, 2, |_, y1, _, y2| if y1 < y2 { 3.0 } else { -7.0 }, 1.0).unwrap();
        assert_eq!(model.coupling(0, 1), 3.0);
        assert_lower_triangle_zero(&model);
    }

    #[test]
    fn test_two_d_grid_rectangular_indexing() {
        // 2 rows, 3 columns: site (1, 0) is index 3
        let model = two_d_grid(2, 3, nearest_neighbor_2d(2.0), 1.0).unwrap();
        assert_eq!(model.num_sites(), 6);
        assert_eq!(model.coupling(0, 3), 2.0);
        assert_eq!(model.coupling(2, 3), 0.0);
        assert_eq!(model.coupling(4, 5), 2.0);
        assert_eq!(model.num_binary_funcs(), 7);
    }

    #[test]
    fn test_two_d_grid_rejects_non_finite_coupling() {
        let res = two_d_grid(2, 2, |_, _, _, _| f64::NAN, 1.0);
        assert!(matches!(res, Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_three_d_grid_nearest_neighbor() {
        let model = three_d_grid(2, 2, 2, nearest_neighbor_3d(-1.0), 1.0).unwrap();
        assert_eq!(model.num_sites(), 8);
        // a cube has 12 edges
        assert_eq!(model.num_binary_funcs(), 12);
        assert_eq!(model.coupling(0, 1), -1.0);
        assert_eq!(model.coupling(0, 2), -1.0);
        assert_eq!(model.coupling(0, 4), -1.0);
        assert_eq!(model.coupling(0, 7), 0.0);
        assert_lower_triangle_zero(&model);
    }

    #[test]
    fn test_three_d_grid_calls_f_on_every_ordered_pair() {
        use std::cell::Cell;

        let calls = Cell::new(0usize);
        three_d_grid(
            2,
            1,
            3,
            |_, _, _, _, _, _| {
                calls.set(calls.get() + 1);
                1.0
            },
            1.0,
        )
        .unwrap();
        assert_eq!(calls.get(), 6 * 5);
    }

    #[test]
    fn test_random_graph_deterministic() {
        let a = random_graph_seeded(30, 4.0, 1.0, -1.0, 1.0, 42).unwrap();
        let b = random_graph_seeded(30, 4.0, 1.0, -1.0, 1.0, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_matrix(), b.to_matrix());
    }

    #[test]
    fn test_random_graph_respects_bounds() {
        let model = random_graph_seeded(40, 10.0, 1.0, 0.5, 2.0, 7).unwrap();
        assert!(model.num_binary_funcs() > 0);
        for (_, value) in model.couplings() {
            assert!((0.5..=2.0).contains(&value));
        }
        assert_eq!(model.num_unary_funcs(), 0);
        assert_lower_triangle_zero(&model);
    }

    #[test]
    fn test_random_graph_extreme_degrees() {
        let empty = random_graph_seeded(10, 0.0, 1.0, 1.0, 2.0, 0).unwrap();
        assert_eq!(empty.num_binary_funcs(), 0);

        let complete = random_graph_seeded(10, 10.0, 1.0, 1.0, 2.0, 0).unwrap();
        assert_eq!(complete.num_binary_funcs(), 45);
    }

    #[test]
    fn test_random_graph_rejects_bad_arguments() {
        assert!(random_graph_seeded(10, 11.0, 1.0, -1.0, 1.0, 0).is_err());
        assert!(random_graph_seeded(10, -1.0, 1.0, -1.0, 1.0, 0).is_err());
        assert!(random_graph_seeded(10, 2.0, 1.0, 1.0, -1.0, 0).is_err());
        assert!(random_graph_seeded(10, 2.0, f64::NAN, -1.0, 1.0, 0).is_err());
    }

    #[test]
    fn test_random_graph_rejects_unrepresentable_range() {
        // the width of [-MAX, MAX] overflows f64
        let res = random_graph_seeded(4, 4.0, 1.0, -f64::MAX, f64::MAX, 0);
        assert!(matches!(res, Err(Error::InvalidModel(_))));

        let model = random_graph_seeded(4, 4.0, 1.0, -f64::MAX / 4.0, f64::MAX / 4.0, 0).unwrap();
        assert_eq!(model.num_binary_funcs(), 6);
    }

    #[test]
    fn test_random_graph_empty() {
        let model = random_graph_seeded(0, 0.0, 1.0, -1.0, 1.0, 0).unwrap();
        assert_eq!(model.num_sites(), 0);
    }
}
