//! # ising-wmc: Ising models as Weighted Model Counting problems
//!
//! **`ising-wmc`** describes classical Ising spin systems and reduces their partition
//! function to a **Weighted Model Counting (WMC)** problem: a CNF formula whose
//! variables carry a weight for each polarity, such that the weighted sum over all
//! satisfying assignments equals
//!
//! ```text
//! Z = Σ_s exp(-beta · H(s)),    H(s) = -Σ h_i s_i - Σ_{i<j} J_ij s_i s_j
//! ```
//!
//! The crate does not count models itself. It produces formulas for an external
//! weighted model counter, and reads/writes models in the UAI08 exchange format.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ising_wmc::model::IsingModel;
//!
//! // Two sites with h_0 = 1 and J_01 = 2
//! let model = IsingModel::from_matrix(1.0, 1.0, &[vec![1.0, 2.0], vec![0.0, 0.0]]).unwrap();
//!
//! // One variable per site, one per coupling, four clauses per coupling
//! let cnf = model.to_wmc().unwrap();
//! assert_eq!(cnf.num_vars(), 3);
//! assert_eq!(cnf.num_clauses(), 4);
//!
//! // UAI08 round-trip
//! let text = model.to_uai08_string();
//! let back = IsingModel::from_uai08_str(&text).unwrap();
//! assert_eq!(back.to_matrix(), vec![vec![1.0, 2.0], vec![0.0, 0.0]]);
//! ```
//!
//! ## Core Components
//!
//! - **[`model`]**: The [`IsingModel`][crate::model::IsingModel] itself.
//! - **[`generators`]**: 2D/3D grids and seeded random graphs.
//! - **[`encoder`]**: The reduction to WMC through any [`FormulaSink`][crate::formula::FormulaSink].
//! - **[`condensed`]**: The face-parity encoding of the square lattice.
//! - **[`uai`]**, **[`pan`]**, **[`dot`]**: File formats.

pub mod condensed;
pub mod dot;
pub mod encoder;
pub mod error;
pub mod formula;
pub mod generators;
pub mod model;
pub mod pan;
pub mod types;
pub mod uai;
pub mod utils;
