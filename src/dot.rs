//! Ising interaction graph to DOT (Graphviz) conversion.
//!
//! The generated graph is undirected:
//! - **Sites** are nodes labelled with their index (and the field `h`, when non-zero)
//! - **Couplings** are edges labelled with `J`; ferromagnetic (`J > 0`) and
//!   antiferromagnetic (`J < 0`) couplings are drawn with different styles
//!
//! # Examples
//!
//! ```
//! use ising_wmc::generators::{nearest_neighbor_2d, two_d_grid};
//!
//! let model = two_d_grid(2, 2, nearest_neighbor_2d(1.0), 1.0).unwrap();
//! let dot = model.to_dot().unwrap();
//! // Write to file and render with: neato -Tpng output.dot -o output.png
//! ```

use std::fmt::Write as _;

use crate::model::IsingModel;

/// Configuration options for DOT output generation.
///
/// # Examples
///
/// ```
/// use ising_wmc::dot::DotConfig;
/// use ising_wmc::model::IsingModel;
///
/// let model = IsingModel::new(3, 1.0, 1.0).unwrap();
/// let config = DotConfig {
///     node_shape: "point",
///     show_weights: false,
///     ..DotConfig::default()
/// };
///
/// let dot = model.to_dot_with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for sites (default: "circle")
    pub node_shape: &'static str,
    /// Style for edges with `J > 0` (default: "solid")
    pub ferromagnetic_style: &'static str,
    /// Style for edges with `J < 0` (default: "dashed")
    pub antiferromagnetic_style: &'static str,
    /// Whether to print `h` on nodes and `J` on edges (default: true)
    pub show_weights: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            ferromagnetic_style: "solid",
            antiferromagnetic_style: "dashed",
            show_weights: true,
        }
    }
}

impl IsingModel {
    /// Converts the interaction graph to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the interaction graph to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        for i in 0..self.num_sites() {
            let h = self.field(i);
            if config.show_weights && h != 0.0 {
                writeln!(dot, "{} [label=\"{}\\nh={}\"];", i, i, h)?;
            } else {
                writeln!(dot, "{} [label=\"{}\"];", i, i)?;
            }
        }

        for ((i, j), value) in self.couplings() {
            let style = if value > 0.0 {
                config.ferromagnetic_style
            } else {
                config.antiferromagnetic_style
            };
            if config.show_weights {
                writeln!(dot, "{} -- {} [style={}, label=\"{}\"];", i, j, style, value)?;
            } else {
                writeln!(dot, "{} -- {} [style={}];", i, j, style)?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
