//! Variables and literals of the weighted Boolean formulas this crate produces.
//!
//! Both follow DIMACS conventions: variables are 1-indexed (0 is reserved as the
//! clause terminator) and a literal is a non-zero signed integer whose sign is its
//! polarity.
use std::fmt;
use std::ops::Neg;

/// A variable identifier (1-indexed).
///
/// # Invariants
///
/// - Variable IDs must be >= 1 (0 is reserved for the DIMACS clause terminator)
/// - IDs are handed out by a [`FormulaSink`][crate::formula::FormulaSink] in allocation order
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based position of this variable in allocation order.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Positive literal of this variable.
    pub fn pos(self) -> Lit {
        Lit(self.0 as i32)
    }

    /// Negative literal of this variable.
    pub fn neg(self) -> Lit {
        Lit(-(self.0 as i32))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A Boolean literal: a variable or its negation.
///
/// Stored as a signed integer, so `Lit::from_dimacs(-3)` is `¬x3`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Creates a literal from its DIMACS representation.
    ///
    /// # Panics
    ///
    /// Panics if `lit == 0`.
    pub fn from_dimacs(lit: i32) -> Self {
        assert_ne!(lit, 0, "Literal cannot be zero");
        Lit(lit)
    }

    /// Returns the signed DIMACS representation.
    pub fn to_dimacs(self) -> i32 {
        self.0
    }

    /// Returns the underlying variable.
    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Evaluates the literal under the given value of its variable.
    pub fn eval(self, value: bool) -> bool {
        value == self.is_positive()
    }
}

// -lit
impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_creation() {
        let v1 = Var::new(1);
        let v2 = Var::new(2);
        assert_eq!(v1.id(), 1);
        assert_eq!(v2.index(), 1);
        assert!(v1 < v2);
    }

    #[test]
    #[should_panic(expected = "Variable IDs must be >= 1")]
    fn test_var_zero_panics() {
        Var::new(0);
    }

    #[test]
    fn test_lit_polarity() {
        let x = Var::new(3);
        assert_eq!(x.pos().to_dimacs(), 3);
        assert_eq!(x.neg().to_dimacs(), -3);
        assert_eq!(-x.pos(), x.neg());
        assert_eq!(x.neg().var(), x);
        assert!(x.pos().is_positive());
        assert!(x.neg().is_negative());
    }

    #[test]
    fn test_lit_eval() {
        let x = Var::new(1);
        assert!(x.pos().eval(true));
        assert!(!x.pos().eval(false));
        assert!(x.neg().eval(false));
        assert!(!x.neg().eval(true));
    }

    #[test]
    fn test_lit_from_dimacs() {
        let lit = Lit::from_dimacs(-7);
        assert_eq!(lit.var().id(), 7);
        assert_eq!(lit.to_string(), "-7");
    }

    #[test]
    #[should_panic(expected = "Literal cannot be zero")]
    fn test_lit_zero_panics() {
        Lit::from_dimacs(0);
    }
}
