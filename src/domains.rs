//! Defines core algebraic traits and data structures.
//!
//! The central trait is [Ring], which has two binary operations, addition and
//! multiplication. Each ring has an associated element type, that should not
//! be confused with the ring type itself: the ring of finite fields
//! [FiniteField](finite_field::FiniteField) has elements of type
//! [FiniteFieldElement](finite_field::FiniteFieldElement), and the ring
//! elements do not implement operations such as addition or multiplication,
//! but rather the ring itself does. Most structures in this crate are generic
//! over the ring type.
//!
//! An extension of the ring trait is the [`EuclideanDomain`] trait, which adds
//! the ability to compute remainders, quotients, and gcds. Another extension
//! is the [`Field`] trait, which adds the ability to divide and invert
//! elements.

pub mod finite_field;

use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use rug::Integer;

/// A ring is a set with two binary operations, addition and multiplication.
///
/// The ring object owns the operations; elements are plain data. This allows
/// element types that do not carry the knowledge of the ring they live in,
/// such as residues that do not store their modulus.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    type Element: Clone + PartialEq + Eq + Hash + Debug;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: u64) -> Self::Element;
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;
    fn characteristic(&self) -> Integer;
    /// The number of elements in the ring. 0 is used for infinite rings.
    fn size(&self) -> Integer;

    /// Draw a uniform element, clamped to `range` where the ring supports it.
    /// A lower bound of 1 excludes zero.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;

    /// Format a ring element. `in_product` requests parentheses whenever the
    /// rendering of the element would bind weaker than multiplication.
    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result;

    /// Create a new printer for the given ring element that
    /// can be used in a [format!] macro.
    fn printer<'a>(&'a self, element: &'a Self::Element) -> RingPrinter<'a, Self> {
        RingPrinter::new(self, element)
    }
}

/// A Euclidean domain is a ring that supports division with remainder,
/// quotients, and gcds.
pub trait EuclideanDomain: Ring {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element);
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
}

/// A field is a ring that supports division and inversion.
pub trait Field: EuclideanDomain {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn inv(&self, a: &Self::Element) -> Self::Element;
}

/// Provides an interface for printing elements of a ring, suitable as an
/// argument to [format!]. Internally, it will call [Ring::fmt_display].
pub struct RingPrinter<'a, R: Ring> {
    pub ring: &'a R,
    pub element: &'a R::Element,
    pub in_product: bool,
}

impl<'a, R: Ring> RingPrinter<'a, R> {
    pub fn new(ring: &'a R, element: &'a R::Element) -> RingPrinter<'a, R> {
        RingPrinter {
            ring,
            element,
            in_product: false,
        }
    }
}

impl<'a, R: Ring> Display for RingPrinter<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring.fmt_display(self.element, self.in_product, f)
    }
}
