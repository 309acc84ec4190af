//! Dense univariate polynomials over a generic coefficient ring.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use rug::Integer;

use crate::domains::{Field, Ring, RingPrinter};

use super::Variable;

/// A dense univariate polynomial. The coefficient at index 0 is the constant
/// term; the coefficient belonging to the highest stored power is nonzero.
/// The zero polynomial stores no coefficients.
#[derive(Clone)]
pub struct UnivariatePolynomial<F: Ring> {
    pub coefficients: Vec<F::Element>,
    pub variable: Arc<Variable>,
    pub field: F,
}

impl<F: Ring> std::fmt::Debug for UnivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for c in self.coefficients.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?} }}", c)?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring> std::fmt::Display for UnivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let v = self.variable.to_string();

        let mut first = true;
        for (e, c) in self.coefficients.iter().enumerate() {
            if F::is_zero(c) {
                continue;
            }

            if first {
                first = false;
            } else {
                write!(f, "+")?;
            }

            write!(
                f,
                "{}*{}^{}",
                RingPrinter {
                    element: c,
                    ring: &self.field,
                    in_product: true,
                },
                v,
                e
            )?;
        }
        Ok(())
    }
}

impl<F: Ring> UnivariatePolynomial<F> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable and field are inherited.
    #[inline]
    pub fn new(field: &F, cap: Option<usize>, variable: Arc<Variable>) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            field: field.clone(),
            variable,
        }
    }

    /// Constructs a polynomial from a dense coefficient list, the constant
    /// term first. Trailing zero coefficients are trimmed.
    pub fn from_coefficients(
        field: &F,
        coefficients: Vec<F::Element>,
        variable: Arc<Variable>,
    ) -> Self {
        let mut r = Self {
            coefficients,
            field: field.clone(),
            variable,
        };
        r.truncate();
        r
    }

    /// Constructs a zero polynomial, inheriting the field and variable from
    /// `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self {
            coefficients: vec![],
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Constructs a zero polynomial with the given capacity, inheriting the
    /// field and variable from `self`.
    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Constructs a constant polynomial, inheriting the field and variable
    /// from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Constructs a polynomial that is one, inheriting the field and variable
    /// from `self`.
    #[inline]
    pub fn one(&self) -> Self {
        Self {
            coefficients: vec![self.field.one()],
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: F::Element, exponent: usize) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        let mut coefficients = vec![self.field.zero(); exponent + 1];
        coefficients[exponent] = coeff;

        Self {
            coefficients,
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.coefficients.len() == 1 && self.field.is_one(&self.coefficients[0])
    }

    /// Returns true if the polynomial is constant, including the zero
    /// polynomial.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.coefficients.len() <= 1
    }

    /// Get the constant term of the polynomial.
    #[inline]
    pub fn get_constant(&self) -> F::Element {
        if self.is_zero() {
            return self.field.zero();
        }

        self.coefficients[0].clone()
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> F::Element {
        self.coefficients
            .last()
            .unwrap_or(&self.field.zero())
            .clone()
    }

    /// The degree of the polynomial. The zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        if self.is_zero() {
            return 0;
        }

        self.coefficients.len() - 1
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Multiply by `x^exp`.
    pub fn mul_exp(&self, exp: usize) -> Self {
        if exp == 0 || self.is_zero() {
            return self.clone();
        }

        let mut a = self.zero();
        a.coefficients = vec![self.field.zero(); self.coefficients.len() + exp];

        for (cn, c) in a.coefficients.iter_mut().skip(exp).zip(&self.coefficients) {
            *cn = c.clone();
        }

        a
    }

    /// Multiply every coefficient with `coeff`.
    pub fn mul_coeff(mut self, coeff: &F::Element) -> Self {
        for c in &mut self.coefficients {
            if !F::is_zero(c) {
                self.field.mul_assign(c, coeff);
            }
        }

        self
    }

    fn truncate(&mut self) {
        let d = self
            .coefficients
            .iter()
            .rev()
            .position(|c| !F::is_zero(c))
            .unwrap_or(self.coefficients.len());

        let new_len = self.coefficients.len() - d;
        self.coefficients.truncate(new_len);
    }

    /// Evaluate the polynomial at `x` with Horner's scheme.
    pub fn evaluate(&self, x: &F::Element) -> F::Element {
        let mut res = self.field.zero();
        for c in self.coefficients.iter().rev() {
            self.field.mul_assign(&mut res, x);
            self.field.add_assign(&mut res, c);
        }
        res
    }

    /// The formal derivative.
    pub fn derivative(&self) -> Self {
        if self.is_constant() {
            return self.zero();
        }

        let mut res = self.zero();
        res.coefficients = vec![self.field.zero(); self.degree()];

        for (e, c) in self.coefficients.iter().enumerate().skip(1) {
            if !F::is_zero(c) {
                res.coefficients[e - 1] = self.field.mul(c, &self.field.nth(e as u64));
            }
        }

        res.truncate();
        res
    }

    /// The largest `d` such that the polynomial can be written as `h(x^d)`,
    /// i.e. the gcd of the exponents of all nonconstant terms. Returns 1 for
    /// constants.
    pub fn deflation(&self) -> usize {
        if self.is_constant() {
            return 1;
        }

        let mut d = 0;
        for (e, c) in self.coefficients.iter().enumerate().skip(1) {
            if !F::is_zero(c) {
                d = gcd_usize(d, e);
                if d == 1 {
                    return 1;
                }
            }
        }

        if d == 0 {
            1
        } else {
            d
        }
    }

    /// Extract `h` from `self = h(x^d)` by keeping every d-th coefficient.
    pub fn deflate(&self, d: usize) -> Self {
        debug_assert!(d > 0);

        if d == 1 || self.is_constant() {
            return self.clone();
        }

        let mut res = self.zero_with_capacity(self.degree() / d + 1);
        for (e, c) in self.coefficients.iter().enumerate() {
            if e % d == 0 {
                res.coefficients.push(c.clone());
            } else {
                debug_assert!(F::is_zero(c));
            }
        }

        res.truncate();
        res
    }

    /// Substitute `x^d` for `x`, the inverse of [deflate](Self::deflate).
    pub fn inflate(&self, d: usize) -> Self {
        debug_assert!(d > 0);

        if d == 1 || self.is_constant() {
            return self.clone();
        }

        let mut res = self.zero();
        res.coefficients = vec![self.field.zero(); self.degree() * d + 1];
        for (e, c) in self.coefficients.iter().enumerate() {
            if !F::is_zero(c) {
                res.coefficients[e * d] = c.clone();
            }
        }

        res
    }
}

fn gcd_usize(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl<F: Ring> PartialEq for UnivariatePolynomial<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
            && (self.variable == other.variable || self.is_constant())
    }
}

impl<F: Ring> Eq for UnivariatePolynomial<F> {}

impl<F: Ring> std::hash::Hash for UnivariatePolynomial<F> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.coefficients.hash(state);
    }
}

impl<F: Ring> Add for UnivariatePolynomial<F> {
    type Output = Self;

    fn add(mut self, mut other: Self) -> Self::Output {
        debug_assert_eq!(self.field, other.field);

        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        if self.coefficients.len() < other.coefficients.len() {
            std::mem::swap(&mut self, &mut other);
        }

        for (i, c) in other.coefficients.iter().enumerate() {
            self.field.add_assign(&mut self.coefficients[i], c);
        }

        self.truncate();

        self
    }
}

impl<'a, 'b, F: Ring> Add<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn add(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        (self.clone()).add(other.clone())
    }
}

impl<F: Ring> Sub for UnivariatePolynomial<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, F: Ring> Sub<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn sub(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        (self.clone()).add(other.clone().neg())
    }
}

impl<F: Ring> Neg for UnivariatePolynomial<F> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.field.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring> Mul<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn mul(self, rhs: &'a UnivariatePolynomial<F>) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        let mut res = self.zero();
        res.coefficients =
            vec![self.field.zero(); self.coefficients.len() + rhs.coefficients.len() - 1];

        for (e1, c1) in self.coefficients.iter().enumerate() {
            if F::is_zero(c1) {
                continue;
            }

            for (e2, c2) in rhs.coefficients.iter().enumerate() {
                if !F::is_zero(c2) {
                    self.field
                        .add_mul_assign(&mut res.coefficients[e1 + e2], c1, c2);
                }
            }
        }

        res.truncate();
        res
    }
}

impl<'a, F: Ring> Mul<&'a UnivariatePolynomial<F>> for UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    #[inline]
    fn mul(self, rhs: &'a UnivariatePolynomial<F>) -> Self::Output {
        (&self) * rhs
    }
}

impl<'a, 'b, F: Field> Div<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn div(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        self.divides(other)
            .unwrap_or_else(|| panic!("No clean division of {} by {}", self, other))
    }
}

impl<'a, F: Field> Div<&'a UnivariatePolynomial<F>> for UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn div(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        (&self).div(other)
    }
}

impl<F: Field> UnivariatePolynomial<F> {
    /// Make the polynomial monic.
    pub fn make_monic(self) -> Self {
        if self.is_zero() || self.field.is_one(&self.lcoeff()) {
            return self;
        }

        let ci = self.field.inv(&self.lcoeff());
        self.mul_coeff(&ci)
    }

    /// Compute the quotient and remainder of `self / div`, making the divisor
    /// monic first through its cached leading coefficient inverse.
    pub fn quot_rem(&self, div: &Self) -> (Self, Self) {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return (self.clone(), self.clone());
        }

        let m = div.degree();
        if self.degree() < m {
            return (self.zero(), self.clone());
        }

        let u = self.field.inv(&div.lcoeff());

        let mut n = self.degree();
        let mut q = self.zero();
        q.coefficients = vec![self.field.zero(); n - m + 1];

        let mut r = self.clone();

        while n >= m {
            let qq = self.field.mul(&r.coefficients[n], &u);
            r = r - div.mul_exp(n - m).mul_coeff(&qq);
            q.coefficients[n - m] = qq;

            if r.is_zero() {
                break;
            }

            n = r.degree();
        }

        q.truncate();

        (q, r)
    }

    /// Compute the remainder `self % div`.
    pub fn rem(&self, div: &Self) -> Self {
        if self.degree() < div.degree() {
            return self.clone();
        }

        self.quot_rem(div).1
    }

    /// Return the exact quotient if `div` divides `self`.
    pub fn divides(&self, div: &Self) -> Option<Self> {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return Some(self.clone());
        }

        if self.degree() < div.degree() {
            return None;
        }

        let (q, r) = self.quot_rem(div);
        if r.is_zero() {
            Some(q)
        } else {
            None
        }
    }

    /// Compute the univariate GCD using Euclid's algorithm. The result is
    /// normalized to be monic.
    pub fn gcd(&self, b: &Self) -> Self {
        if self.is_zero() {
            return b.clone();
        }
        if b.is_zero() {
            return self.clone();
        }

        let mut c = self.clone();
        let mut d = b.clone();
        if self.degree() < b.degree() {
            std::mem::swap(&mut c, &mut d);
        }

        let mut r = c.quot_rem(&d).1;
        while !r.is_zero() {
            c = d;
            d = r;
            r = c.quot_rem(&d).1;
        }

        d.make_monic()
    }

    /// Compute `self^e mod m` by binary exponentiation, reducing at every
    /// stage. The modulus is made monic once up front so that every reduction
    /// reuses the same leading coefficient inverse.
    pub fn exp_mod(&self, e: &Integer, m: &Self) -> Self {
        if *e == 0 {
            return self.one();
        }

        let mm = m.clone().make_monic();

        let mut n = e.clone();
        let mut x = self.rem(&mm);
        let mut y = self.one();
        while n != 1u32 {
            if n.is_odd() {
                y = (&y * &x).rem(&mm);
                n -= 1u32;
            }

            x = (&x * &x).rem(&mm);
            n /= 2u32;
        }

        (x * &y).rem(&mm)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rug::Integer;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::poly::Variable;

    use super::UnivariatePolynomial;

    fn poly(field: &Zp, coeffs: &[u32]) -> UnivariatePolynomial<Zp> {
        UnivariatePolynomial::from_coefficients(
            field,
            coeffs.iter().map(|c| field.to_element(*c)).collect(),
            Arc::new(Variable::new("x")),
        )
    }

    #[test]
    fn arithmetic() {
        let field = Zp::new(17);
        let a = poly(&field, &[1, 2, 3]);
        let b = poly(&field, &[5, 1]);

        let sum = &a + &b;
        assert_eq!(sum, poly(&field, &[6, 3, 3]));

        let product = &a * &b;
        assert_eq!(product, poly(&field, &[5, 11, 0, 3]));

        let neg_b = -b.clone();
        assert_eq!(&sum + &neg_b, a);
    }

    #[test]
    fn quot_rem() {
        let field = Zp::new(17);
        let a = poly(&field, &[1, 0, 0, 0, 1]); // x^4 + 1
        let b = poly(&field, &[3, 1]); // x + 3

        let (q, r) = a.quot_rem(&b);
        assert_eq!(&(&q * &b) + &r, a);
        assert!(r.degree() < b.degree());

        // division by a constant has no remainder
        let c = poly(&field, &[5]);
        let (q, r) = a.quot_rem(&c);
        assert!(r.is_zero());
        assert_eq!(q.mul_coeff(&field.to_element(5)), a);
    }

    #[test]
    fn gcd() {
        let field = Zp::new(7);
        let a = poly(&field, &[1, 1]); // x + 1
        let b = poly(&field, &[2, 1]); // x + 2
        let c = poly(&field, &[3, 1]); // x + 3

        let left = &a * &b;
        let right = &(&a * &a) * &c;
        let g = left.gcd(&right);
        assert_eq!(g, a);
    }

    #[test]
    fn derivative() {
        let field = Zp::new(5);
        // x^5 + 3 has zero derivative mod 5
        let a = poly(&field, &[3, 0, 0, 0, 0, 1]);
        assert!(a.derivative().is_zero());

        let b = poly(&field, &[1, 2, 3]);
        assert_eq!(b.derivative(), poly(&field, &[2, 1]));
    }

    #[test]
    fn exp_mod() {
        let field = Zp::new(5);
        let x = poly(&field, &[0, 1]);
        let m = poly(&field, &[1, 0, 0, 0, 1]); // x^4 + 1

        // x^5 = x * x^4 = -x mod x^4 + 1
        let r = x.exp_mod(&Integer::from(5), &m);
        assert_eq!(r, poly(&field, &[0, 4]));

        let r = x.exp_mod(&Integer::from(8), &m);
        assert_eq!(r, poly(&field, &[1]));
    }

    #[test]
    fn deflate_inflate() {
        let field = Zp::new(7);
        // x^6 + 3x^3 + 2
        let a = poly(&field, &[2, 0, 0, 3, 0, 0, 1]);
        assert_eq!(a.deflation(), 3);

        let h = a.deflate(3);
        assert_eq!(h, poly(&field, &[2, 3, 1]));
        assert_eq!(h.inflate(3), a);

        let b = poly(&field, &[1, 1]);
        assert_eq!(b.deflation(), 1);
    }

    #[test]
    fn evaluate() {
        let field = Zp::new(11);
        let a = poly(&field, &[1, 2, 1]); // (x + 1)^2
        let v = a.evaluate(&field.to_element(3));
        assert_eq!(field.from_element(&v), 5);
    }
}
