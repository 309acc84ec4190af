//! Factorization of univariate polynomials over finite fields.
//!
//! The pipeline composes square-free decomposition, distinct-degree
//! factorization and probabilistic equal-degree factorization
//! (Cantor-Zassenhaus for odd fields, a trace-based variant in
//! characteristic 2), preceded by a deflation transform that factors
//! `f = h(x^d)` through the lower-degree `h`. A specialization with an
//! explicit split stack finds the roots of polynomials that are known to
//! split into distinct nonzero linear factors.

use ahash::HashMap;
use rand::RngCore;
use rug::ops::Pow;
use smallvec::SmallVec;
use tracing::debug;

use crate::domains::finite_field::GaloisField;
use crate::domains::Ring;

use super::polynomial::UnivariatePolynomial;

pub trait Factorize: Sized {
    /// The scalar type of the coefficients.
    type Coefficient;

    /// Perform a square-free decomposition of a monic polynomial.
    /// The output is `a_1^e_1*...*a_n^e_n`, where the `a_i` are monic,
    /// square-free and pairwise coprime.
    fn square_free_factorization(&self) -> Vec<(Self, usize)>;

    /// Factor into monic irreducible factors with multiplicities, together
    /// with the overall leading coefficient. The product of all
    /// `factor^multiplicity`, scaled by the leading coefficient, reconstructs
    /// the input exactly.
    fn factor(&self, rng: &mut impl RngCore) -> (Vec<(Self, usize)>, Self::Coefficient);
}

/// A pending polynomial in the root splitting tree, identified by its depth
/// and node index. The stack holding these frames stays below
/// word-bits + 1 entries, as every frame has at most half the degree of the
/// frame two positions below it.
struct SplitStackFrame<F: Ring> {
    poly: UnivariatePolynomial<F>,
    depth: usize,
    node: usize,
}

impl<F: GaloisField> Factorize for UnivariatePolynomial<F> {
    type Coefficient = F::Element;

    fn square_free_factorization(&self) -> Vec<(Self, usize)> {
        if self.is_constant() {
            return vec![];
        }

        debug_assert!(self.field.is_one(&self.lcoeff()));

        if self.degree() == 1 {
            return vec![(self.clone(), 1)];
        }

        let derivative = self.derivative();

        if derivative.is_zero() {
            // every exponent with a nonzero coefficient is a multiple of the
            // characteristic: undo the implicit p-th power
            let p = characteristic_usize(&self.field);
            let mut factors = self.pth_root().square_free_factorization();
            for (_, pow) in &mut factors {
                *pow *= p;
            }
            return factors;
        }

        let mut factors = vec![];

        let mut g = self.gcd(&derivative);
        let mut w = self / &g;

        let mut i = 1;
        while !w.is_one() {
            let h = w.gcd(&g);
            let z = &w / &h;

            if z.degree() > 0 {
                factors.push((z.make_monic(), i));
            }

            i += 1;
            g = g / &h;
            w = h;
        }

        // what remains of gcd(f, f') is a perfect p-th power
        let g = g.make_monic();
        if g.degree() > 0 {
            let p = characteristic_usize(&self.field);
            for (f, pow) in g.pth_root().square_free_factorization() {
                factors.push((f, pow * p));
            }
        }

        factors
    }

    fn factor(&self, rng: &mut impl RngCore) -> (Vec<(Self, usize)>, F::Element) {
        if self.is_zero() {
            return (vec![], self.field.zero());
        }
        if self.is_constant() {
            return (vec![], self.get_constant());
        }

        let lcoeff = self.lcoeff();
        let f = self.clone().make_monic();

        if f.degree() == 1 {
            return (vec![(f, 1)], lcoeff);
        }

        let d = f.deflation();
        if d > 1 {
            debug!("deflating {} by {}", f, d);

            // factor h from f = h(x^d); an inflated factor of h is generally
            // neither irreducible nor square-free and is factored again
            let (inner, _) = f.deflate(d).factor(rng);

            let mut merged: HashMap<Self, usize> = HashMap::default();
            for (g, pow) in inner {
                for (u, e) in g.inflate(d).factor_monic(rng) {
                    *merged.entry(u).or_insert(0) += pow * e;
                }
            }

            return (merged.into_iter().collect(), lcoeff);
        }

        (f.factor_monic(rng), lcoeff)
    }
}

impl<F: GaloisField> UnivariatePolynomial<F> {
    /// The p-th root of a polynomial whose derivative vanishes: keep every
    /// p-th coefficient and take the p-th root of each.
    fn pth_root(&self) -> Self {
        let p = characteristic_usize(&self.field);

        let mut res = self.zero_with_capacity(self.degree() / p + 1);
        for (e, c) in self.coefficients.iter().enumerate() {
            if e % p == 0 {
                res.coefficients.push(self.field.pth_root(c));
            } else {
                debug_assert!(F::is_zero(c));
            }
        }

        res
    }

    /// Factor a monic polynomial without the deflation preprocessing.
    fn factor_monic(&self, rng: &mut impl RngCore) -> Vec<(Self, usize)> {
        let mut factors = vec![];
        for (sf, pow) in self.square_free_factorization() {
            debug!("SFF {} {}", sf, pow);
            for f in sf.factor_squarefree(rng) {
                factors.push((f, pow));
            }
        }
        factors
    }

    /// Factor a monic square-free polynomial into irreducibles. The
    /// Cantor-Zassenhaus chain is used for every input; the alternative
    /// strategies differ in performance only.
    fn factor_squarefree(&self, rng: &mut impl RngCore) -> Vec<Self> {
        let mut factors = vec![];
        for (d, bucket) in self.distinct_degree_factorization() {
            debug!("DDF {} {}", bucket, d);
            for f in bucket.equal_degree_factorization(d, rng) {
                factors.push(f);
            }
        }
        factors
    }

    /// Perform distinct degree factorization on a monic, square-free
    /// polynomial. Returns pairs of a degree `d` and the product of all
    /// irreducible factors of degree `d`, for increasing `d`.
    pub fn distinct_degree_factorization(&self) -> Vec<(usize, Self)> {
        let (mut factors, residual) = self.distinct_degree_factorization_bounded(self.degree());
        if let Some(r) = residual {
            factors.push((r.degree(), r));
        }
        factors
    }

    /// Distinct degree factorization that stops scanning at `max_degree`. The
    /// second return value is the residual product of all irreducible factors
    /// of degree larger than `max_degree`, if there is one. Useful when an
    /// external bound on the factor degrees is known.
    pub fn distinct_degree_factorization_bounded(
        &self,
        max_degree: usize,
    ) -> (Vec<(usize, Self)>, Option<Self>) {
        let mut f = self.clone().make_monic();

        if f.is_constant() {
            return (vec![], None);
        }

        let q = self.field.size();
        let x = self.monomial(self.field.one(), 1);

        let mut h = x.clone();
        let mut factors = vec![];
        let mut i = 0;

        loop {
            if f.is_one() {
                break;
            }

            // all factors of degree <= i are peeled off, so if f is shorter
            // than the product of two larger factors it is irreducible
            if f.degree() < 2 * (i + 1) {
                factors.push((f.degree(), f));
                break;
            }

            if i >= max_degree {
                return (factors, Some(f));
            }

            i += 1;
            h = h.exp_mod(&q, &f);

            let g = (&h - &x).gcd(&f);
            if !g.is_one() {
                f = &f / &g;
                factors.push((i, g));
            }
        }

        (factors, None)
    }

    /// Perform the Cantor-Zassenhaus probabilistic algorithm on a polynomial
    /// known to be a product of distinct irreducible factors that all have
    /// degree `d`, yielding those factors.
    pub fn equal_degree_factorization(&self, d: usize, rng: &mut impl RngCore) -> Vec<Self> {
        let s = self.clone().make_monic();

        if s.is_constant() {
            return vec![];
        }

        let n = s.degree();
        if n == d {
            return vec![s];
        }

        assert!(
            d > 0 && n % d == 0,
            "input is not a product of factors of degree {}",
            d
        );

        // a failed trial is only a signal to try again
        let factor = loop {
            if let Some(g) = s.equal_degree_split(d, rng) {
                break g;
            }
        };

        let rest = &s / &factor;

        let mut factors = factor.equal_degree_factorization(d, rng);
        factors.extend(rest.equal_degree_factorization(d, rng));
        factors
    }

    /// One randomized splitting attempt on a monic product of at least two
    /// distinct irreducible factors of degree `d`. Returns a nontrivial
    /// monic factor on success; `None` means the trial failed and should be
    /// retried.
    pub fn equal_degree_split(&self, d: usize, rng: &mut impl RngCore) -> Option<Self> {
        if self.field.characteristic() == 2 {
            return self.equal_degree_split_char_two(d, rng);
        }

        let n = self.degree();

        let a = self.sample_nonconstant(rng);

        let g = a.gcd(self);
        if g.degree() > 0 && g.degree() < n {
            debug!("EDF gcd split {}", g);
            return Some(g);
        }

        // a^((q^d - 1)/2) evaluates to 1 on about half of the roots
        let exp = (self.field.size().pow(d as u32) - 1u32) / 2u32;
        let b = a.exp_mod(&exp, self);

        let g = (b - self.one()).gcd(self);
        if g.degree() > 0 && g.degree() < n {
            Some(g)
        } else {
            None
        }
    }

    /// The characteristic-2 splitting trial: the trace-like sum
    /// `T = a + a^2 + a^4 + ...` of a random polynomial `a` vanishes on about
    /// half of the irreducible factors.
    fn equal_degree_split_char_two(&self, d: usize, rng: &mut impl RngCore) -> Option<Self> {
        let n = self.degree();

        let a = self.sample_nonconstant(rng);

        // q = 2^k, so the factors define the field with 2^(d k) elements
        let k = (self.field.size().significant_bits() - 1) as usize;

        let mut t = a.clone();
        let mut cur = a;
        for _ in 1..d * k {
            cur = (&cur * &cur).rem(self);
            t = t + cur.clone();
        }

        let g = t.gcd(self);
        if g.degree() > 0 && g.degree() < n {
            Some(g)
        } else {
            None
        }
    }

    /// Draw a uniform nonconstant polynomial of degree smaller than the
    /// degree of `self`.
    fn sample_nonconstant(&self, rng: &mut impl RngCore) -> Self {
        let n = self.degree();
        debug_assert!(n > 1);

        loop {
            let a = Self::from_coefficients(
                &self.field,
                (0..n)
                    .map(|_| self.field.sample(rng, (0, i64::MAX)))
                    .collect(),
                self.variable.clone(),
            );

            if a.degree() > 0 {
                return a;
            }
        }
    }

    /// Find the roots of a polynomial that is known to have `deg(P)` distinct
    /// nonzero roots in the field, using an explicit split stack instead of
    /// recursion. Returns `None` when the precondition is detectably violated.
    /// Characteristic 2 is not supported.
    pub fn distinct_nonzero_roots(&self, rng: &mut impl RngCore) -> Option<Vec<F::Element>> {
        if self.is_constant() {
            return Some(vec![]);
        }

        if self.field.characteristic() == 2 {
            return None;
        }

        let f = self.clone().make_monic();
        let n = f.degree();

        if n == 1 {
            if F::is_zero(&f.coefficients[0]) {
                return None;
            }
            return Some(vec![self.field.neg(&f.coefficients[0])]);
        }

        let exp = (self.field.size() - 1u32) / 2u32;
        let x = f.monomial(f.field.one(), 1);

        // partition the roots by the sign of their (q-1)/2 power
        let b = x.exp_mod(&exp, &f);
        let plus = (&b - &f.one()).gcd(&f);
        let minus = (&b + &f.one()).gcd(&f);

        if plus.degree() + minus.degree() != n {
            // the input does not have deg(f) distinct nonzero roots
            return None;
        }

        let mut roots = Vec::with_capacity(n);
        let mut stack: SmallVec<[SplitStackFrame<F>; 16]> = SmallVec::new();

        // the larger part goes in first, keeping the stack shallow
        let (larger, smaller) = if plus.degree() >= minus.degree() {
            (plus, minus)
        } else {
            (minus, plus)
        };
        for (i, part) in [larger, smaller].into_iter().enumerate() {
            if part.degree() > 0 {
                stack.push(SplitStackFrame {
                    poly: part,
                    depth: 1,
                    node: i + 1,
                });
            }
        }

        while let Some(SplitStackFrame { poly, depth, node }) = stack.pop() {
            debug_assert!(stack.len() <= usize::BITS as usize + 1);

            if poly.degree() == 1 {
                roots.push(self.field.neg(&poly.coefficients[0]));
                continue;
            }

            debug!("splitting node {} at depth {}", node, depth);

            // a random shift separates the roots with probability about 1/2
            let (larger, smaller) = loop {
                let delta = poly.constant(self.field.sample(rng, (0, i64::MAX)));
                let c = (&x + &delta).exp_mod(&exp, &poly);
                let h = (c - poly.one()).gcd(&poly);

                if h.degree() > 0 && h.degree() < poly.degree() {
                    let rest = &poly / &h;
                    break if h.degree() >= rest.degree() {
                        (h, rest)
                    } else {
                        (rest, h)
                    };
                }
            };

            stack.push(SplitStackFrame {
                poly: larger,
                depth: depth + 1,
                node: 2 * node + 1,
            });
            stack.push(SplitStackFrame {
                poly: smaller,
                depth: depth + 1,
                node: 2 * node + 2,
            });
        }

        if roots.len() == n {
            Some(roots)
        } else {
            None
        }
    }
}

fn characteristic_usize<F: Ring>(field: &F) -> usize {
    field
        .characteristic()
        .to_usize()
        .expect("characteristic does not fit in a machine word")
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domains::finite_field::{FiniteField, FiniteFieldCore, Two, Z2, Zp};
    use crate::domains::Ring;
    use crate::poly::polynomial::UnivariatePolynomial;
    use crate::poly::Variable;

    use super::Factorize;

    fn poly(field: &Zp, coeffs: &[u32]) -> UnivariatePolynomial<Zp> {
        UnivariatePolynomial::from_coefficients(
            field,
            coeffs.iter().map(|c| field.to_element(*c)).collect(),
            Arc::new(Variable::new("x")),
        )
    }

    fn poly2(coeffs: &[u8]) -> UnivariatePolynomial<FiniteField<Two>> {
        UnivariatePolynomial::from_coefficients(
            &Z2,
            coeffs.to_vec(),
            Arc::new(Variable::new("x")),
        )
    }

    #[test]
    fn square_free() {
        let field = Zp::new(7);
        let x_plus_1 = poly(&field, &[1, 1]);
        let x_plus_2 = poly(&field, &[2, 1]);

        // (x+1)^3 (x+2)
        let f = &x_plus_1.pow(3) * &x_plus_2;
        let mut sf = f.square_free_factorization();
        sf.sort_by_key(|(_, pow)| *pow);

        assert_eq!(sf, vec![(x_plus_2, 1), (x_plus_1, 3)]);
    }

    #[test]
    fn square_free_on_square_free_input() {
        let field = Zp::new(7);
        let f = poly(&field, &[2, 3, 1]); // (x+1)(x+2)
        assert_eq!(f.square_free_factorization(), vec![(f.clone(), 1)]);
    }

    #[test]
    fn square_free_perfect_power() {
        let field = Zp::new(5);
        // (x+3)^5 = x^5 + 3 mod 5
        let f = poly(&field, &[3, 0, 0, 0, 0, 1]);
        assert_eq!(
            f.square_free_factorization(),
            vec![(poly(&field, &[3, 1]), 5)]
        );
    }

    #[test]
    fn distinct_degree() {
        let field = Zp::new(5);
        let linear = poly(&field, &[2, 3, 1]); // (x+1)(x+2)
        let quadratic = poly(&field, &[2, 0, 1]); // x^2 + 2, irreducible mod 5

        let f = &linear * &quadratic;
        let buckets = f.distinct_degree_factorization();

        assert_eq!(buckets, vec![(1, linear), (2, quadratic)]);
    }

    #[test]
    fn distinct_degree_bounded() {
        let field = Zp::new(5);
        let linear = poly(&field, &[1, 1]); // x + 1
        let quadratics = &poly(&field, &[2, 0, 1]) * &poly(&field, &[3, 0, 1]);

        let f = &linear * &quadratics;
        let (buckets, residual) = f.distinct_degree_factorization_bounded(1);

        assert_eq!(buckets, vec![(1, linear)]);
        assert_eq!(residual, Some(quadratics));
    }

    #[test]
    fn equal_degree() {
        let field = Zp::new(5);
        let a = poly(&field, &[2, 0, 1]); // x^2 + 2
        let b = poly(&field, &[3, 0, 1]); // x^2 + 3

        let mut rng = StdRng::seed_from_u64(7);
        let mut factors = (&a * &b).equal_degree_factorization(2, &mut rng);
        factors.sort_by_key(|f| field.from_element(&f.get_constant()));

        assert_eq!(factors, vec![a, b]);
    }

    #[test]
    fn equal_degree_char_two() {
        // x^2 + x = x (x+1) over Z2
        let f = poly2(&[0, 1, 1]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut factors = f.equal_degree_factorization(1, &mut rng);
        factors.sort_by_key(|f| f.get_constant());

        assert_eq!(factors, vec![poly2(&[0, 1]), poly2(&[1, 1])]);
    }

    #[test]
    fn equal_degree_char_two_cubics() {
        // x^6+x^5+x^4+x^3+x^2+x+1 = (x^3+x+1)(x^3+x^2+1) over Z2
        let f = poly2(&[1, 1, 1, 1, 1, 1, 1]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut factors = f.equal_degree_factorization(3, &mut rng);
        factors.sort_by(|a, b| a.coefficients.cmp(&b.coefficients));

        assert_eq!(factors, vec![poly2(&[1, 0, 1, 1]), poly2(&[1, 1, 0, 1])]);
    }

    #[test]
    fn irreducible_over_z2() {
        // x^2 + x + 1 is irreducible over Z2
        let f = poly2(&[1, 1, 1]);
        let mut rng = StdRng::seed_from_u64(1);
        let (factors, lcoeff) = f.factor(&mut rng);

        assert_eq!(factors, vec![(f, 1)]);
        assert_eq!(lcoeff, 1);
    }

    #[test]
    fn factor_over_z2() {
        // x^5 + x^4 + 1 = (x^2+x+1)(x^3+x+1) over Z2
        let f = poly2(&[1, 0, 0, 0, 1, 1]);
        let mut rng = StdRng::seed_from_u64(1);
        let (mut factors, _) = f.factor(&mut rng);
        factors.sort_by_key(|(f, _)| f.degree());

        assert_eq!(
            factors,
            vec![(poly2(&[1, 1, 1]), 1), (poly2(&[1, 1, 0, 1]), 1)]
        );
    }

    #[test]
    fn leading_coefficient() {
        let field = Zp::new(7);
        // 3 (x+1)^2
        let f = poly(&field, &[1, 1]).pow(2).mul_coeff(&field.to_element(3));
        let mut rng = StdRng::seed_from_u64(2);
        let (factors, lcoeff) = f.factor(&mut rng);

        assert_eq!(factors, vec![(poly(&field, &[1, 1]), 2)]);
        assert_eq!(field.from_element(&lcoeff), 3);
    }

    #[test]
    fn degenerate_inputs() {
        let field = Zp::new(7);
        let mut rng = StdRng::seed_from_u64(3);

        let zero = poly(&field, &[]);
        let (factors, lcoeff) = zero.factor(&mut rng);
        assert!(factors.is_empty());
        assert!(Zp::is_zero(&lcoeff));

        let constant = poly(&field, &[4]);
        let (factors, lcoeff) = constant.factor(&mut rng);
        assert!(factors.is_empty());
        assert_eq!(field.from_element(&lcoeff), 4);
    }

    #[test]
    fn inflated_perfect_power() {
        let field = Zp::new(5);
        // x^5 + 1 = (x+1)^5 mod 5; deflation by 5 must refactor the inflated
        // linear factor into a fifth power
        let f = poly(&field, &[1, 0, 0, 0, 0, 1]);
        let mut rng = StdRng::seed_from_u64(4);
        let (factors, _) = f.factor(&mut rng);

        assert_eq!(factors, vec![(poly(&field, &[1, 1]), 5)]);
    }

    #[test]
    fn roots() {
        let field = Zp::new(101);
        // (x-1)(x-2)(x-3)(x-4)
        let f = &(&poly(&field, &[100, 1]) * &poly(&field, &[99, 1]))
            * &(&poly(&field, &[98, 1]) * &poly(&field, &[97, 1]));

        let mut rng = StdRng::seed_from_u64(5);
        let mut roots: Vec<_> = f
            .distinct_nonzero_roots(&mut rng)
            .unwrap()
            .iter()
            .map(|r| field.from_element(r))
            .collect();
        roots.sort();

        assert_eq!(roots, vec![1, 2, 3, 4]);
    }

    #[test]
    fn roots_detect_bad_input() {
        let field = Zp::new(101);
        let mut rng = StdRng::seed_from_u64(6);

        // repeated root
        let f = poly(&field, &[100, 1]).pow(2);
        assert_eq!(f.distinct_nonzero_roots(&mut rng), None);

        // root at zero
        let f = &poly(&field, &[0, 1]) * &poly(&field, &[100, 1]);
        assert_eq!(f.distinct_nonzero_roots(&mut rng), None);

        // linear with zero constant term
        let f = poly(&field, &[0, 1]);
        assert_eq!(f.distinct_nonzero_roots(&mut rng), None);

        // characteristic 2 is unsupported
        let f = poly2(&[1, 1]);
        assert_eq!(f.distinct_nonzero_roots(&mut rng), None);

        // a constant has no roots to find
        let f = poly(&field, &[3]);
        assert_eq!(f.distinct_nonzero_roots(&mut rng), Some(vec![]));
    }
}
