use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rug::Integer;

use factorica::domains::finite_field::{FiniteField, FiniteFieldCore, Zp, Zp64};
use factorica::domains::{Field, Ring};
use factorica::poly::factor::Factorize;
use factorica::poly::polynomial::UnivariatePolynomial;
use factorica::poly::Variable;

fn poly<F: Field>(field: &F, coeffs: &[u64]) -> UnivariatePolynomial<F> {
    UnivariatePolynomial::from_coefficients(
        field,
        coeffs.iter().map(|c| field.nth(*c)).collect(),
        Arc::new(Variable::new("x")),
    )
}

/// Multiply all factors back together, scaled by the leading coefficient.
fn reconstruct<F: Field>(
    factors: &[(UnivariatePolynomial<F>, usize)],
    lcoeff: &F::Element,
    sample: &UnivariatePolynomial<F>,
) -> UnivariatePolynomial<F> {
    let mut acc = sample.constant(lcoeff.clone());
    for (f, pow) in factors {
        acc = acc * &f.pow(*pow);
    }
    acc
}

/// Every factor must be irreducible: its own distinct-degree factorization
/// is a single bucket of its full degree.
fn assert_irreducible<F: factorica::domains::finite_field::GaloisField>(
    f: &UnivariatePolynomial<F>,
) {
    let buckets = f.distinct_degree_factorization();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].0, f.degree());
}

#[test]
fn x4_plus_1_over_f5() {
    let field = Zp::new(5);
    let f = poly(&field, &[1, 0, 0, 0, 1]);

    let mut rng = StdRng::seed_from_u64(11);
    let (factors, lcoeff) = f.factor(&mut rng);

    assert!(field.is_one(&lcoeff));
    assert_eq!(reconstruct(&factors, &lcoeff, &f), f);

    // two irreducible quadratics, each with multiplicity 1
    assert_eq!(factors.len(), 2);
    for (u, pow) in &factors {
        assert_eq!(*pow, 1);
        assert_eq!(u.degree(), 2);
        assert_irreducible(u);
    }
}

#[test]
fn multiplicities_over_f7() {
    let field = Zp::new(7);
    // (x+1)^3 (x+2)
    let f = &poly(&field, &[1, 1]).pow(3) * &poly(&field, &[2, 1]);

    let mut rng = StdRng::seed_from_u64(12);
    let (factors, lcoeff) = f.factor(&mut rng);

    assert_eq!(reconstruct(&factors, &lcoeff, &f), f);

    let mut pows: Vec<_> = factors.iter().map(|(_, pow)| *pow).collect();
    pows.sort();
    assert_eq!(pows, vec![1, 3]);
    for (u, _) in &factors {
        assert_eq!(u.degree(), 1);
    }
}

#[test]
fn irreducible_over_f2() {
    use factorica::domains::finite_field::Z2;

    let f = UnivariatePolynomial::from_coefficients(
        &Z2,
        vec![1, 1, 1],
        Arc::new(Variable::new("x")),
    );

    let mut rng = StdRng::seed_from_u64(13);
    let (factors, lcoeff) = f.factor(&mut rng);

    assert_eq!(lcoeff, 1);
    assert_eq!(factors, vec![(f, 1)]);
}

#[test]
fn deflated_sextic_over_f7() {
    let field = Zp::new(7);
    // x^6 + 3x^3 + 2 = (y+1)(y+2) with y = x^3
    let f = poly(&field, &[2, 0, 0, 3, 0, 0, 1]);

    let mut rng = StdRng::seed_from_u64(14);
    let (factors, lcoeff) = f.factor(&mut rng);

    assert_eq!(reconstruct(&factors, &lcoeff, &f), f);

    // x^3 + 1 = (x+1)(x+2)(x+4) and x^3 + 2 is irreducible over GF(7)
    let mut degrees: Vec<_> = factors.iter().map(|(u, _)| u.degree()).collect();
    degrees.sort();
    assert_eq!(degrees, vec![1, 1, 1, 3]);

    for (u, pow) in &factors {
        assert_eq!(*pow, 1);
        assert_irreducible(u);
        assert!(f.divides(u).is_some());
    }
}

#[test]
fn reconstruction_with_leading_coefficient() {
    let field = Zp::new(13);
    // 6 (x+1) (x+2)^2 (x^2+5)^2
    let f = poly(&field, &[1, 1])
        * &(poly(&field, &[2, 1]).pow(2))
        * &(poly(&field, &[5, 0, 1]).pow(2))
        .mul_coeff(&field.nth(6));

    let mut rng = StdRng::seed_from_u64(15);
    let (factors, lcoeff) = f.factor(&mut rng);

    assert_eq!(field.from_element(&lcoeff), 6);
    assert_eq!(reconstruct(&factors, &lcoeff, &f), f);

    // degree additivity
    let total: usize = factors.iter().map(|(u, pow)| u.degree() * pow).sum();
    assert_eq!(total, f.degree());
}

#[test]
fn distinct_degree_buckets_are_coprime() {
    let field = Zp::new(5);
    // (x+1)(x+2) (x^2+2) (x^3+x+1), all irreducible pieces
    let f = &(&poly(&field, &[2, 3, 1]) * &poly(&field, &[2, 0, 1]))
        * &poly(&field, &[1, 1, 0, 1]);

    let buckets = f.distinct_degree_factorization();
    assert_eq!(
        buckets.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let mut product = f.one();
    for (i, (_, a)) in buckets.iter().enumerate() {
        assert!(f.divides(a).is_some());
        product = product * a;

        for (_, b) in &buckets[i + 1..] {
            assert!(a.gcd(b).is_one());
        }
    }
    assert_eq!(product, f);
}

#[test]
fn squarefree_decomposition_is_trivial_on_squarefree_input() {
    let field = Zp::new(13);
    let f = &poly(&field, &[1, 1]) * &poly(&field, &[5, 0, 1]);

    assert_eq!(f.square_free_factorization(), vec![(f.clone(), 1)]);
}

#[test]
fn roots_of_split_polynomial() {
    let field = Zp::new(10007);

    // (x - 10)(x - 20)(x - 30)(x - 40)(x - 50)
    let mut f = poly(&field, &[1]);
    for r in [10u64, 20, 30, 40, 50] {
        f = f * &poly(&field, &[10007 - r, 1]);
    }

    let mut rng = StdRng::seed_from_u64(16);
    let mut roots: Vec<_> = f
        .distinct_nonzero_roots(&mut rng)
        .unwrap()
        .iter()
        .map(|r| field.from_element(r))
        .collect();
    roots.sort();

    assert_eq!(roots, vec![10, 20, 30, 40, 50]);
    for r in roots {
        let v = f.evaluate(&field.to_element(r));
        assert!(Zp::is_zero(&v));
    }
}

#[test]
fn factor_over_64_bit_prime() {
    let field = Zp64::new(18446744073709551557);
    let f = &poly(&field, &[1, 1]) * &poly(&field, &[2, 1]);

    let mut rng = StdRng::seed_from_u64(17);
    let (mut factors, lcoeff) = f.factor(&mut rng);

    assert!(field.is_one(&lcoeff));
    factors.sort_by_key(|(u, _)| field.from_element(&u.get_constant()));
    assert_eq!(
        factors,
        vec![(poly(&field, &[1, 1]), 1), (poly(&field, &[2, 1]), 1)]
    );
}

#[test]
fn factor_over_large_modulus() {
    // 2^127 - 1 is prime
    let p = (Integer::from(1) << 127u32) - 1u32;
    let field = FiniteField::<Integer>::new(p.clone());

    let x = Arc::new(Variable::new("x"));
    // x^2 - 1
    let f = UnivariatePolynomial::from_coefficients(
        &field,
        vec![p.clone() - 1u32, Integer::new(), Integer::from(1)],
        x,
    );

    let mut rng = StdRng::seed_from_u64(18);
    let (factors, lcoeff) = f.factor(&mut rng);

    assert!(field.is_one(&lcoeff));
    assert_eq!(reconstruct(&factors, &lcoeff, &f), f);
    assert_eq!(factors.len(), 2);
    for (u, pow) in &factors {
        assert_eq!(*pow, 1);
        assert_eq!(u.degree(), 1);
    }
}
