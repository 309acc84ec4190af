//! Factorica is a library for computational algebra over finite fields.
//!
//! Its core is the factorization of univariate polynomials into irreducible
//! factors with multiplicities: square-free decomposition, distinct-degree
//! splitting, probabilistic equal-degree splitting (Cantor-Zassenhaus and a
//! characteristic-2 trace variant), a deflation preprocessing step and an
//! explicit-stack root finder.
//!
//! All algorithms are generic over a field object, see [Ring](domains::Ring)
//! and its extensions. Provided coefficient domains are the Montgomery prime
//! fields [Zp](domains::finite_field::Zp) and
//! [Zp64](domains::finite_field::Zp64), the prime-2 field
//! [Z2](type@domains::finite_field::Z2), and arbitrary-precision moduli
//! through `FiniteField<rug::Integer>`.
//!
//! For example:
//!
//! ```
//! use factorica::domains::finite_field::{FiniteFieldCore, Zp};
//! use factorica::domains::Ring;
//! use factorica::poly::factor::Factorize;
//! use factorica::poly::polynomial::UnivariatePolynomial;
//! use factorica::poly::Variable;
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::sync::Arc;
//!
//! let field = Zp::new(5);
//! let x = Arc::new(Variable::new("x"));
//!
//! // x^4 + 1
//! let f = UnivariatePolynomial::from_coefficients(
//!     &field,
//!     vec![
//!         field.one(),
//!         field.zero(),
//!         field.zero(),
//!         field.zero(),
//!         field.one(),
//!     ],
//!     x,
//! );
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let (factors, _lcoeff) = f.factor(&mut rng);
//! assert_eq!(factors.len(), 2);
//! ```
//!
//! Randomness always flows through an explicitly passed [rand::RngCore], so
//! every probabilistic routine is reproducible with a seeded generator.

pub mod domains;
pub mod poly;
