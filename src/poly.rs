//! Polynomial structures and algorithms.

pub mod factor;
pub mod polynomial;

use std::fmt::{Display, Formatter};

use smartstring::{LazyCompact, SmartString};

/// The variable a univariate polynomial is expressed in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    Named(SmartString<LazyCompact>),
    Temporary(usize),
}

impl Variable {
    pub fn new(name: &str) -> Variable {
        Variable::Named(name.into())
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::Named(n) => f.write_str(n),
            Variable::Temporary(t) => f.write_fmt(format_args!("_TMP_{}", *t)),
        }
    }
}
