use crate::functions::{Function, FunctionRegistry};
use arithfunc_macros::arith_fn;

pub fn register(registry: &FunctionRegistry) {
    registry.install(abs());
    registry.install(sqrt());
    registry.install(ln());
    registry.install(log10());
}

#[arith_fn]
fn abs(x: f64) -> f64 {
    x.abs()
}

#[arith_fn]
fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

/// Natural logarithm.
#[arith_fn]
fn ln(x: f64) -> f64 {
    x.ln()
}

/// Base-10 logarithm, exposed as `log`.
#[arith_fn(name = "log")]
fn log10(x: f64) -> f64 {
    x.log10()
}
