use crate::functions::{Function, FunctionRegistry};
use arithfunc_macros::arith_fn;

pub fn register(registry: &FunctionRegistry) {
    registry.install(sin());
    registry.install(cos());
    registry.install(tan());
    registry.install(asin());
    registry.install(acos());
    registry.install(atan());
    registry.install(atan2());
}

#[arith_fn]
fn sin(x: f64) -> f64 {
    x.sin()
}

#[arith_fn]
fn cos(x: f64) -> f64 {
    x.cos()
}

#[arith_fn]
fn tan(x: f64) -> f64 {
    x.tan()
}

#[arith_fn]
fn asin(x: f64) -> f64 {
    x.asin()
}

#[arith_fn]
fn acos(x: f64) -> f64 {
    x.acos()
}

#[arith_fn]
fn atan(x: f64) -> f64 {
    x.atan()
}

/// Four-quadrant arctangent of `y / x`.
#[arith_fn]
fn atan2(y: f64, x: f64) -> f64 {
    y.atan2(x)
}
