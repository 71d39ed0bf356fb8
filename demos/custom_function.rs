use arithfunc_rs::{arith_fn, Compiler, Function, FunctionRegistry};
use std::sync::Arc;

/// Linear interpolation between `a` and `b`.
#[arith_fn]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[arith_fn(name = "hypot")]
fn hypotenuse(x: f64, y: f64) -> f64 {
    x.hypot(y)
}

fn main() {
    pretty_env_logger::init();

    let registry = Arc::new(FunctionRegistry::new());
    registry.insert(lerp()).expect("valid function");
    registry.insert(hypotenuse()).expect("valid function");
    registry
        .register("clamp", 3, |args| args[0].max(args[1]).min(args[2]))
        .expect("valid function");

    let compiler = Compiler::new(Arc::clone(&registry));
    let compiled = compiler
        .compile("clamp(lerp(0, hypot(V0, V1), V2), 0, 4)")
        .expect("Failed to compile");

    for t in [0.0, 0.5, 1.0] {
        let variables = [3.0, 4.0, t];
        match compiled.evaluate(&variables) {
            Ok(result) => println!("t = {}: {}", t, result),
            Err(err) => println!("t = {}: error: {}", t, err),
        }
    }

    if let Err(err) = compiler.compile("lerp(1, 2)") {
        println!("Expected failure: {}", err);
    }
}
