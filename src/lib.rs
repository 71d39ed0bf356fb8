//! Compiles infix arithmetic expressions such as `abs(-5 - V0) / V0 + V1^(1/2)` once and
//! evaluates them any number of times against positional variables `V0`, `V1`, ...
//!
//! ```
//! use arithfunc_rs::Compiler;
//!
//! let compiler = Compiler::default();
//! let compiled = compiler.compile("abs(-5 - V0) / V0 + V1^(1/2)").unwrap();
//! assert_eq!(compiled.evaluate(&[1.0, 4.0]).unwrap(), 8.0);
//! assert_eq!(compiled.evaluate(&[2.0, 9.0]).unwrap(), 6.5);
//! ```

pub mod ast;
pub mod functions;

pub use arithfunc_macros::arith_fn;
pub use ast::{
    CompileError, CompiledExpression, Compiler, Error, EvalError, Node, Operator, RegistryError,
    MAX_NESTING_DEPTH,
};
pub use functions::{Function, FunctionRegistry};

/// Compiles `expression` against the built-in functions and evaluates it once.
pub fn evaluate_expression(expression: &str, variables: &[f64]) -> Result<f64, Error> {
    let compiled = Compiler::default().compile(expression)?;
    Ok(compiled.evaluate(variables)?)
}
