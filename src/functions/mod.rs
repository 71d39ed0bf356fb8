pub mod constants;
pub mod elementary;
mod registry;
pub mod trigonometric;

pub use registry::*;

/// Installs every built-in function into `registry`.
pub fn register_builtins(registry: &FunctionRegistry) {
    elementary::register(registry);
    trigonometric::register(registry);
}
