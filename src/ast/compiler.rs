use crate::ast::{CompileError, Node, Parser, RegistryError};
use crate::functions::FunctionRegistry;
use std::fmt;
use std::sync::Arc;

/// Deepest nesting of parentheses, function calls and unary negations `compile` accepts.
///
/// Building and evaluating a tree recurses once per level, so the limit keeps a compile on a
/// 2 MiB thread stack (the default for spawned threads and rayon workers) well clear of overflow.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Compiles expression text into trees that can be evaluated any number of times.
///
/// Function calls are resolved against the shared registry at compile time.
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: Arc<FunctionRegistry>,
}

impl Compiler {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    /// Registers a function in the shared registry. It is visible to every later `compile`.
    pub fn register_function<F>(
        &self,
        name: &str,
        arity: usize,
        computation: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.registry.register(name, arity, computation)
    }

    /// Compiles `expression` into a tree.
    ///
    /// # Returns
    ///
    /// * `Ok(CompiledExpression)` holding the fully built tree.
    /// * `Err(CompileError)` if the text is empty, has unbalanced or too deeply nested
    ///   parentheses, or does not parse.
    pub fn compile(&self, expression: &str) -> Result<CompiledExpression, CompileError> {
        check_parentheses(expression)?;
        if is_blank(expression) {
            return Err(CompileError::Empty);
        }

        let root = Parser::parse_expression(expression, &self.registry)?;
        Ok(CompiledExpression {
            source: expression.to_string(),
            root,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Arc::new(FunctionRegistry::new()))
    }
}

/// Reports the first `(` nested deeper than `MAX_NESTING_DEPTH`, the first unmatched `)` or,
/// failing those, the innermost unmatched `(`.
fn check_parentheses(expression: &str) -> Result<(), CompileError> {
    let mut open = Vec::new();
    for (position, c) in expression.char_indices() {
        match c {
            '(' => {
                open.push(position);
                if open.len() > MAX_NESTING_DEPTH {
                    return Err(CompileError::NestingTooDeep {
                        position,
                        limit: MAX_NESTING_DEPTH,
                    });
                }
            }
            ')' => {
                if open.pop().is_none() {
                    return Err(CompileError::UnbalancedParentheses { position });
                }
            }
            _ => {}
        }
    }

    match open.pop() {
        Some(position) => Err(CompileError::UnbalancedParentheses { position }),
        None => Ok(()),
    }
}

/// Whether balanced `expression` holds nothing but whitespace inside redundant parentheses,
/// e.g. `""` or `"( ( ) )"`.
fn is_blank(expression: &str) -> bool {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    compact.trim_start_matches('(').chars().all(|c| c == ')')
}

/// An expression tree together with the text it was compiled from.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    root: Node,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Minimum number of variables `evaluate` must be given.
    pub fn variable_count(&self) -> usize {
        self.root.variable_count()
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
