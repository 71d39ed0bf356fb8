use thiserror::Error;

/// Errors raised while compiling an expression. Positions are byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Input expression is empty")]
    Empty,

    #[error("Unbalanced parenthesis at position {position}")]
    UnbalancedParentheses { position: usize },

    #[error("Expression nests deeper than {limit} levels at position {position}")]
    NestingTooDeep { position: usize, limit: usize },

    #[error("An operator is missing an operand at position {position}")]
    MissingOperand { position: usize },

    #[error(
        "Malformed expression near '{fragment}'. Only numbers, named constants, variables of the form V# and registered functions are allowed"
    )]
    Malformed { fragment: String },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{name}' expects {expected} argument(s) but received {received}")]
    ArityMismatch {
        name: String,
        expected: usize,
        received: usize,
    },

    #[error("Function '{name}' has an empty argument at index {index}")]
    EmptyArgument { name: String, index: usize },

    #[error("Scientific notation is not supported: '{literal}'. Rewrite it as a quotient, e.g. (1 / 100000)")]
    ScientificNotation { literal: String },

    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
}

/// Errors raised while evaluating a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Variable V{index} is required but only {supplied} value(s) were supplied")]
    MissingVariable { index: usize, supplied: usize },
}

/// Errors raised when registering a function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("'{name}' is not a valid function name")]
    InvalidName { name: String },

    #[error("Function '{name}' must take at least one argument")]
    ZeroArity { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
