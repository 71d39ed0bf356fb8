use crate::functions::Function;
use std::fmt;
use std::sync::Arc;

mod compiler;
mod error;
mod evaluator;
mod parser;

pub use compiler::*;
pub use error::*;
pub use parser::ExpressionParser as Parser;

/// A node of a compiled expression tree.
///
/// Trees are immutable once built and every child is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A binary operation. `left` is `None` only for unary negation, which evaluates as `0 - right`.
    Operator {
        left: Option<Box<Node>>,
        operator: Operator,
        right: Box<Node>,
    },
    /// A call to a function resolved at compile time. `args.len()` equals the function's arity.
    Function {
        function: Arc<Function>,
        args: Vec<Node>,
    },
    Constant(f64),
    /// Index into the variables supplied at evaluation time.
    Variable(usize),
}

impl Node {
    pub fn binary(left: Node, operator: Operator, right: Node) -> Node {
        Node::Operator {
            left: Some(Box::new(left)),
            operator,
            right: Box::new(right),
        }
    }

    pub fn negation(operand: Node) -> Node {
        Node::Operator {
            left: None,
            operator: Operator::Subtract,
            right: Box::new(operand),
        }
    }

    /// One more than the highest variable index referenced by this subtree, or 0 if there is none.
    pub fn variable_count(&self) -> usize {
        match self {
            Node::Operator { left, right, .. } => left
                .as_ref()
                .map_or(0, |left| left.variable_count())
                .max(right.variable_count()),
            Node::Function { args, .. } => args.iter().map(Node::variable_count).max().unwrap_or(0),
            Node::Constant(_) => 0,
            Node::Variable(index) => index + 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// Applies the operator with IEEE-754 semantics. Division by zero yields an infinity or NaN.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Power => '^',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Power),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}
