use crate::ast::{CompiledExpression, EvalError, Node};
use rayon::prelude::*;

impl Node {
    /// Evaluates the subtree, reading `V#` leaves from `variables`.
    pub fn evaluate(&self, variables: &[f64]) -> Result<f64, EvalError> {
        match self {
            Node::Operator {
                left,
                operator,
                right,
            } => {
                let left_value = match left {
                    Some(left) => left.evaluate(variables)?,
                    None => 0.0,
                };
                let right_value = right.evaluate(variables)?;
                Ok(operator.apply(left_value, right_value))
            }

            Node::Function { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(variables))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(function.call(&values))
            }

            Node::Constant(value) => Ok(*value),

            Node::Variable(index) => {
                variables
                    .get(*index)
                    .copied()
                    .ok_or(EvalError::MissingVariable {
                        index: *index,
                        supplied: variables.len(),
                    })
            }
        }
    }
}

impl CompiledExpression {
    /// Evaluates the expression for one set of variables. The tree is never modified, so this
    /// can be called repeatedly and from several threads at once.
    pub fn evaluate(&self, variables: &[f64]) -> Result<f64, EvalError> {
        self.root().evaluate(variables)
    }

    /// Evaluates every row in parallel. Results are returned in row order and a failing row
    /// does not affect the others.
    pub fn evaluate_batch<V>(&self, rows: &[V]) -> Vec<Result<f64, EvalError>>
    where
        V: AsRef<[f64]> + Sync,
    {
        rows.par_iter()
            .map(|row| self.evaluate(row.as_ref()))
            .collect()
    }
}
