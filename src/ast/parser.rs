use crate::ast::{CompileError, Node, Operator, MAX_NESTING_DEPTH};
use crate::functions::{constants, FunctionRegistry};
use log::{debug, trace};
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "ast/expression.pest"]
pub struct ExpressionParser;

impl Rule {
    /// Rules that begin an operand. A parse failure that only expected these means an
    /// operator was left without an operand.
    fn starts_operand(&self) -> bool {
        matches!(
            self,
            Rule::sum
                | Rule::product
                | Rule::negation
                | Rule::power
                | Rule::exponent
                | Rule::neg
                | Rule::group
                | Rule::call
                | Rule::callee
                | Rule::argument
                | Rule::scientific
                | Rule::number
                | Rule::identifier
        )
    }
}

impl ExpressionParser {
    /// Parses `input` into an expression tree, resolving function calls against `registry`.
    pub fn parse_expression(input: &str, registry: &FunctionRegistry) -> Result<Node, CompileError> {
        debug!("Parsing expression: {}", input);
        let mut pairs = ExpressionParser::parse(Rule::expression, input).map_err(classify_error)?;
        let expression = next_pair(&mut pairs, 0)?;
        let sum = next_pair(&mut expression.into_inner(), 0)?;

        let root = TreeBuilder { registry }.build_node(sum, 0)?;
        trace!("Expression tree: {:#?}", root);
        Ok(root)
    }

    /// Whether `text` can be used as a function name in call syntax.
    pub fn is_identifier(text: &str) -> bool {
        ExpressionParser::parse(Rule::function_name, text).is_ok()
    }
}

struct TreeBuilder<'r> {
    registry: &'r FunctionRegistry,
}

impl TreeBuilder<'_> {
    /// `depth` counts the groups, calls and negations enclosing `pair`.
    fn build_node(&self, pair: Pair<'_, Rule>, depth: usize) -> Result<Node, CompileError> {
        match pair.as_rule() {
            Rule::sum | Rule::product | Rule::power => self.build_binary_chain(pair, depth),
            Rule::negation | Rule::exponent => self.build_negation(pair, depth),
            Rule::group => {
                let position = pair.as_span().start();
                check_depth(depth + 1, position)?;
                self.build_node(next_pair(&mut pair.into_inner(), position)?, depth + 1)
            }
            Rule::call => self.build_call(pair, depth + 1),
            Rule::number => build_number(pair),
            Rule::scientific => Err(CompileError::ScientificNotation {
                literal: pair.as_str().to_string(),
            }),
            Rule::identifier => build_identifier(pair),
            rule => Err(CompileError::Syntax {
                position: pair.as_span().start(),
                message: format!("Unexpected rule: {:?}", rule),
            }),
        }
    }

    /// Folds `operand (operator operand)*` to the left.
    fn build_binary_chain(&self, pair: Pair<'_, Rule>, depth: usize) -> Result<Node, CompileError> {
        let position = pair.as_span().start();
        let mut pairs = pair.into_inner();
        let mut node = self.build_node(next_pair(&mut pairs, position)?, depth)?;

        while let Some(operator_pair) = pairs.next() {
            let span = operator_pair.as_span();
            let operator =
                Operator::try_from(operator_pair.as_str()).map_err(|message| CompileError::Syntax {
                    position: span.start(),
                    message,
                })?;

            let right = self.build_node(next_pair(&mut pairs, span.end())?, depth)?;
            node = Node::binary(node, operator, right);
        }

        Ok(node)
    }

    fn build_negation(&self, pair: Pair<'_, Rule>, depth: usize) -> Result<Node, CompileError> {
        let position = pair.as_span().start();
        let mut negations = 0;
        let mut operand = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::neg => {
                    negations += 1;
                    check_depth(depth + negations, inner.as_span().start())?;
                }
                _ => operand = Some(self.build_node(inner, depth + negations)?),
            }
        }

        let mut node = operand.ok_or(CompileError::MissingOperand { position })?;
        for _ in 0..negations {
            node = Node::negation(node);
        }
        Ok(node)
    }

    /// `depth` already includes the call itself.
    fn build_call(&self, pair: Pair<'_, Rule>, depth: usize) -> Result<Node, CompileError> {
        let position = pair.as_span().start();
        check_depth(depth, position)?;
        let mut pairs = pair.into_inner();
        let callee = next_pair(&mut pairs, position)?;
        let name = callee.as_str().trim_end_matches('(');

        let function = self
            .registry
            .lookup(name)
            .ok_or_else(|| CompileError::UnknownFunction {
                name: name.to_string(),
            })?;

        let arguments: Vec<Pair<'_, Rule>> = pairs.collect();
        if arguments.len() != function.arity() {
            return Err(CompileError::ArityMismatch {
                name: name.to_string(),
                expected: function.arity(),
                received: arguments.len(),
            });
        }

        let args = arguments
            .into_iter()
            .enumerate()
            .map(|(index, argument)| match argument.into_inner().next() {
                Some(sum) => self.build_node(sum, depth),
                None => Err(CompileError::EmptyArgument {
                    name: name.to_string(),
                    index,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node::Function { function, args })
    }
}

fn check_depth(depth: usize, position: usize) -> Result<(), CompileError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CompileError::NestingTooDeep {
            position,
            limit: MAX_NESTING_DEPTH,
        });
    }
    Ok(())
}

fn build_number(pair: Pair<'_, Rule>) -> Result<Node, CompileError> {
    pair.as_str()
        .parse::<f64>()
        .map(Node::Constant)
        .map_err(|_| CompileError::Malformed {
            fragment: pair.as_str().to_string(),
        })
}

/// Named constants win over variables; anything else is malformed.
fn build_identifier(pair: Pair<'_, Rule>) -> Result<Node, CompileError> {
    let text = pair.as_str();
    if let Some(value) = constants::lookup(text) {
        return Ok(Node::Constant(value));
    }
    if let Some(index) = parse_variable(text) {
        return Ok(Node::Variable(index));
    }
    Err(CompileError::Malformed {
        fragment: text.to_string(),
    })
}

/// `V` or `v` followed by an unsigned decimal index, e.g. `V0` or `v0012`.
fn parse_variable(text: &str) -> Option<usize> {
    let digits = text.strip_prefix(|c: char| c == 'V' || c == 'v')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, position: usize) -> Result<Pair<'i, Rule>, CompileError> {
    pairs.next().ok_or_else(|| CompileError::Syntax {
        position,
        message: "Incomplete parse tree".to_string(),
    })
}

fn classify_error(error: pest::error::Error<Rule>) -> CompileError {
    let position = match error.location {
        InputLocation::Pos(position) => position,
        InputLocation::Span((start, _)) => start,
    };

    if let ErrorVariant::ParsingError { positives, .. } = &error.variant {
        if !positives.is_empty() && positives.iter().all(Rule::starts_operand) {
            return CompileError::MissingOperand { position };
        }
    }

    CompileError::Syntax {
        position,
        message: error.variant.message().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn parse(input: &str) -> Result<Node, CompileError> {
        ExpressionParser::parse_expression(input, &FunctionRegistry::new())
    }

    fn number(value: f64) -> Node {
        Node::Constant(value)
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(parse("5").unwrap(), number(5.0));
        assert_eq!(parse("36").unwrap(), number(36.0));
        assert_eq!(parse("1.5").unwrap(), number(1.5));
        assert_eq!(parse(".5").unwrap(), number(0.5));
        assert_eq!(parse("2.").unwrap(), number(2.0));
    }

    #[test]
    fn test_same_precedence_chain_is_left_associative() {
        let ast = parse("6 * 1 / 2 * 3").unwrap();
        let expected_ast = Node::binary(
            Node::binary(
                Node::binary(number(6.0), Operator::Multiply, number(1.0)),
                Operator::Divide,
                number(2.0),
            ),
            Operator::Multiply,
            number(3.0),
        );
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_precedence_levels() {
        let ast = parse("1 - 2 * 3 ^ 2").unwrap();
        let expected_ast = Node::binary(
            number(1.0),
            Operator::Subtract,
            Node::binary(
                number(2.0),
                Operator::Multiply,
                Node::binary(number(3.0), Operator::Power, number(2.0)),
            ),
        );
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_power_chain_is_left_associative() {
        let ast = parse("2 ^ 3 ^ 2").unwrap();
        let expected_ast = Node::binary(
            Node::binary(number(2.0), Operator::Power, number(3.0)),
            Operator::Power,
            number(2.0),
        );
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_negation_runs() {
        assert_eq!(
            parse("5--5").unwrap(),
            Node::binary(number(5.0), Operator::Subtract, Node::negation(number(5.0)))
        );
        assert_eq!(
            parse("-5--5").unwrap(),
            Node::binary(
                Node::negation(number(5.0)),
                Operator::Subtract,
                Node::negation(number(5.0))
            )
        );
        assert_eq!(
            parse("- - 5").unwrap(),
            Node::negation(Node::negation(number(5.0)))
        );
        assert_eq!(
            parse("5 + -5").unwrap(),
            Node::binary(number(5.0), Operator::Add, Node::negation(number(5.0)))
        );
    }

    #[test]
    fn test_negation_applies_after_power() {
        assert_eq!(
            parse("-2^2").unwrap(),
            Node::negation(Node::binary(number(2.0), Operator::Power, number(2.0)))
        );
        assert_eq!(
            parse("2^-1").unwrap(),
            Node::binary(number(2.0), Operator::Power, Node::negation(number(1.0)))
        );
    }

    #[test]
    fn test_redundant_parentheses_are_transparent() {
        let plain = parse("(0 - 1) / (V0 + V1)").unwrap();
        assert_eq!(parse("((0 - 1)) / (V0 + V1)").unwrap(), plain);
        assert_eq!(parse("( ( (0 - 1) ) / ((V0 + V1)) )").unwrap(), plain);
    }

    #[test]
    fn test_variables() {
        assert_eq!(parse("V0").unwrap(), Node::Variable(0));
        assert_eq!(parse("v3").unwrap(), Node::Variable(3));
        assert_eq!(parse("V0001").unwrap(), Node::Variable(1));
    }

    #[test]
    fn test_named_constants() {
        assert_eq!(parse("pi").unwrap(), number(PI));
        assert_eq!(parse("e").unwrap(), number(std::f64::consts::E));
        assert!(matches!(parse("phi").unwrap(), Node::Constant(value) if (value - 1.618033988749895).abs() < 1e-15));
    }

    #[test]
    fn test_function_call() {
        let registry = FunctionRegistry::new();
        let ast = ExpressionParser::parse_expression("atan2(-1, V0)", &registry).unwrap();
        let expected_ast = Node::Function {
            function: registry.lookup("atan2").unwrap(),
            args: vec![Node::negation(number(1.0)), Node::Variable(0)],
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_nested_function_calls() {
        let registry = FunctionRegistry::new();
        let ast = ExpressionParser::parse_expression("abs(sqrt(4) - 3)", &registry).unwrap();
        let expected_ast = Node::Function {
            function: registry.lookup("abs").unwrap(),
            args: vec![Node::binary(
                Node::Function {
                    function: registry.lookup("sqrt").unwrap(),
                    args: vec![number(4.0)],
                },
                Operator::Subtract,
                number(3.0),
            )],
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_function_name_must_touch_parenthesis() {
        assert!(parse("sqrt (4)").is_err());
    }

    #[test]
    fn test_scientific_notation_is_rejected() {
        assert_eq!(
            parse("1e5"),
            Err(CompileError::ScientificNotation {
                literal: "1e5".to_string()
            })
        );
        assert!(matches!(
            parse("2 * 2.5E-3"),
            Err(CompileError::ScientificNotation { .. })
        ));
    }

    #[test]
    fn test_malformed_leaf() {
        assert_eq!(
            parse("abc"),
            Err(CompileError::Malformed {
                fragment: "abc".to_string()
            })
        );
        assert_eq!(
            parse("A0 / 1"),
            Err(CompileError::Malformed {
                fragment: "A0".to_string()
            })
        );
        assert!(matches!(parse("sqrt"), Err(CompileError::Malformed { .. })));
        assert!(matches!(parse("V"), Err(CompileError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            parse("foo(1)"),
            Err(CompileError::UnknownFunction {
                name: "foo".to_string()
            })
        );
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            parse("sqrt(1, 2)"),
            Err(CompileError::ArityMismatch {
                name: "sqrt".to_string(),
                expected: 1,
                received: 2
            })
        );
        assert!(matches!(
            parse("atan2(1)"),
            Err(CompileError::ArityMismatch { expected: 2, received: 1, .. })
        ));
    }

    #[test]
    fn test_empty_argument() {
        assert_eq!(
            parse("atan2(1, )"),
            Err(CompileError::EmptyArgument {
                name: "atan2".to_string(),
                index: 1
            })
        );
        assert!(matches!(
            parse("sqrt()"),
            Err(CompileError::EmptyArgument { index: 0, .. })
        ));
    }

    #[test]
    fn test_operator_without_operand() {
        assert_eq!(parse("5*"), Err(CompileError::MissingOperand { position: 2 }));
        assert_eq!(parse("/4"), Err(CompileError::MissingOperand { position: 0 }));
        assert!(matches!(parse("5 - *3"), Err(CompileError::MissingOperand { .. })));
        assert!(matches!(parse("5--5-"), Err(CompileError::MissingOperand { .. })));
    }

    #[test]
    fn test_invalid_syntax() {
        assert!(matches!(parse("5 3"), Err(CompileError::Syntax { .. })));
        assert!(parse("1, 2").is_err());
        assert!(parse("5 -+ 5").is_err());
    }

    #[test]
    fn test_nesting_depth_counts_groups_calls_and_negations() {
        let at_limit = format!(
            "{}V0{}",
            "abs(-".repeat(MAX_NESTING_DEPTH / 2),
            ")".repeat(MAX_NESTING_DEPTH / 2)
        );
        assert!(parse(&at_limit).is_ok());

        let past_limit = format!("-{}", at_limit);
        assert_eq!(
            parse(&past_limit),
            Err(CompileError::NestingTooDeep {
                position: 5 * (MAX_NESTING_DEPTH / 2),
                limit: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn test_long_operator_chains_are_not_nesting() {
        let sum = vec!["-1"; 4 * MAX_NESTING_DEPTH].join(" + ");
        assert!(parse(&sum).is_ok());
    }

    #[test]
    fn test_is_identifier() {
        assert!(ExpressionParser::is_identifier("cube"));
        assert!(ExpressionParser::is_identifier("_lerp3"));
        assert!(!ExpressionParser::is_identifier("3d"));
        assert!(!ExpressionParser::is_identifier("my func"));
        assert!(!ExpressionParser::is_identifier(" pad"));
        assert!(!ExpressionParser::is_identifier(""));
    }
}
