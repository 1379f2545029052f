use crate::error_handling::Error::InvalidSymbol;
use crate::error_handling::Result;
use crate::parser::ast_node::ast_node::Expression;
use std::sync::Arc;

/// Fluent constructor for [`Expression`] trees.
///
/// Each combinator replaces the wrapped expression with a new node whose
/// operands are the previous expression and (for binary operators) the other
/// builder's expression. Cloning a builder shares its expression, so one
/// sub-expression can be reused in several places without copying.
///
/// ```
/// use thompson_nfa::parser::Builder;
///
/// let exp = Builder::symbol('a')
///     .concat(Builder::symbol('b').iterate())
///     .into_expression();
/// assert_eq!(exp.to_string(), "ab*");
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    expression: Arc<Expression>,
}

impl Builder {
    pub fn symbol(c: char) -> Builder {
        Self::from_expression(Arc::new(Expression::Symbol(c)))
    }

    /// Builds a symbol from text, which must hold exactly one character.
    pub fn try_symbol(s: &str) -> Result<Builder> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::symbol(c)),
            _ => Err(InvalidSymbol(s.to_string())),
        }
    }

    pub fn empty() -> Builder {
        Self::from_expression(Arc::new(Expression::Empty))
    }

    pub fn from_expression(expression: Arc<Expression>) -> Builder {
        Self { expression }
    }

    pub fn iterate(mut self) -> Builder {
        self.expression = Arc::new(Expression::Iteration(self.expression));
        self
    }

    pub fn union(mut self, other: Builder) -> Builder {
        self.expression = Arc::new(Expression::Union(self.expression, other.expression));
        self
    }

    pub fn concat(mut self, other: Builder) -> Builder {
        self.expression = Arc::new(Expression::Concatenation(
            self.expression,
            other.expression,
        ));
        self
    }

    pub fn expression(&self) -> &Arc<Expression> {
        &self.expression
    }

    pub fn into_expression(self) -> Arc<Expression> {
        self.expression
    }
}
