use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, OnceLock};

/// A regular expression over single characters.
///
/// Nodes never change after construction. Operands are shared through `Arc`,
/// so composing two expressions references them instead of copying, and a
/// whole tree can be handed to another thread.
pub enum Expression {
    Empty,                                              // Matches only the empty string
    Symbol(char),                                       // Single character literal
    Union(Arc<Expression>, Arc<Expression>),            // Either operand
    Concatenation(Arc<Expression>, Arc<Expression>),    // Left followed by right
    Iteration(Arc<Expression>),                         // Kleene star (zero or more)
}

impl Expression {
    pub fn get_kind_name(&self) -> &'static str {
        match self {
            Expression::Empty => "Empty",
            Expression::Symbol(_) => "Symbol",
            Expression::Union(_, _) => "Union",
            Expression::Concatenation(_, _) => "Concatenation",
            Expression::Iteration(_) => "Iteration",
        }
    }

    /// Number of nodes in the tree. Shared operands are counted once per reference.
    pub fn get_num_nodes(&self) -> usize {
        let mut num_nodes = 0;
        let mut stack: Vec<&Expression> = vec![self];
        while let Some(exp) = stack.pop() {
            num_nodes += 1;
            match exp {
                Expression::Empty | Expression::Symbol(_) => {}
                Expression::Union(l, r) | Expression::Concatenation(l, r) => {
                    stack.push(r);
                    stack.push(l);
                }
                Expression::Iteration(e) => stack.push(e),
            }
        }
        num_nodes
    }

    fn has_composite_operand(&self) -> bool {
        match self {
            Expression::Empty | Expression::Symbol(_) => false,
            Expression::Union(l, r) | Expression::Concatenation(l, r) => {
                l.is_composite() || r.is_composite()
            }
            Expression::Iteration(e) => e.is_composite(),
        }
    }

    fn is_composite(&self) -> bool {
        !matches!(self, Expression::Empty | Expression::Symbol(_))
    }

    // Moves the operands onto `stack`, leaving shared leaf placeholders behind.
    fn take_operands(&mut self, stack: &mut Vec<Arc<Expression>>) {
        match self {
            Expression::Empty | Expression::Symbol(_) => {}
            Expression::Union(l, r) | Expression::Concatenation(l, r) => {
                stack.push(std::mem::replace(l, placeholder()));
                stack.push(std::mem::replace(r, placeholder()));
            }
            Expression::Iteration(e) => stack.push(std::mem::replace(e, placeholder())),
        }
    }

    // Binding strength used by `Display`: union < concatenation < iteration < atom.
    fn precedence(&self) -> u8 {
        match self {
            Expression::Union(_, _) => 0,
            Expression::Concatenation(_, _) => 1,
            Expression::Iteration(_) => 2,
            Expression::Empty | Expression::Symbol(_) => 3,
        }
    }

    fn fmt_operand(&self, f: &mut Formatter<'_>, min_precedence: u8) -> std::fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn placeholder() -> Arc<Expression> {
    static PLACEHOLDER: OnceLock<Arc<Expression>> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Arc::new(Expression::Empty)).clone()
}

// Tears deep trees down iteratively. Operands still referenced elsewhere are
// only released, not descended into.
impl Drop for Expression {
    fn drop(&mut self) {
        if !self.has_composite_operand() {
            return;
        }
        let mut stack: Vec<Arc<Expression>> = Vec::new();
        self.take_operands(&mut stack);
        while let Some(operand) = stack.pop() {
            if let Some(mut exp) = Arc::into_inner(operand) {
                exp.take_operands(&mut stack);
            }
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Empty, Expression::Empty) => true,
            (Expression::Symbol(c1), Expression::Symbol(c2)) => c1 == c2,
            (Expression::Union(l1, r1), Expression::Union(l2, r2)) => l1 == l2 && r1 == r2,
            (Expression::Concatenation(l1, r1), Expression::Concatenation(l2, r2)) => {
                l1 == l2 && r1 == r2
            }
            (Expression::Iteration(e1), Expression::Iteration(e2)) => e1 == e2,
            _ => false,
        }
    }
}

impl Eq for Expression {}

impl Debug for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Empty => write!(f, "Empty"),
            Expression::Symbol(c) => write!(f, "Symbol({:?})", c),
            Expression::Union(l, r) => write!(f, "Union({:?}, {:?})", l, r),
            Expression::Concatenation(l, r) => write!(f, "Concatenation({:?}, {:?})", l, r),
            Expression::Iteration(e) => write!(f, "Iteration({:?})", e),
        }
    }
}

// Renders the conventional regex notation, e.g. `a(b|c)*`.
impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Empty => write!(f, "ε"),
            Expression::Symbol(c) => match c {
                '|' | '*' | '(' | ')' | '\\' | 'ε' => write!(f, "\\{}", c),
                _ => write!(f, "{}", c),
            },
            Expression::Union(l, r) => {
                l.fmt_operand(f, 0)?;
                write!(f, "|")?;
                r.fmt_operand(f, 1)
            }
            Expression::Concatenation(l, r) => {
                l.fmt_operand(f, 1)?;
                r.fmt_operand(f, 2)
            }
            Expression::Iteration(e) => {
                e.fmt_operand(f, 3)?;
                write!(f, "*")
            }
        }
    }
}
