//! Boolean expression trees over puzzle variables

use super::Assignment;
use std::fmt;

pub const NOT_SYMBOL: char = '~';
pub const AND_SYMBOL: char = '*';
pub const OR_SYMBOL: char = '+';
pub const IMPLIES_SYMBOL: char = '>';
pub const XOR_SYMBOL: char = '^';
pub const IFF_SYMBOL: char = '=';

/// Binary boolean operators joining the two sides of a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Implies,
    Xor,
    Iff,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::And,
        Operator::Or,
        Operator::Implies,
        Operator::Xor,
        Operator::Iff,
    ];

    /// The single character used for this operator in clue text
    pub fn symbol(self) -> char {
        match self {
            Operator::And => AND_SYMBOL,
            Operator::Or => OR_SYMBOL,
            Operator::Implies => IMPLIES_SYMBOL,
            Operator::Xor => XOR_SYMBOL,
            Operator::Iff => IFF_SYMBOL,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single, possibly negated, variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub variable: usize,
    pub name: String,
    pub negated: bool,
}

/// Two expressions joined by an operator, possibly negated as a whole
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub operator: Operator,
    pub negated: bool,
}

/// A boolean expression: either a literal or a clause of two sub-expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(Literal),
    Clause(Clause),
}

impl Expression {
    /// Create an unnegated literal for `variable`, printed as `name`
    pub fn literal(variable: usize, name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "literal names must be non-empty");
        Expression::Literal(Literal {
            variable,
            name,
            negated: false,
        })
    }

    /// Create an unnegated clause `(left operator right)`
    pub fn clause(left: Expression, operator: Operator, right: Expression) -> Self {
        Expression::Clause(Clause {
            left: Box::new(left),
            right: Box::new(right),
            operator,
            negated: false,
        })
    }

    /// Builder form of [`Expression::negate`]
    pub fn negated(mut self) -> Self {
        self.negate();
        self
    }

    /// Toggle the negation flag of this node; children are left alone
    pub fn negate(&mut self) {
        match self {
            Expression::Literal(literal) => literal.negated = !literal.negated,
            Expression::Clause(clause) => clause.negated = !clause.negated,
        }
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Expression::Literal(literal) => literal.negated,
            Expression::Clause(clause) => clause.negated,
        }
    }

    /// Evaluate against an assignment covering every referenced variable
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        match self {
            Expression::Literal(literal) => assignment.get(literal.variable) != literal.negated,
            Expression::Clause(clause) => clause.evaluate(assignment),
        }
    }

    /// Largest variable index referenced anywhere in the tree
    pub fn max_variable(&self) -> usize {
        match self {
            Expression::Literal(literal) => literal.variable,
            Expression::Clause(clause) => {
                clause.left.max_variable().max(clause.right.max_variable())
            }
        }
    }

    /// Number of literals in the tree
    pub fn literal_count(&self) -> usize {
        match self {
            Expression::Literal(_) => 1,
            Expression::Clause(clause) => clause.left.literal_count() + clause.right.literal_count(),
        }
    }

    /// Write this node as if its negation flag were flipped when `toggle` is set
    fn render(&self, f: &mut fmt::Formatter<'_>, toggle: bool) -> fmt::Result {
        match self {
            Expression::Literal(literal) => {
                if literal.negated != toggle {
                    write!(f, "{}", NOT_SYMBOL)?;
                }
                write!(f, "{}", literal.name)
            }
            Expression::Clause(clause) => clause.render(f, clause.negated != toggle),
        }
    }
}

impl Clause {
    fn evaluate(&self, assignment: &Assignment) -> bool {
        match self.operator {
            Operator::And => {
                if !self.left.evaluate(assignment) {
                    return self.negated;
                }
                self.right.evaluate(assignment) != self.negated
            }
            Operator::Or => {
                if self.left.evaluate(assignment) {
                    return !self.negated;
                }
                self.right.evaluate(assignment) != self.negated
            }
            Operator::Implies => {
                if !self.left.evaluate(assignment) {
                    return !self.negated;
                }
                self.right.evaluate(assignment) != self.negated
            }
            Operator::Xor => {
                let left = self.left.evaluate(assignment);
                let right = self.right.evaluate(assignment);
                (left != right) != self.negated
            }
            Operator::Iff => {
                let left = self.left.evaluate(assignment);
                let right = self.right.evaluate(assignment);
                (left == right) != self.negated
            }
        }
    }

    /// Negated clauses push their negation into the children (De Morgan), except
    /// Iff, which keeps a leading negation around the plain rendering.
    fn render(&self, f: &mut fmt::Formatter<'_>, negated: bool) -> fmt::Result {
        write!(f, "(")?;
        if !negated {
            self.render_pair(f, self.operator, false, false)?;
            return write!(f, ")");
        }

        match self.operator {
            Operator::And => self.render_pair(f, Operator::Or, true, true)?,
            Operator::Or => self.render_pair(f, Operator::And, true, true)?,
            Operator::Implies => self.render_pair(f, Operator::And, false, true)?,
            Operator::Xor => {
                write!(f, "(")?;
                self.render_pair(f, Operator::And, false, false)?;
                write!(f, ") {} (", OR_SYMBOL)?;
                self.render_pair(f, Operator::And, true, true)?;
                write!(f, ")")?;
            }
            Operator::Iff => {
                write!(f, "{}(", NOT_SYMBOL)?;
                self.render_pair(f, Operator::Iff, false, false)?;
                write!(f, ")")?;
            }
        }
        write!(f, ")")
    }

    fn render_pair(
        &self,
        f: &mut fmt::Formatter<'_>,
        operator: Operator,
        toggle_left: bool,
        toggle_right: bool,
    ) -> fmt::Result {
        self.left.render(f, toggle_left)?;
        write!(f, " {} ", operator.symbol())?;
        self.right.render(f, toggle_right)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}
