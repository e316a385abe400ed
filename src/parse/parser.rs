//! Shift-reduce parser turning clue text into expression trees
//!
//! The parser owns a vocabulary of parse-strings, each naming one variable.
//! Clue text is read left to right by a small state machine that keeps an
//! explicit stack of partial results. Binary operators fold pairwise from the
//! left as soon as their right operand is complete, so `A + B * C` reads as
//! `((A + B) * C)`; grouping symbols override that order.

use super::ParseError;
use crate::logic::expression::{Operator, NOT_SYMBOL};
use crate::logic::Expression;
use std::collections::HashMap;
use std::fmt;

/// Kinds of grouping symbol. Each kind only closes its own opening symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Paren,
    Bracket,
    Brace,
}

impl GroupKind {
    fn opened_by(ch: char) -> Option<Self> {
        match ch {
            '(' => Some(GroupKind::Paren),
            '[' => Some(GroupKind::Bracket),
            '{' => Some(GroupKind::Brace),
            _ => None,
        }
    }

    fn closed_by(ch: char) -> Option<Self> {
        match ch {
            ')' => Some(GroupKind::Paren),
            ']' => Some(GroupKind::Bracket),
            '}' => Some(GroupKind::Brace),
            _ => None,
        }
    }
}

/// True for characters that can never appear inside a parse-string
pub fn is_reserved(ch: char) -> bool {
    ch.is_whitespace()
        || ch == NOT_SYMBOL
        || Operator::from_symbol(ch).is_some()
        || GroupKind::opened_by(ch).is_some()
        || GroupKind::closed_by(ch).is_some()
}

/// Vocabulary of parse-strings plus the clue-text parser built on it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parser {
    vocabulary: HashMap<String, usize>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parser where the `i`th token names variable `i`
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parser = Self::new();
        for (index, token) in tokens.into_iter().enumerate() {
            parser.add_parse_string(token, index)?;
        }
        Ok(parser)
    }

    /// Register `token` as the name of variable `index`
    ///
    /// Registering a token that is already present replaces its index.
    pub fn add_parse_string(&mut self, token: impl Into<String>, index: usize) -> Result<(), ParseError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ParseError::EmptyParseString);
        }
        if token.chars().any(is_reserved) {
            return Err(ParseError::ReservedCharacter(token));
        }

        if let Some(previous) = self.vocabulary.insert(token.clone(), index) {
            if previous != index {
                log::debug!("Parse-string '{}' moved from {} to {}", token, previous, index);
            }
        }
        Ok(())
    }

    pub fn remove_parse_string(&mut self, token: &str) -> Result<(), ParseError> {
        self.vocabulary
            .remove(token)
            .map(|_| ())
            .ok_or_else(|| ParseError::UnknownParseString(token.to_string()))
    }

    pub fn is_parse_string(&self, token: &str) -> bool {
        self.vocabulary.contains_key(token)
    }

    /// Variable index registered for `token`
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Every (index, token) entry, sorted by index then token
    pub fn entries(&self) -> Vec<(usize, &str)> {
        let mut entries: Vec<_> = self
            .vocabulary
            .iter()
            .map(|(token, &index)| (index, token.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }

    /// Parse clue text into an expression tree
    pub fn parse(&self, text: &str) -> Result<Expression, ParseError> {
        let mut machine = Machine::new(self);
        for ch in text.chars() {
            machine.feed(ch)?;
        }
        machine.finish()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        let Some(&(largest, _)) = entries.last() else {
            return writeln!(f, "There are no parse-strings set in this Parser");
        };

        let width = largest.to_string().len();
        for (index, token) in entries {
            writeln!(f, "{:>width$}: {}", index, token, width = width)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a term: a variable, an opening group, or a negation
    StartCommon,
    /// A group has just closed
    AfterClose,
    /// Reading the characters of a variable
    PreVariable,
    /// A variable has just ended
    PostVariable,
}

#[derive(Debug)]
enum StackToken {
    Expression(Expression),
    Operator(Operator),
    Negation,
    OpenGroup(GroupKind),
}

struct Machine<'p> {
    parser: &'p Parser,
    state: State,
    stack: Vec<StackToken>,
    variable: String,
}

impl<'p> Machine<'p> {
    fn new(parser: &'p Parser) -> Self {
        Self {
            parser,
            state: State::StartCommon,
            stack: Vec::new(),
            variable: String::new(),
        }
    }

    fn feed(&mut self, ch: char) -> Result<(), ParseError> {
        match self.state {
            State::StartCommon => self.expect_term(ch),
            State::PreVariable => self.read_variable(ch),
            State::AfterClose | State::PostVariable => self.expect_continuation(ch),
        }
    }

    fn expect_term(&mut self, ch: char) -> Result<(), ParseError> {
        if ch.is_whitespace() {
            return Ok(());
        }
        if let Some(kind) = GroupKind::opened_by(ch) {
            self.stack.push(StackToken::OpenGroup(kind));
            return Ok(());
        }
        if GroupKind::closed_by(ch).is_some() {
            return Err(ParseError::MisplacedGroup);
        }
        if Operator::from_symbol(ch).is_some() {
            return Err(ParseError::MisplacedOperator);
        }
        if ch == NOT_SYMBOL {
            self.stack.push(StackToken::Negation);
            return Ok(());
        }

        self.variable.push(ch);
        self.state = State::PreVariable;
        Ok(())
    }

    fn read_variable(&mut self, ch: char) -> Result<(), ParseError> {
        if !is_reserved(ch) {
            self.variable.push(ch);
            return Ok(());
        }

        self.end_variable()?;
        self.expect_continuation(ch)
    }

    fn expect_continuation(&mut self, ch: char) -> Result<(), ParseError> {
        if ch.is_whitespace() {
            return Ok(());
        }
        if GroupKind::opened_by(ch).is_some() {
            return Err(ParseError::MisplacedGroup);
        }
        if let Some(kind) = GroupKind::closed_by(ch) {
            self.close_group(kind)?;
            self.state = State::AfterClose;
            return Ok(());
        }
        if let Some(operator) = Operator::from_symbol(ch) {
            self.stack.push(StackToken::Operator(operator));
            self.state = State::StartCommon;
            return Ok(());
        }
        if ch == NOT_SYMBOL {
            return Err(ParseError::MisplacedNegation);
        }
        Err(ParseError::MisplacedVariable)
    }

    fn end_variable(&mut self) -> Result<(), ParseError> {
        let token = std::mem::take(&mut self.variable);
        let index = self
            .parser
            .index_of(&token)
            .ok_or_else(|| ParseError::UnrecognizedVariable(token.clone()))?;

        self.push_expression(Expression::literal(index, token))?;
        self.state = State::PostVariable;
        Ok(())
    }

    /// Fold a finished group back into a single expression
    fn close_group(&mut self, kind: GroupKind) -> Result<(), ParseError> {
        let inner = match self.stack.pop() {
            Some(StackToken::Expression(expression)) => expression,
            _ => return Err(ParseError::MisplacedGroup),
        };

        match self.stack.pop() {
            Some(StackToken::OpenGroup(open)) if open == kind => self.push_expression(inner),
            Some(StackToken::OpenGroup(_)) => Err(ParseError::MismatchedGroup),
            _ => Err(ParseError::MisplacedGroup),
        }
    }

    /// Resolve a completed term against the pending negations and operator
    fn push_expression(&mut self, mut expression: Expression) -> Result<(), ParseError> {
        while let Some(StackToken::Negation) = self.stack.last() {
            self.stack.pop();
            expression.negate();
        }

        if let Some(StackToken::Operator(operator)) = self.stack.last() {
            let operator = *operator;
            self.stack.pop();
            let left = match self.stack.pop() {
                Some(StackToken::Expression(left)) => left,
                _ => return Err(ParseError::MisplacedOperator),
            };
            return self.push_expression(Expression::clause(left, operator, expression));
        }

        self.stack.push(StackToken::Expression(expression));
        Ok(())
    }

    fn finish(mut self) -> Result<Expression, ParseError> {
        if self.state == State::PreVariable {
            self.end_variable()?;
        }

        match self.stack.pop() {
            Some(StackToken::Expression(expression)) if self.stack.is_empty() => Ok(expression),
            Some(StackToken::Expression(_)) => Err(ParseError::UnmatchedGroup),
            _ => Err(ParseError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Assignment;

    fn fruit_parser() -> Parser {
        Parser::from_tokens(["A", "B", "C", "D", "E", "Lemon"]).unwrap()
    }

    fn parsed(text: &str) -> String {
        fruit_parser().parse(text).unwrap().to_string()
    }

    #[test]
    fn test_single_variable() {
        assert_eq!(parsed("A"), "A");
        assert_eq!(parsed("  Lemon  "), "Lemon");
        assert_eq!(parsed("~Lemon"), "~Lemon");
    }

    #[test]
    fn test_left_to_right_fold() {
        assert_eq!(parsed("A + ~Lemon > ~B"), "((A + ~Lemon) > ~B)");
        assert_eq!(parsed("A*B*C"), "((A * B) * C)");
    }

    #[test]
    fn test_mixed_groups() {
        assert_eq!(parsed("({A * B} > [~C + D])"), "((A * B) > (~C + D))");
        assert_eq!(parsed("([([[{E ^ ~A}]])])"), "(E ^ ~A)");
    }

    #[test]
    fn test_stacked_negations() {
        assert_eq!(parsed("(~~~C)"), "~C");
        assert_eq!(parsed("(~~~~C)"), "C");
        assert_eq!(parsed("~(A * B)"), "(~A + ~B)");
    }

    #[test]
    fn test_excess_whitespace() {
        assert_eq!(
            parsed("   (  A   *\tB )  =   (  ~  C ^ D)   "),
            "((A * B) = (~C ^ D))"
        );
    }

    #[test]
    fn test_parse_produces_correct_variables() {
        let expression = fruit_parser().parse("Lemon > (A + D)").unwrap();
        assert_eq!(expression.max_variable(), 5);
        assert_eq!(expression.literal_count(), 3);

        let mut assignment = Assignment::new(6);
        assignment.set_true(5);
        assert!(!expression.evaluate(&assignment));
        assignment.set_true(3);
        assert!(expression.evaluate(&assignment));
    }

    #[test]
    fn test_group_errors() {
        let parser = fruit_parser();
        assert_eq!(parser.parse("((A * D) + E"), Err(ParseError::UnmatchedGroup));
        assert_eq!(parser.parse("[{B * E] + B)"), Err(ParseError::MismatchedGroup));
        assert_eq!(parser.parse("[(A + B){}]"), Err(ParseError::MisplacedGroup));
        assert_eq!(parser.parse("A)"), Err(ParseError::MisplacedGroup));
        assert_eq!(parser.parse(")A"), Err(ParseError::MisplacedGroup));
        assert_eq!(parser.parse("()"), Err(ParseError::MisplacedGroup));
    }

    #[test]
    fn test_operator_and_negation_errors() {
        let parser = fruit_parser();
        assert_eq!(parser.parse("* A"), Err(ParseError::MisplacedOperator));
        assert_eq!(parser.parse("A + * B"), Err(ParseError::MisplacedOperator));
        assert_eq!(parser.parse("A ~ B"), Err(ParseError::MisplacedNegation));
        assert_eq!(parser.parse("A B"), Err(ParseError::MisplacedVariable));
        assert_eq!(parser.parse("A % B"), Err(ParseError::MisplacedVariable));
    }

    #[test]
    fn test_unrecognized_variable() {
        let parser = fruit_parser();
        assert_eq!(
            parser.parse("~F"),
            Err(ParseError::UnrecognizedVariable("F".to_string()))
        );
        assert_eq!(
            parser.parse("A%"),
            Err(ParseError::UnrecognizedVariable("A%".to_string()))
        );
    }

    #[test]
    fn test_unexpected_end() {
        let parser = fruit_parser();
        assert_eq!(parser.parse(""), Err(ParseError::UnexpectedEnd));
        assert_eq!(parser.parse("   "), Err(ParseError::UnexpectedEnd));
        assert_eq!(parser.parse("A +"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parser.parse("~"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parser.parse("(("), Err(ParseError::UnexpectedEnd));
    }

    #[test]
    fn test_parse_leaves_vocabulary_alone() {
        let parser = fruit_parser();
        let before = parser.clone();
        let _ = parser.parse("[{B * E] + B)");
        let _ = parser.parse("A + B");
        assert_eq!(parser, before);
    }

    #[test]
    fn test_add_parse_string_validation() {
        let mut parser = Parser::new();
        assert_eq!(parser.add_parse_string("", 0), Err(ParseError::EmptyParseString));
        for bad in ["two words", "tab\there", "a+b", "x*", "(y", "z]", "{w", "~v", "p>q", "r^s", "t=u"] {
            assert_eq!(
                parser.add_parse_string(bad, 0),
                Err(ParseError::ReservedCharacter(bad.to_string())),
                "{}",
                bad
            );
        }
        assert!(parser.is_empty());

        assert!(parser.add_parse_string("Red/Norwegian", 3).is_ok());
        assert!(parser.is_parse_string("Red/Norwegian"));
        assert_eq!(parser.index_of("Red/Norwegian"), Some(3));
    }

    #[test]
    fn test_re_adding_overwrites() {
        let mut parser = Parser::new();
        parser.add_parse_string("Lime", 1).unwrap();
        parser.add_parse_string("Lime", 4).unwrap();
        assert_eq!(parser.len(), 1);
        assert_eq!(parser.parse("Lime").unwrap().max_variable(), 4);
    }

    #[test]
    fn test_remove_parse_string() {
        let mut parser = fruit_parser();
        assert!(parser.remove_parse_string("Lemon").is_ok());
        assert!(!parser.is_parse_string("Lemon"));
        assert_eq!(parser.len(), 5);
        assert_eq!(
            parser.remove_parse_string("Lemon"),
            Err(ParseError::UnknownParseString("Lemon".to_string()))
        );
        assert_eq!(
            parser.parse("Lemon"),
            Err(ParseError::UnrecognizedVariable("Lemon".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let mut parser = Parser::new();
        assert_eq!(
            parser.to_string(),
            "There are no parse-strings set in this Parser\n"
        );

        for (token, index) in [
            ("GrandCayman", 3),
            ("Aruba", 192),
            ("Trinidad", 15),
            ("Tasmania", 14),
            ("Oahu", 192),
            ("Curacao", 56),
            ("Greenland", 1),
        ] {
            parser.add_parse_string(token, index).unwrap();
        }

        assert_eq!(
            parser.to_string(),
            "  1: Greenland\n  3: GrandCayman\n 14: Tasmania\n 15: Trinidad\n 56: Curacao\n192: Aruba\n192: Oahu\n"
        );
    }

    #[test]
    fn test_from_tokens_rejects_reserved() {
        assert_eq!(
            Parser::from_tokens(["ok", "not ok"]),
            Err(ParseError::ReservedCharacter("not ok".to_string()))
        );
    }
}
