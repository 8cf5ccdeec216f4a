//! Recursive-descent parser producing the expression tree.

use super::MAX_DEPTH;
use super::builtins::Builtin;
use super::lexer::{Punct, Spanned, Token};
use super::value::Val;
use crate::error::ScriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Val),
    Source,
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(Builtin, Vec<Expr>),
}

impl Expr {
    /// Height of the tree, counting this node.
    pub fn depth(&self) -> usize {
        let below = match self {
            Self::Literal(_) | Self::Source => 0,
            Self::Unary(_, operand) | Self::Member(operand, _) => operand.depth(),
            Self::Binary(_, left, right)
            | Self::Logical(_, left, right)
            | Self::Index(left, right) => left.depth().max(right.depth()),
            Self::Conditional(cond, then, other) => {
                cond.depth().max(then.depth()).max(other.depth())
            }
            Self::Call(_, args) => args.iter().map(Expr::depth).max().unwrap_or(0),
        };
        below + 1
    }
}

/// Parse `[return] expression [;]`.
pub(crate) fn parse(tokens: &[Spanned], source_len: usize) -> Result<Expr, ScriptError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
        source_len,
    };
    if matches!(parser.peek(), Some(Token::Ident(name)) if name == "return") {
        parser.pos += 1;
    }
    let expr = parser.expression()?;
    parser.eat(Punct::Semicolon);
    if parser.pos < tokens.len() {
        return Err(parser.error("unexpected token after expression"));
    }
    Ok(expr)
}

struct Parser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    nesting: usize,
    source_len: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source_len, |spanned| spanned.offset)
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::Parse {
            offset: self.offset(),
            message: message.into(),
        }
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.peek() == Some(&Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct, what: &str) -> Result<(), ScriptError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    /// Guard recursive productions against unbounded nesting.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<T, ScriptError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(ScriptError::LimitExceeded {
                what: "nesting depth",
                limit: MAX_DEPTH,
            });
        }
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    fn expression(&mut self) -> Result<Expr, ScriptError> {
        self.nested(Self::conditional)
    }

    fn conditional(&mut self) -> Result<Expr, ScriptError> {
        let cond = self.logical_or()?;
        if !self.eat(Punct::Question) {
            return Ok(cond);
        }
        let then = self.expression()?;
        self.expect(Punct::Colon, "`:` in conditional")?;
        let other = self.expression()?;
        Ok(Expr::Conditional(Box::new(cond), Box::new(then), Box::new(other)))
    }

    fn logical_or(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.logical_and()?;
        while self.eat(Punct::OrOr) {
            let right = self.logical_and()?;
            left = Expr::Logical(LogicalOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.equality()?;
        while self.eat(Punct::AndAnd) {
            let right = self.equality()?;
            left = Expr::Logical(LogicalOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn binary_level(
        &mut self,
        operators: &[(Punct, BinaryOp)],
        operand: fn(&mut Self) -> Result<Expr, ScriptError>,
    ) -> Result<Expr, ScriptError> {
        let mut left = operand(self)?;
        'outer: loop {
            for &(punct, op) in operators {
                if self.eat(punct) {
                    let right = operand(self)?;
                    left = Expr::Binary(op, Box::new(left), Box::new(right));
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn equality(&mut self) -> Result<Expr, ScriptError> {
        self.binary_level(
            &[
                (Punct::StrictEq, BinaryOp::StrictEq),
                (Punct::StrictNe, BinaryOp::StrictNe),
                (Punct::LooseEq, BinaryOp::LooseEq),
                (Punct::LooseNe, BinaryOp::LooseNe),
            ],
            Self::relational,
        )
    }

    fn relational(&mut self) -> Result<Expr, ScriptError> {
        self.binary_level(
            &[
                (Punct::Lt, BinaryOp::Lt),
                (Punct::Le, BinaryOp::Le),
                (Punct::Gt, BinaryOp::Gt),
                (Punct::Ge, BinaryOp::Ge),
            ],
            Self::additive,
        )
    }

    fn additive(&mut self) -> Result<Expr, ScriptError> {
        self.binary_level(
            &[(Punct::Plus, BinaryOp::Add), (Punct::Minus, BinaryOp::Sub)],
            Self::multiplicative,
        )
    }

    fn multiplicative(&mut self) -> Result<Expr, ScriptError> {
        self.binary_level(
            &[
                (Punct::Star, BinaryOp::Mul),
                (Punct::Slash, BinaryOp::Div),
                (Punct::Percent, BinaryOp::Rem),
            ],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expr, ScriptError> {
        let op = if self.eat(Punct::Bang) {
            UnaryOp::Not
        } else if self.eat(Punct::Minus) {
            UnaryOp::Neg
        } else {
            return self.postfix();
        };
        let operand = self.nested(Self::unary)?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(Punct::Dot) {
                let name = self.identifier()?;
                if self.peek() == Some(&Token::Punct(Punct::LParen)) {
                    let builtin = lookup(&name)?;
                    let mut args = vec![expr];
                    args.extend(self.arguments()?);
                    builtin.check_arity(args.len())?;
                    expr = Expr::Call(builtin, args);
                } else {
                    expr = Expr::Member(Box::new(expr), name);
                }
            } else if self.eat(Punct::LBracket) {
                let index = self.expression()?;
                self.expect(Punct::RBracket, "`]`")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                return Ok(expr);
            }
        }
    }

    fn identifier(&mut self) -> Result<String, ScriptError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error("expected property or method name")),
        }
    }

    /// `( expr, ... )`
    fn arguments(&mut self) -> Result<Vec<Expr>, ScriptError> {
        self.expect(Punct::LParen, "`(`")?;
        let mut args = Vec::new();
        if self.eat(Punct::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(Punct::RParen) {
                return Ok(args);
            }
            self.expect(Punct::Comma, "`,` or `)` in argument list")?;
        }
    }

    fn primary(&mut self) -> Result<Expr, ScriptError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("expected expression"));
        };
        match token {
            Token::Number(value) => {
                self.pos += 1;
                Ok(Expr::Literal(Val::Num(value)))
            }
            Token::Str(text) => {
                self.pos += 1;
                Ok(Expr::Literal(Val::Str(text)))
            }
            Token::Ident(name) => {
                self.pos += 1;
                match name.as_str() {
                    "source" => Ok(Expr::Source),
                    "true" => Ok(Expr::Literal(Val::Bool(true))),
                    "false" => Ok(Expr::Literal(Val::Bool(false))),
                    "null" => Ok(Expr::Literal(Val::Null)),
                    "undefined" => Ok(Expr::Literal(Val::Undefined)),
                    _ if self.peek() == Some(&Token::Punct(Punct::LParen)) => {
                        let builtin = lookup(&name)?;
                        let args = self.arguments()?;
                        builtin.check_arity(args.len())?;
                        Ok(Expr::Call(builtin, args))
                    }
                    _ => Err(ScriptError::UnknownIdentifier(name)),
                }
            }
            Token::Punct(Punct::LParen) => {
                self.pos += 1;
                let inner = self.expression()?;
                self.expect(Punct::RParen, "`)`")?;
                Ok(inner)
            }
            Token::Punct(_) => Err(self.error("expected expression")),
        }
    }
}

fn lookup(name: &str) -> Result<Builtin, ScriptError> {
    Builtin::from_name(name).ok_or_else(|| ScriptError::UnknownFunction(name.to_string()))
}
