//! Recursive-descent parser for plural-forms selector expressions.
//!
//! Precedence, tightest first: primary, unary `!`, `* / %`, `+ -`,
//! `< <= > >=`, `== !=`, `&&`, `||`, and the right-associative ternary.
use super::ast::{Ast, BinaryOp};
use super::lexer::{tokenize, Token};
use crate::error::{Error, Result};

/// Parses selector expressions into [`Ast`] values.
///
/// The parser holds no state between calls; construct one wherever an
/// expression needs parsing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionParser;

impl ExpressionParser {
  pub fn new() -> Self {
    Self
  }

  /// Parses a complete expression. Trailing tokens are an error.
  ///
  /// ```
  /// use textdomain::{Ast, ExpressionParser};
  ///
  /// let ast = ExpressionParser::new().parse("n % 10 == 1").unwrap();
  /// assert_eq!(ast.evaluate(21).unwrap(), 1);
  /// assert_eq!(ast.evaluate(22).unwrap(), 0);
  /// ```
  pub fn parse(&self, input: &str) -> Result<Ast> {
    let tokens = tokenize(input)?;
    let mut cursor = Cursor { tokens: &tokens, position: 0 };
    let ast = cursor.ternary()?;
    match cursor.peek() {
      Some(token) => Err(Error::Parse(format!("unexpected token {token:?} after end of expression"))),
      None => Ok(ast),
    }
  }
}

struct Cursor<'a> {
  tokens: &'a [Token],
  position: usize,
}

impl Cursor<'_> {
  fn peek(&self) -> Option<Token> {
    self.tokens.get(self.position).copied()
  }

  fn bump(&mut self) -> Option<Token> {
    let token = self.peek();
    if token.is_some() {
      self.position += 1;
    }
    token
  }

  fn eat(&mut self, expected: Token) -> bool {
    if self.peek() == Some(expected) {
      self.position += 1;
      true
    } else {
      false
    }
  }

  fn expect(&mut self, expected: Token) -> Result<()> {
    match self.bump() {
      Some(token) if token == expected => Ok(()),
      Some(token) => Err(Error::Parse(format!("expected {expected:?}, found {token:?}"))),
      None => Err(Error::Parse(format!("expected {expected:?}, found end of expression"))),
    }
  }

  fn ternary(&mut self) -> Result<Ast> {
    let cond = self.logical_or()?;
    if !self.eat(Token::Question) {
      return Ok(cond);
    }
    let then = self.ternary()?;
    self.expect(Token::Colon)?;
    let otherwise = self.ternary()?;
    Ok(Ast::Ternary { cond: Box::new(cond), then: Box::new(then), otherwise: Box::new(otherwise) })
  }

  fn logical_or(&mut self) -> Result<Ast> {
    let mut lhs = self.logical_and()?;
    while self.eat(Token::Or) {
      lhs = Ast::binary(BinaryOp::Or, lhs, self.logical_and()?);
    }
    Ok(lhs)
  }

  fn logical_and(&mut self) -> Result<Ast> {
    let mut lhs = self.equality()?;
    while self.eat(Token::And) {
      lhs = Ast::binary(BinaryOp::And, lhs, self.equality()?);
    }
    Ok(lhs)
  }

  fn equality(&mut self) -> Result<Ast> {
    let mut lhs = self.relational()?;
    loop {
      let op = match self.peek() {
        Some(Token::Eq) => BinaryOp::Eq,
        Some(Token::Ne) => BinaryOp::Ne,
        _ => return Ok(lhs),
      };
      self.position += 1;
      lhs = Ast::binary(op, lhs, self.relational()?);
    }
  }

  fn relational(&mut self) -> Result<Ast> {
    let mut lhs = self.additive()?;
    loop {
      let op = match self.peek() {
        Some(Token::Lt) => BinaryOp::Lt,
        Some(Token::Le) => BinaryOp::Le,
        Some(Token::Gt) => BinaryOp::Gt,
        Some(Token::Ge) => BinaryOp::Ge,
        _ => return Ok(lhs),
      };
      self.position += 1;
      lhs = Ast::binary(op, lhs, self.additive()?);
    }
  }

  fn additive(&mut self) -> Result<Ast> {
    let mut lhs = self.multiplicative()?;
    loop {
      let op = match self.peek() {
        Some(Token::Plus) => BinaryOp::Add,
        Some(Token::Minus) => BinaryOp::Sub,
        _ => return Ok(lhs),
      };
      self.position += 1;
      lhs = Ast::binary(op, lhs, self.multiplicative()?);
    }
  }

  fn multiplicative(&mut self) -> Result<Ast> {
    let mut lhs = self.unary()?;
    loop {
      let op = match self.peek() {
        Some(Token::Mul) => BinaryOp::Mul,
        Some(Token::Div) => BinaryOp::Div,
        Some(Token::Mod) => BinaryOp::Mod,
        _ => return Ok(lhs),
      };
      self.position += 1;
      lhs = Ast::binary(op, lhs, self.unary()?);
    }
  }

  fn unary(&mut self) -> Result<Ast> {
    if self.eat(Token::Not) {
      Ok(Ast::Not(Box::new(self.unary()?)))
    } else {
      self.primary()
    }
  }

  fn primary(&mut self) -> Result<Ast> {
    match self.bump() {
      Some(Token::Number(value)) => Ok(Ast::Number(value)),
      Some(Token::N) => Ok(Ast::N),
      Some(Token::LeftParen) => {
        let inner = self.ternary()?;
        self.expect(Token::RightParen)?;
        Ok(inner)
      },
      Some(token) => Err(Error::Parse(format!("unexpected token {token:?} in expression"))),
      None => Err(Error::Parse("expression ended unexpectedly".to_string())),
    }
  }
}
