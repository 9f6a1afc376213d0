//! Syntax tree for plural-forms selector expressions.
use crate::error::{Error, Result};

/// Binary operators of the selector expression language.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Mod,
  Gt,
  Ge,
  Lt,
  Le,
  Eq,
  Ne,
  And,
  Or,
}

/// A parsed selector expression.
///
/// The tree is a pure value with no reference back to the source text. Arity
/// is fixed per variant, so a malformed node cannot be represented.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ast {
  /// A decimal integer literal.
  Number(i64),
  /// The free variable `n`, the magnitude being pluralized.
  N,
  /// Logical negation: `1` if the operand is `0`, `0` otherwise.
  Not(Box<Ast>),
  /// A binary arithmetic, comparison or logical operation.
  Binary { op: BinaryOp, lhs: Box<Ast>, rhs: Box<Ast> },
  /// A conditional: evaluates `cond`, then exactly one branch.
  Ternary { cond: Box<Ast>, then: Box<Ast>, otherwise: Box<Ast> },
}

impl Ast {
  pub(crate) fn binary(op: BinaryOp, lhs: Ast, rhs: Ast) -> Self {
    Ast::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
  }

  /// Evaluates the expression for the magnitude `n`.
  ///
  /// Comparisons and logical operators yield `1` for true and `0` for false.
  /// Division rounds toward negative infinity; the remainder keeps the sign
  /// of the dividend. Division by zero and arithmetic overflow are parse-level
  /// inconsistencies of the expression and reported as such, never as panics.
  pub fn evaluate(&self, n: i64) -> Result<i64> {
    match self {
      Ast::Number(value) => Ok(*value),
      Ast::N => Ok(n),
      Ast::Not(operand) => Ok((operand.evaluate(n)? == 0) as i64),
      Ast::Binary { op, lhs, rhs } => {
        let lhs = lhs.evaluate(n)?;
        let rhs = rhs.evaluate(n)?;
        match op {
          BinaryOp::Add => lhs.checked_add(rhs).ok_or_else(overflow),
          BinaryOp::Sub => lhs.checked_sub(rhs).ok_or_else(overflow),
          BinaryOp::Mul => lhs.checked_mul(rhs).ok_or_else(overflow),
          BinaryOp::Div => floor_div(lhs, rhs),
          BinaryOp::Mod => {
            if rhs == 0 {
              Err(Error::Parse("modulo by zero in plural expression".to_string()))
            } else {
              lhs.checked_rem(rhs).ok_or_else(overflow)
            }
          },
          BinaryOp::Gt => Ok((lhs > rhs) as i64),
          BinaryOp::Ge => Ok((lhs >= rhs) as i64),
          BinaryOp::Lt => Ok((lhs < rhs) as i64),
          BinaryOp::Le => Ok((lhs <= rhs) as i64),
          BinaryOp::Eq => Ok((lhs == rhs) as i64),
          BinaryOp::Ne => Ok((lhs != rhs) as i64),
          BinaryOp::And => Ok((lhs != 0 && rhs != 0) as i64),
          BinaryOp::Or => Ok((lhs != 0 || rhs != 0) as i64),
        }
      },
      Ast::Ternary { cond, then, otherwise } => {
        if cond.evaluate(n)? != 0 {
          then.evaluate(n)
        } else {
          otherwise.evaluate(n)
        }
      },
    }
  }
}

fn overflow() -> Error {
  Error::Parse("arithmetic overflow in plural expression".to_string())
}

/// Integer division rounding toward negative infinity.
fn floor_div(lhs: i64, rhs: i64) -> Result<i64> {
  if rhs == 0 {
    return Err(Error::Parse("division by zero in plural expression".to_string()));
  }
  let quotient = lhs.checked_div(rhs).ok_or_else(overflow)?;
  if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
    Ok(quotient - 1)
  } else {
    Ok(quotient)
  }
}
