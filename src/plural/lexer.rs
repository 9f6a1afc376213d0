//! Tokenizer for plural-forms selector expressions.
use crate::error::{Error, Result};

/// A single token of the selector expression language.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token {
  Number(i64),
  N,
  LeftParen,
  RightParen,
  Not,
  Mul,
  Div,
  Mod,
  Plus,
  Minus,
  Lt,
  Le,
  Gt,
  Ge,
  Eq,
  Ne,
  And,
  Or,
  Question,
  Colon,
}

/// Splits an expression into tokens. Whitespace is insignificant.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
  let mut tokens = Vec::new();
  let mut chars = input.chars().peekable();

  while let Some(&current) = chars.peek() {
    match current {
      c if c.is_ascii_whitespace() => {
        chars.next();
      },
      '0'..='9' => {
        let mut value = 0i64;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
          value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or_else(|| Error::Parse("integer literal out of range in plural expression".to_string()))?;
          chars.next();
        }
        tokens.push(Token::Number(value));
      },
      'n' => {
        chars.next();
        tokens.push(Token::N);
      },
      '(' => {
        chars.next();
        tokens.push(Token::LeftParen);
      },
      ')' => {
        chars.next();
        tokens.push(Token::RightParen);
      },
      '*' => {
        chars.next();
        tokens.push(Token::Mul);
      },
      '/' => {
        chars.next();
        tokens.push(Token::Div);
      },
      '%' => {
        chars.next();
        tokens.push(Token::Mod);
      },
      '+' => {
        chars.next();
        tokens.push(Token::Plus);
      },
      '-' => {
        chars.next();
        tokens.push(Token::Minus);
      },
      '?' => {
        chars.next();
        tokens.push(Token::Question);
      },
      ':' => {
        chars.next();
        tokens.push(Token::Colon);
      },
      '!' => {
        chars.next();
        if chars.peek() == Some(&'=') {
          chars.next();
          tokens.push(Token::Ne);
        } else {
          tokens.push(Token::Not);
        }
      },
      '<' => {
        chars.next();
        if chars.peek() == Some(&'=') {
          chars.next();
          tokens.push(Token::Le);
        } else {
          tokens.push(Token::Lt);
        }
      },
      '>' => {
        chars.next();
        if chars.peek() == Some(&'=') {
          chars.next();
          tokens.push(Token::Ge);
        } else {
          tokens.push(Token::Gt);
        }
      },
      '=' => {
        chars.next();
        if chars.peek() == Some(&'=') {
          chars.next();
          tokens.push(Token::Eq);
        } else {
          return Err(Error::Parse("found single '=' in plural expression".to_string()));
        }
      },
      '&' => {
        chars.next();
        if chars.peek() == Some(&'&') {
          chars.next();
          tokens.push(Token::And);
        } else {
          return Err(Error::Parse("found single '&' in plural expression".to_string()));
        }
      },
      '|' => {
        chars.next();
        if chars.peek() == Some(&'|') {
          chars.next();
          tokens.push(Token::Or);
        } else {
          return Err(Error::Parse("found single '|' in plural expression".to_string()));
        }
      },
      other => {
        return Err(Error::Parse(format!("unexpected character '{other}' in plural expression")));
      },
    }
  }

  Ok(tokens)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn tokenizes_a_typical_rule_expression() {
    let tokens = tokenize("n%10==1 && n%100!=11").unwrap();
    assert_eq!(tokens, vec![
      Token::N,
      Token::Mod,
      Token::Number(10),
      Token::Eq,
      Token::Number(1),
      Token::And,
      Token::N,
      Token::Mod,
      Token::Number(100),
      Token::Ne,
      Token::Number(11),
    ]);
  }

  #[test]
  fn whitespace_is_insignificant() {
    assert_eq!(tokenize("n == 1").unwrap(), tokenize("n==1").unwrap());
    assert_eq!(tokenize("\tn\n==\r 1 ").unwrap(), tokenize("n==1").unwrap());
  }

  #[test]
  fn multi_digit_literals_are_single_tokens() {
    assert_eq!(tokenize("1234").unwrap(), vec![Token::Number(1234)]);
  }

  #[test]
  fn distinguishes_not_from_not_equal() {
    assert_eq!(tokenize("!n").unwrap(), vec![Token::Not, Token::N]);
    assert_eq!(tokenize("n!=1").unwrap(), vec![Token::N, Token::Ne, Token::Number(1)]);
  }

  #[test]
  fn rejects_unknown_characters() {
    assert!(matches!(tokenize("n == x"), Err(Error::Parse(_))));
    assert!(matches!(tokenize("n = 1"), Err(Error::Parse(_))));
    assert!(matches!(tokenize("n & 1"), Err(Error::Parse(_))));
    assert!(matches!(tokenize("n | 1"), Err(Error::Parse(_))));
  }

  #[test]
  fn rejects_literals_that_do_not_fit() {
    assert!(matches!(tokenize("99999999999999999999"), Err(Error::Parse(_))));
  }
}
