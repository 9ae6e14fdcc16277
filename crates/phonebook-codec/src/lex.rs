//! Tokenizer for the store grammar.
//!
//! The grammar has six punctuation tokens and double-quoted strings. Strings
//! have no escapes: one ends at the next `"` and backslashes are kept
//! verbatim. Whitespace between tokens is skipped; every other character is
//! an error.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
  LBrace,
  RBrace,
  LBracket,
  RBracket,
  Colon,
  Comma,
  Str(String),
}

impl TokenKind {
  pub(crate) fn describe(&self) -> String {
    match self {
      Self::LBrace => "'{'".to_owned(),
      Self::RBrace => "'}'".to_owned(),
      Self::LBracket => "'['".to_owned(),
      Self::RBracket => "']'".to_owned(),
      Self::Colon => "':'".to_owned(),
      Self::Comma => "','".to_owned(),
      Self::Str(s) => format!("string {s:?}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
  pub kind:   TokenKind,
  /// Byte offset of the token's first character.
  pub offset: usize,
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
  let mut tokens = Vec::new();
  let mut chars = input.char_indices();

  while let Some((offset, c)) = chars.next() {
    let kind = match c {
      c if c.is_whitespace() => continue,
      '{' => TokenKind::LBrace,
      '}' => TokenKind::RBrace,
      '[' => TokenKind::LBracket,
      ']' => TokenKind::RBracket,
      ':' => TokenKind::Colon,
      ',' => TokenKind::Comma,
      '"' => {
        let mut text = String::new();
        let mut closed = false;
        for (_, c) in chars.by_ref() {
          if c == '"' {
            closed = true;
            break;
          }
          text.push(c);
        }
        if !closed {
          return Err(Error::Malformed {
            reason:    "unterminated string".to_owned(),
            remainder: input[offset..].to_owned(),
          });
        }
        TokenKind::Str(text)
      }
      other => {
        return Err(Error::Malformed {
          reason:    format!("unexpected character {other:?}"),
          remainder: input[offset..].to_owned(),
        });
      }
    };
    tokens.push(Token { kind, offset });
  }

  Ok(tokens)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
