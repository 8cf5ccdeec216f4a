use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ScriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Punct {
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Question,
    Colon,
    Semicolon,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
    AndAnd,
    OrOr,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Punct(Punct),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ScriptError> {
    Lexer {
        source,
        chars: source.char_indices().peekable(),
    }
    .run()
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

fn lex_error(offset: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Lex {
        offset,
        message: message.into(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Spanned>, ScriptError> {
        let mut tokens = Vec::new();
        while let Some(&(offset, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }
            let token = match c {
                '/' if self.peek_second() == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.peek_second() == Some('*') => {
                    self.skip_block_comment(offset)?;
                    continue;
                }
                '0'..='9' => self.number(offset)?,
                '.' if self.peek_second().is_some_and(|next| next.is_ascii_digit()) => {
                    self.number(offset)?
                }
                '"' | '\'' => self.string(offset, c)?,
                c if is_ident_start(c) => self.ident(offset),
                _ => Token::Punct(self.punct(offset, c)?),
            };
            tokens.push(Spanned { token, offset });
        }
        Ok(tokens)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn next_if_char(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn skip_line_comment(&mut self) {
        while self.chars.next_if(|&(_, c)| c != '\n').is_some() {}
    }

    fn skip_block_comment(&mut self, offset: usize) -> Result<(), ScriptError> {
        self.chars.next();
        self.chars.next();
        while let Some((_, c)) = self.chars.next() {
            if c == '*' && self.next_if_char('/') {
                return Ok(());
            }
        }
        Err(lex_error(offset, "unterminated comment"))
    }

    fn take_while(&mut self, mut accept: impl FnMut(char) -> bool) -> usize {
        let mut end = self.source.len();
        while let Some(&(index, c)) = self.chars.peek() {
            if !accept(c) {
                end = index;
                break;
            }
            self.chars.next();
        }
        end
    }

    fn number(&mut self, start: usize) -> Result<Token, ScriptError> {
        let radix_prefix = self.source[start..].starts_with('0')
            && self
                .peek_second()
                .is_some_and(|c| matches!(c, 'x' | 'X' | 'o' | 'O' | 'b' | 'B'));
        let end = if radix_prefix {
            self.chars.next();
            self.chars.next();
            self.take_while(|c| c.is_ascii_alphanumeric())
        } else {
            let mut previous = '\0';
            self.take_while(|c| {
                let accept = c.is_ascii_digit()
                    || c == '.'
                    || matches!(c, 'e' | 'E')
                    || (matches!(c, '+' | '-') && matches!(previous, 'e' | 'E'));
                previous = c;
                accept
            })
        };

        let text = &self.source[start..end];
        if self.chars.peek().is_some_and(|&(_, c)| is_ident_start(c)) {
            return Err(lex_error(start, format!("identifier directly after number `{text}`")));
        }
        let value = crate::numeric::parse_number(text);
        if value.is_nan() {
            return Err(lex_error(start, format!("malformed number `{text}`")));
        }
        Ok(Token::Number(value))
    }

    fn string(&mut self, start: usize, quote: char) -> Result<Token, ScriptError> {
        self.chars.next();
        let mut text = String::new();
        loop {
            let Some((index, c)) = self.chars.next() else {
                return Err(lex_error(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(Token::Str(text)),
                '\n' => return Err(lex_error(index, "line break inside string")),
                '\\' => {
                    let Some((escape_at, escaped)) = self.chars.next() else {
                        return Err(lex_error(start, "unterminated string"));
                    };
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        'b' => text.push('\u{8}'),
                        'f' => text.push('\u{c}'),
                        'v' => text.push('\u{b}'),
                        '0' => text.push('\0'),
                        'x' => text.push(self.hex_escape(escape_at, 2)?),
                        'u' => text.push(self.unicode_escape(escape_at)?),
                        '\n' => {}
                        other => text.push(other),
                    }
                }
                other => text.push(other),
            }
        }
    }

    fn hex_escape(&mut self, offset: usize, width: usize) -> Result<char, ScriptError> {
        let mut code = 0u32;
        for _ in 0..width {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| lex_error(offset, "malformed escape sequence"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| lex_error(offset, "escape is not a valid character"))
    }

    fn unicode_escape(&mut self, offset: usize) -> Result<char, ScriptError> {
        if !self.next_if_char('{') {
            return self.hex_escape(offset, 4);
        }
        let mut code = 0u32;
        let mut digits = 0;
        loop {
            match self.chars.next() {
                Some((_, '}')) if digits > 0 => break,
                Some((_, c)) if digits < 6 => {
                    let digit = c
                        .to_digit(16)
                        .ok_or_else(|| lex_error(offset, "malformed escape sequence"))?;
                    code = code * 16 + digit;
                    digits += 1;
                }
                _ => return Err(lex_error(offset, "malformed escape sequence")),
            }
        }
        char::from_u32(code).ok_or_else(|| lex_error(offset, "escape is not a valid character"))
    }

    fn ident(&mut self, start: usize) -> Token {
        let end = self.take_while(is_ident_continue);
        Token::Ident(self.source[start..end].to_string())
    }

    fn punct(&mut self, offset: usize, c: char) -> Result<Punct, ScriptError> {
        self.chars.next();
        let punct = match c {
            '.' => Punct::Dot,
            ',' => Punct::Comma,
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            '[' => Punct::LBracket,
            ']' => Punct::RBracket,
            '?' => Punct::Question,
            ':' => Punct::Colon,
            ';' => Punct::Semicolon,
            '+' => Punct::Plus,
            '-' => Punct::Minus,
            '*' => Punct::Star,
            '/' => Punct::Slash,
            '%' => Punct::Percent,
            '<' if self.next_if_char('=') => Punct::Le,
            '<' => Punct::Lt,
            '>' if self.next_if_char('=') => Punct::Ge,
            '>' => Punct::Gt,
            '!' if self.next_if_char('=') => {
                if self.next_if_char('=') {
                    Punct::StrictNe
                } else {
                    Punct::LooseNe
                }
            }
            '!' => Punct::Bang,
            '=' if self.next_if_char('=') => {
                if self.next_if_char('=') {
                    Punct::StrictEq
                } else {
                    Punct::LooseEq
                }
            }
            '=' => return Err(lex_error(offset, "assignment is not supported")),
            '&' if self.next_if_char('&') => Punct::AndAnd,
            '|' if self.next_if_char('|') => Punct::OrOr,
            other => return Err(lex_error(offset, format!("unexpected character `{other}`"))),
        };
        Ok(punct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    #[test]
    fn tokenizes_member_calls_and_operators() {
        assert_eq!(
            kinds("source.trim() !== '' // tail"),
            vec![
                Token::Ident("source".into()),
                Token::Punct(Punct::Dot),
                Token::Ident("trim".into()),
                Token::Punct(Punct::LParen),
                Token::Punct(Punct::RParen),
                Token::Punct(Punct::StrictNe),
                Token::Str(String::new()),
            ]
        );
    }

    #[test]
    fn reads_numbers_and_escapes() {
        assert_eq!(
            kinds("1.5e3 .5 0x1f \"a\\tb\\u0041\\u{1F600}\""),
            vec![
                Token::Number(1500.0),
                Token::Number(0.5),
                Token::Number(31.0),
                Token::Str("a\tbA\u{1F600}".into()),
            ]
        );
    }

    #[test]
    fn skips_block_comments() {
        assert_eq!(kinds("/* x */ 1"), vec![Token::Number(1.0)]);
    }

    #[test]
    fn rejects_bad_input() {
        for source in ["'open", "a = 1", "1abc", "/* open", "#", "a & b", "1.2.3"] {
            assert!(
                matches!(tokenize(source), Err(ScriptError::Lex { .. })),
                "{source:?}"
            );
        }
    }
}
