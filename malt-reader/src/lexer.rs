// malt-reader - Lexer for malt
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for malt source code.
//!
//! The lexer never fails. Malformed tokens such as an unterminated string are
//! handed to the parser intact, which reports them only if it actually reads
//! that far.

use std::fmt;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Reader macros
    Quote,         // '
    Quasiquote,    // `
    Unquote,       // ~
    SpliceUnquote, // ~@
    Deref,         // @

    /// A double-quoted string. `body` is the raw text between the quotes,
    /// escapes still in place.
    Str { body: String, terminated: bool },

    /// Any other run of non-delimiter characters: numbers, symbols, keywords,
    /// `nil`/`true`/`false` and the `^` metadata marker.
    Atom(String),

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Quote => write!(f, "'"),
            Token::Quasiquote => write!(f, "`"),
            Token::Unquote => write!(f, "~"),
            Token::SpliceUnquote => write!(f, "~@"),
            Token::Deref => write!(f, "@"),
            Token::Str { body, terminated } => {
                if *terminated {
                    write!(f, "\"{}\"", body)
                } else {
                    write!(f, "\"{}", body)
                }
            }
            Token::Atom(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Position of the first character of a token (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// The lexer converts source code into tokens.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code.
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get the next token and where it started.
    ///
    /// Whitespace, commas and `;` comments are skipped. Returns `Token::Eof`
    /// once the input is exhausted, and keeps returning it.
    pub fn next_token(&mut self) -> (Token, Span) {
        self.skip_separators_and_comments();

        let span = Span {
            line: self.line,
            column: self.column,
        };

        let c = match self.peek() {
            Some(c) => c,
            None => return (Token::Eof, span),
        };

        let token = match c {
            '~' => {
                self.advance();
                if self.peek() == Some('@') {
                    self.advance();
                    Token::SpliceUnquote
                } else {
                    Token::Unquote
                }
            }
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '\'' => self.single(Token::Quote),
            '`' => self.single(Token::Quasiquote),
            '@' => self.single(Token::Deref),
            '"' => self.read_string(),
            _ => self.read_atom(),
        };

        (token, span)
    }

    /// Collect every token in `source`, without positions.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            match lexer.next_token().0 {
                Token::Eof => return tokens,
                token => tokens.push(token),
            }
        }
    }

    // ========================================================================
    // Character helpers
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn skip_separators_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.advance();
            } else if c == ';' {
                // Comment runs to the end of the line
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    // ========================================================================
    // Token readers
    // ========================================================================

    fn read_string(&mut self) -> Token {
        self.advance(); // consume opening quote
        let mut body = String::new();

        loop {
            match self.peek() {
                None => break,
                Some('"') => {
                    self.advance();
                    return Token::Str {
                        body,
                        terminated: true,
                    };
                }
                Some('\\') => match self.peek_second() {
                    // A backslash must escape something on the same line,
                    // otherwise the token ends before it.
                    None | Some('\n') => break,
                    Some(escaped) => {
                        self.advance();
                        self.advance();
                        body.push('\\');
                        body.push(escaped);
                    }
                },
                Some(c) => {
                    self.advance();
                    body.push(c);
                }
            }
        }

        Token::Str {
            body,
            terminated: false,
        }
    }

    fn read_atom(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_atom_terminator(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::Atom(text)
    }
}

/// Characters that end a run of atom text. `~`, `@` and `^` are not among
/// them, so they only act as reader macros at the start of a token.
fn is_atom_terminator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | '`' | ',' | ';'
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> Token {
        Token::Atom(s.to_string())
    }

    fn string(body: &str) -> Token {
        Token::Str {
            body: body.to_string(),
            terminated: true,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(Lexer::tokenize("").is_empty());
        assert!(Lexer::tokenize("  ,, \n\t").is_empty());
        assert!(Lexer::tokenize("; just a comment").is_empty());
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            Lexer::tokenize("()[]{}"),
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_reader_macros() {
        assert_eq!(
            Lexer::tokenize("'a `b ~c ~@d @e"),
            vec![
                Token::Quote,
                atom("a"),
                Token::Quasiquote,
                atom("b"),
                Token::Unquote,
                atom("c"),
                Token::SpliceUnquote,
                atom("d"),
                Token::Deref,
                atom("e"),
            ]
        );
    }

    #[test]
    fn test_macro_chars_inside_atoms() {
        assert_eq!(Lexer::tokenize("a~b c@d"), vec![atom("a~b"), atom("c@d")]);
        assert_eq!(Lexer::tokenize("^meta"), vec![atom("^meta")]);
        assert_eq!(Lexer::tokenize("^ x"), vec![atom("^"), atom("x")]);
    }

    #[test]
    fn test_commas_are_whitespace() {
        assert_eq!(
            Lexer::tokenize("1,2 ,3"),
            vec![atom("1"), atom("2"), atom("3")]
        );
    }

    #[test]
    fn test_comment_ends_at_newline() {
        assert_eq!(
            Lexer::tokenize("a ; comment ( \nb"),
            vec![atom("a"), atom("b")]
        );
    }

    #[test]
    fn test_atoms_stop_at_delimiters() {
        assert_eq!(
            Lexer::tokenize("(foo bar)"),
            vec![Token::LParen, atom("foo"), atom("bar"), Token::RParen]
        );
        assert_eq!(Lexer::tokenize("a'b"), vec![atom("a"), Token::Quote, atom("b")]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(Lexer::tokenize("\"hello\""), vec![string("hello")]);
        assert_eq!(Lexer::tokenize(r#""a\"b""#), vec![string(r#"a\"b"#)]);
        assert_eq!(Lexer::tokenize("\"line\nbreak\""), vec![string("line\nbreak")]);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            Lexer::tokenize("\"abc"),
            vec![Token::Str {
                body: "abc".to_string(),
                terminated: false
            }]
        );
        // A trailing backslash cannot escape the end of input
        assert_eq!(
            Lexer::tokenize("\"abc\\"),
            vec![
                Token::Str {
                    body: "abc".to_string(),
                    terminated: false
                },
                atom("\\"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let mut lexer = Lexer::new("a\n  (b");
        assert_eq!(lexer.next_token().1, Span { line: 1, column: 1 });
        assert_eq!(lexer.next_token().1, Span { line: 2, column: 3 });
        assert_eq!(lexer.next_token().1, Span { line: 2, column: 4 });
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        lexer.next_token();
        assert_eq!(lexer.next_token().0, Token::Eof);
        assert_eq!(lexer.next_token().0, Token::Eof);
    }
}
