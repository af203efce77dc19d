use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(Rc<str>),
    Ident(Rc<str>),
    Int(Rc<str>),
    String(Rc<str>),

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

/// A token together with the byte range of the source it was read from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

/// Splits source text into tokens, one per call to `next`.
///
/// The iterator ending (`None`) is the end-of-input token. Characters the
/// language does not know about become [`TokenKind::Illegal`] tokens, so
/// tokenizing never stops early.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    /// Identifiers start with a letter or `_`; digits may follow.
    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        Token {
            kind: keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into())),
            start,
            end,
        }
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        Token {
            kind: TokenKind::Int(self.input[start..end].into()),
            start,
            end,
        }
    }

    /// `start` points at the opening quote; the token keeps only the text
    /// between the quotes.
    fn read_string(&mut self, start: usize) -> Token {
        loop {
            match self.iter.next() {
                Some((_, '"')) => break,
                None => {
                    return Token {
                        kind: TokenKind::Illegal("unterminated string".into()),
                        start,
                        end: self.input.len(),
                    }
                }
                _ => {}
            }
        }

        let end = self.next_idx();
        Token {
            kind: TokenKind::String(self.input[start + 1..end - 1].into()),
            start,
            end,
        }
    }

    /// Builds a token starting at `start`, optionally extending it by one
    /// character when the next one is `second`.
    fn operator(
        &mut self,
        start: usize,
        single: TokenKind,
        second: char,
        double: TokenKind,
    ) -> Token {
        let kind = if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            double
        } else {
            single
        };
        self.token(kind, start)
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.next_idx(),
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.iter.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let (idx, ch) = self.iter.next()?;
        let tok = match ch {
            '=' => self.operator(idx, TokenKind::Assign, '=', TokenKind::Equal),
            '!' => self.operator(idx, TokenKind::Bang, '=', TokenKind::NotEqual),
            '+' => self.token(TokenKind::Plus, idx),
            '-' => self.token(TokenKind::Minus, idx),
            '*' => self.token(TokenKind::Asterisk, idx),
            '/' => self.token(TokenKind::Slash, idx),
            '<' => self.token(TokenKind::LessThan, idx),
            '>' => self.token(TokenKind::GreaterThan, idx),
            ',' => self.token(TokenKind::Comma, idx),
            ':' => self.token(TokenKind::Colon, idx),
            ';' => self.token(TokenKind::SemiColon, idx),
            '(' => self.token(TokenKind::LParen, idx),
            ')' => self.token(TokenKind::RParen, idx),
            '{' => self.token(TokenKind::LBrace, idx),
            '}' => self.token(TokenKind::RBrace, idx),
            '[' => self.token(TokenKind::LBracket, idx),
            ']' => self.token(TokenKind::RBracket, idx),
            '"' => self.read_string(idx),
            c if Tokenizer::is_letter(c) => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            _ => self.token(TokenKind::Illegal(ch.to_string().into()), idx),
        };
        Some(tok)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        let text = match self {
            Illegal(_) => "ILLEGAL",
            Ident(_) => "IDENT",
            Int(_) => "INT",
            String(_) => "STRING",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            Comma => ",",
            Colon => ":",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Function => "FUNCTION",
            Let => "LET",
            True => "TRUE",
            False => "FALSE",
            If => "IF",
            Else => "ELSE",
            Return => "RETURN",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.into())
    }

    fn int(value: &str) -> TokenKind {
        TokenKind::Int(value.into())
    }

    #[test]
    fn test_spans() {
        let output = Tokenizer::new("=+ let").collect::<Vec<_>>();

        assert_eq!(
            output,
            vec![
                Token {
                    kind: TokenKind::Assign,
                    start: 0,
                    end: 1
                },
                Token {
                    kind: TokenKind::Plus,
                    start: 1,
                    end: 2
                },
                Token {
                    kind: TokenKind::Let,
                    start: 3,
                    end: 6
                },
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        use TokenKind::*;
        assert_eq!(
            kinds("=+(){},;:[]"),
            vec![
                Assign, Plus, LParen, RParen, LBrace, RBrace, Comma, SemiColon, Colon, LBracket,
                RBracket
            ]
        );
    }

    #[test]
    fn test_program() {
        use TokenKind::*;
        let input = "let five = 5;
    let add = fn(x, y) {
    x + y;
    };
    let result = add(five, ten);
    ";
        let expected_output = vec![
            Let,
            ident("five"),
            Assign,
            int("5"),
            SemiColon,
            Let,
            ident("add"),
            Assign,
            Function,
            LParen,
            ident("x"),
            Comma,
            ident("y"),
            RParen,
            LBrace,
            ident("x"),
            Plus,
            ident("y"),
            SemiColon,
            RBrace,
            SemiColon,
            Let,
            ident("result"),
            Assign,
            ident("add"),
            LParen,
            ident("five"),
            Comma,
            ident("ten"),
            RParen,
            SemiColon,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;
        let input = "
    !-/*5;
    5 < 10 > 5;
    10 == 10;
    10 != 9;
    ";

        let expected_output = vec![
            Bang,
            Minus,
            Slash,
            Asterisk,
            int("5"),
            SemiColon,
            int("5"),
            LessThan,
            int("10"),
            GreaterThan,
            int("5"),
            SemiColon,
            int("10"),
            Equal,
            int("10"),
            SemiColon,
            int("10"),
            NotEqual,
            int("9"),
            SemiColon,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_keywords() {
        use TokenKind::*;
        let input = "if (5 < 10) {
    return true;
    } else {
    return false;
    }";

        let expected_output = vec![
            If,
            LParen,
            int("5"),
            LessThan,
            int("10"),
            RParen,
            LBrace,
            Return,
            True,
            SemiColon,
            RBrace,
            Else,
            LBrace,
            Return,
            False,
            SemiColon,
            RBrace,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#""foobar" "foo bar" """#),
            vec![
                TokenKind::String("foobar".into()),
                TokenKind::String("foo bar".into()),
                TokenKind::String("".into()),
            ]
        );
        assert_eq!(
            kinds(r#"{"foo": 1}"#),
            vec![
                TokenKind::LBrace,
                TokenKind::String("foo".into()),
                TokenKind::Colon,
                int("1"),
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_illegal_tokens_do_not_stop_tokenizing() {
        assert_eq!(
            kinds("a @ b"),
            vec![ident("a"), TokenKind::Illegal("@".into()), ident("b")]
        );
        assert_eq!(
            kinds("\"open"),
            vec![TokenKind::Illegal("unterminated string".into())]
        );
    }

    #[test]
    fn test_identifiers_with_underscores_and_digits() {
        assert_eq!(kinds("snake_case _x"), vec![ident("snake_case"), ident("_x")]);
        assert_eq!(kinds("x1 k_2b"), vec![ident("x1"), ident("k_2b")]);
        // a leading digit starts a number
        assert_eq!(kinds("1x"), vec![int("1"), ident("x")]);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::RParen.to_string(), ")");
        assert_eq!(TokenKind::Ident("x".into()).to_string(), "IDENT");
        assert_eq!(TokenKind::Function.to_string(), "FUNCTION");
    }
}
