// SPL Lexer
// Per-character scanner with one-word lookahead and keyword canonicalisation

use crate::error::{LexError, LexResult};
use crate::line_context::{indexing_keyword, LineContext};
use crate::token::{Span, Token, TokenKind};
use tracing::debug;

/// Reserved words, in canonical lowercase
pub const KEYWORDS: &[&str] = &[
    "set",
    "set_array",
    "to",
    "as",
    "print",
    "if",
    "then",
    "otherwise",
    "otherwiseif",
    "end",
    "while",
    "do",
    "loop",
    "for loop",
    "for",
    "each",
    "in",
    "until",
    "from",
    "up",
    "function",
    "with",
    "return",
    "call",
    "create",
    "array",
    "insert",
    "at",
    "remove",
    "swap",
    "is",
    "greater",
    "less",
    "equal",
    "than",
    "number",
    "string",
    "boolean",
    "substring",
    "length",
    "of",
    "element",
    "character",
];

/// Words rewritten to their canonical keyword before classification
fn canonical_synonym(word: &str) -> &str {
    match word {
        "display" | "show" => "print",
        "add" => "insert",
        "delete" => "remove",
        "else" => "otherwise",
        other => other,
    }
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Split SPL source text into tokens
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let tokens = Lexer::new(source).tokenize()?;
    debug!(tokens = tokens.len(), "tokenized SPL source");
    Ok(tokens)
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => {
                    self.line += 1;
                    self.bump();
                }
                ';' => self.bump(),
                c if c.is_whitespace() => self.bump(),
                c if c.is_ascii_digit() => self.lex_number(),
                c if c.is_alphabetic() || c == '_' => self.lex_word(),
                '"' | '\'' => self.lex_string(ch)?,
                '(' | ')' | '[' | ']' | ',' => {
                    let start = self.pos;
                    self.bump();
                    self.push(TokenKind::Delimiter, ch.to_string(), start);
                }
                '+' | '-' | '*' | '/' | '%' => {
                    let start = self.pos;
                    self.bump();
                    self.push(TokenKind::Operator, ch.to_string(), start);
                }
                '=' | '!' | '<' | '>' => self.lex_comparison(ch),
                '&' | '|' => self.lex_logical(ch)?,
                other => {
                    return Err(LexError::UnexpectedCharacter {
                        character: other,
                        line: self.line,
                        span: Span::new(self.pos, self.pos + other.len_utf8()).into(),
                    });
                }
            }
        }

        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, start: usize) {
        self.tokens
            .push(Token::new(kind, text, self.line, Span::new(start, self.pos)));
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text = &self.source[start..self.pos];
        self.push(TokenKind::Number, text, start);
    }

    fn lex_string(&mut self, quote: char) -> LexResult<()> {
        let start = self.pos;
        self.bump();
        let content_start = self.pos;

        loop {
            match self.peek() {
                None => {
                    return Err(LexError::UnterminatedString {
                        line: self.line,
                        span: Span::new(start, start + 1).into(),
                    });
                }
                Some('\n') => {
                    return Err(LexError::NewlineInString {
                        line: self.line,
                        span: Span::new(start, start + 1).into(),
                    });
                }
                Some(c) if c == quote => break,
                Some(_) => self.bump(),
            }
        }

        let content = self.source[content_start..self.pos].to_string();
        self.bump();
        self.push(TokenKind::String, content, start);
        Ok(())
    }

    fn lex_comparison(&mut self, first: char) {
        let start = self.pos;
        self.bump();
        let followed_by_equals = self.peek() == Some('=');
        if followed_by_equals {
            self.bump();
        }

        let (kind, text) = match (first, followed_by_equals) {
            ('=', _) => (TokenKind::ComparisonOperator, "=="),
            ('!', true) => (TokenKind::ComparisonOperator, "!="),
            ('!', false) => (TokenKind::LogicalOperator, "!"),
            ('<', true) => (TokenKind::ComparisonOperator, "<="),
            ('<', false) => (TokenKind::ComparisonOperator, "<"),
            ('>', true) => (TokenKind::ComparisonOperator, ">="),
            _ => (TokenKind::ComparisonOperator, ">"),
        };
        self.push(kind, text, start);
    }

    fn lex_logical(&mut self, first: char) -> LexResult<()> {
        let start = self.pos;
        if self.peek_second() != Some(first) {
            return Err(LexError::UnexpectedCharacter {
                character: first,
                line: self.line,
                span: Span::new(start, start + 1).into(),
            });
        }
        self.bump();
        self.bump();
        let text = if first == '&' { "&&" } else { "||" };
        self.push(TokenKind::LogicalOperator, text, start);
        Ok(())
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        &self.source[start..self.pos]
    }

    /// The next word on the same line, without consuming it: `(word, end)`
    fn lookahead_word(&self) -> Option<(&'a str, usize)> {
        let rest = &self.source[self.pos..];
        let skipped = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let word_start = self.pos + skipped;
        let tail = &self.source[word_start..];
        let first = tail.chars().next()?;
        if !(first.is_alphabetic() || first == '_') {
            return None;
        }
        let length = tail
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        Some((&tail[..length], word_start + length))
    }

    /// Consume the lookahead word when it matches `expected`
    fn fuse_with(&mut self, expected: &str) -> bool {
        match self.lookahead_word() {
            Some((word, end)) if word.eq_ignore_ascii_case(expected) => {
                self.pos = end;
                true
            }
            _ => false,
        }
    }

    fn lex_word(&mut self) {
        let start = self.pos;
        let word = self.read_word();
        let lowered = word.to_lowercase();

        match lowered.as_str() {
            "true" | "false" => {
                self.push(TokenKind::Boolean, lowered, start);
                return;
            }
            "and" | "or" | "not" => {
                self.push(TokenKind::LogicalOperator, lowered, start);
                return;
            }
            "mod" => {
                self.push(TokenKind::Operator, "%", start);
                return;
            }
            _ => {}
        }

        let canonical = canonical_synonym(&lowered);
        let keyword = match canonical {
            "otherwise" if self.fuse_with("if") => "otherwiseif",
            "for" if self.fuse_with("loop") => "for loop",
            "set" if LineContext::after(self.source, self.pos).is_element_assignment() => {
                "set_array"
            }
            "element" | "character" => {
                indexing_keyword(canonical, LineContext::after(self.source, self.pos))
            }
            other if is_keyword(other) => other,
            _ => {
                self.push(TokenKind::Identifier, word, start);
                return;
            }
        };

        let keyword = keyword.to_string();
        self.push(TokenKind::Keyword, keyword, start);
    }
}
