/// `Tokenizer` - Lazy tokenizer for brace-delimited sources
///
/// Wraps a string and maintains state about whether we're inside a block
/// comment or a text block, so that brackets, keywords and commas inside strings and comments
/// are never reported as structural tokens. It never fails: unterminated
/// strings and block comments come out as tokens flagged `unterminated`.
use crate::parser::token::{Token, TokenKind};
use crate::rules::RuleTable;

/// Iterator over the tokens of a source text
///
/// Cloning a `Tokenizer` (or building a new one) restarts the sequence.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    rules: &'a RuleTable,
    /// Byte offset of the next unread character
    pos: usize,
    line: usize,
    column: usize,
    in_block_comment: bool,
    in_text_block: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a new `Tokenizer` positioned at the start of `source`
    #[must_use]
    pub fn new(source: &'a str, rules: &'a RuleTable) -> Self {
        Self {
            source,
            rules,
            pos: 0,
            line: 1,
            column: 0,
            in_block_comment: false,
            in_text_block: false,
            finished: false,
        }
    }

    /// Check if we're currently inside a block comment
    #[must_use]
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_str(&mut self, s: &str) {
        for _ in s.chars() {
            self.bump();
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn token_from(&self, kind: TokenKind, start: usize, line: usize, column: usize) -> Token<'a> {
        Token::new(kind, &self.source[start..self.pos], line, column)
    }

    /// Next token while inside a block comment
    fn block_comment_token(&mut self) -> Token<'a> {
        let (start, line, column) = (self.pos, self.line, self.column);
        let rules = self.rules;
        let end_marker = rules.block_comment_end.as_str();

        match self.peek() {
            None => {
                // Input ended inside the comment: synthesize an empty closer
                self.in_block_comment = false;
                self.finished = true;
                let mut token = self.token_from(TokenKind::BlockCommentClose, start, line, column);
                token.unterminated = true;
                token
            }
            Some('\n') => {
                self.bump();
                self.token_from(TokenKind::Newline, start, line, column)
            }
            Some(_) if self.rest().starts_with(end_marker) => {
                self.bump_str(end_marker);
                self.in_block_comment = false;
                self.token_from(TokenKind::BlockCommentClose, start, line, column)
            }
            Some(_) => {
                while let Some(c) = self.peek() {
                    if c == '\n' || self.rest().starts_with(end_marker) {
                        break;
                    }
                    self.bump();
                }
                self.token_from(TokenKind::CommentText, start, line, column)
            }
        }
    }

    /// Next token while inside a `"""` text block
    fn text_block_token(&mut self) -> Token<'a> {
        let (start, line, column) = (self.pos, self.line, self.column);

        match self.peek() {
            None => {
                self.in_text_block = false;
                self.finished = true;
                let mut token = self.token_from(TokenKind::TextBlockClose, start, line, column);
                token.unterminated = true;
                token
            }
            Some('\n') => {
                self.bump();
                self.token_from(TokenKind::Newline, start, line, column)
            }
            Some(_) if self.rest().starts_with(TEXT_BLOCK_QUOTE) => {
                self.bump_str(TEXT_BLOCK_QUOTE);
                self.in_text_block = false;
                self.token_from(TokenKind::TextBlockClose, start, line, column)
            }
            Some(_) => {
                while let Some(c) = self.peek() {
                    if c == '\n' || self.rest().starts_with(TEXT_BLOCK_QUOTE) {
                        break;
                    }
                    self.bump();
                    // An escaped quote never closes the block
                    if c == '\\' && self.peek().is_some_and(|next| next != '\n') {
                        self.bump();
                    }
                }
                self.token_from(TokenKind::TextBlockText, start, line, column)
            }
        }
    }

    /// Quoted literal; strings never span lines
    fn string_literal(&mut self, quote: char) -> Token<'a> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();

        let mut terminated = false;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
            if c == '\\' {
                if self.peek().is_some_and(|next| next != '\n') {
                    self.bump();
                }
            } else if c == quote {
                terminated = true;
                break;
            }
        }

        let mut token = self.token_from(TokenKind::StringLiteral, start, line, column);
        token.unterminated = !terminated;
        token
    }

    /// Comment marker starting at the current position, longest match first
    fn comment_start(&self) -> Option<TokenKind> {
        let rest = self.rest();
        let block = self.rules.block_comment_start.as_str();
        let line = self.rules.line_comment.as_str();

        let mut candidates = [
            (block, TokenKind::BlockCommentOpen),
            (line, TokenKind::LineComment),
        ];
        candidates.sort_by_key(|(marker, _)| std::cmp::Reverse(marker.len()));
        candidates
            .into_iter()
            .find(|(marker, _)| rest.starts_with(marker))
            .map(|(_, kind)| kind)
    }
}

const TEXT_BLOCK_QUOTE: &str = "\"\"\"";

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.in_block_comment {
            return Some(self.block_comment_token());
        }
        if self.in_text_block {
            return Some(self.text_block_token());
        }

        // Horizontal whitespace (including '\r') separates tokens
        self.bump_while(|c| c != '\n' && c.is_whitespace());

        let (start, line, column) = (self.pos, self.line, self.column);
        let Some(c) = self.peek() else {
            self.finished = true;
            return None;
        };

        let kind = if c == '\n' {
            self.bump();
            TokenKind::Newline
        } else if let Some(comment) = self.comment_start() {
            if comment == TokenKind::BlockCommentOpen {
                let rules = self.rules;
                self.bump_str(&rules.block_comment_start);
                self.in_block_comment = true;
            } else {
                self.bump_while(|c| c != '\n');
            }
            comment
        } else if self.rest().starts_with(TEXT_BLOCK_QUOTE) {
            self.bump_str(TEXT_BLOCK_QUOTE);
            self.in_text_block = true;
            TokenKind::TextBlockOpen
        } else if c == '"' || c == '\'' {
            return Some(self.string_literal(c));
        } else if let Some(kind) = self.rules.open_bracket(c) {
            self.bump();
            TokenKind::OpenBracket(kind)
        } else if let Some(kind) = self.rules.close_bracket(c) {
            self.bump();
            TokenKind::CloseBracket(kind)
        } else if c == ',' {
            self.bump();
            TokenKind::Comma
        } else if c == ';' {
            self.bump();
            TokenKind::Semicolon
        } else if c == self.rules.annotation_marker {
            self.bump();
            TokenKind::AnnotationMarker
        } else if is_ident_start(c) {
            self.bump_while(is_ident_continue);
            if self.rules.is_clause_keyword(&self.source[start..self.pos]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            }
        } else if c.is_ascii_digit() {
            self.bump_while(|c| c.is_alphanumeric() || c == '.' || c == '_');
            TokenKind::Other
        } else {
            self.bump();
            TokenKind::Other
        };

        Some(self.token_from(kind, start, line, column))
    }
}
