/// Token types produced by the tokenizer
use std::fmt;

/// The three bracket families the engine nests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    Paren,
    Square,
    Curly,
}

impl BracketKind {
    /// Opening delimiter as written in source
    #[must_use]
    pub fn open_str(self) -> &'static str {
        match self {
            BracketKind::Paren => "(",
            BracketKind::Square => "[",
            BracketKind::Curly => "{",
        }
    }

    /// Closing delimiter as written in source
    #[must_use]
    pub fn close_str(self) -> &'static str {
        match self {
            BracketKind::Paren => ")",
            BracketKind::Square => "]",
            BracketKind::Curly => "}",
        }
    }

    /// Map a configured `(open, close)` pair to its kind
    #[must_use]
    pub fn from_pair(open: &str, close: &str) -> Option<Self> {
        [BracketKind::Paren, BracketKind::Square, BracketKind::Curly]
            .into_iter()
            .find(|kind| kind.open_str() == open && kind.close_str() == close)
    }
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// A configured clause keyword (`implements`, `extends`, `throws`, ...)
    Keyword,
    OpenBracket(BracketKind),
    CloseBracket(BracketKind),
    Comma,
    Semicolon,
    AnnotationMarker,
    LineComment,
    BlockCommentOpen,
    BlockCommentClose,
    /// Text inside a block comment, at most one segment per physical line
    CommentText,
    StringLiteral,
    /// `"""` opening a multi-line text block
    TextBlockOpen,
    /// Text block content, at most one segment per physical line
    TextBlockText,
    /// `"""` closing a text block; zero-width and `unterminated` at end of input
    TextBlockClose,
    Newline,
    Other,
}

impl TokenKind {
    /// Comment tokens never take part in structure
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment
                | TokenKind::BlockCommentOpen
                | TokenKind::BlockCommentClose
                | TokenKind::CommentText
        )
    }
}

/// A classified slice of the source text
///
/// `line` is 1-based; `column` is the 0-based character offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
    /// Set on a string or block comment that reached end of line/input unclosed
    pub unterminated: bool,
}

impl<'a> Token<'a> {
    #[must_use]
    pub fn new(kind: TokenKind, text: &'a str, line: usize, column: usize) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            unterminated: false,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) at {}:{}", self.kind, self.text, self.line, self.column + 1)
    }
}
