/// `Classifier` - Groups tokens into physical lines and assigns roles
///
/// A small set of role-transition rules, not a grammar:
/// - annotation marker, dotted name and the argument group that directly
///   follows carry the annotation role, so they never start a statement
/// - comment tokens carry the comment role and never touch structure
/// - tokens inside generic type arguments (`List<? extends T>`) carry the
///   type-argument role, so their keywords and commas stay inert
/// - everything else is code
use crate::error::LexError;
use crate::parser::lexer::Tokenizer;
use crate::parser::token::{BracketKind, Token, TokenKind};
use crate::rules::RuleTable;

/// What a token means for indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Code,
    Annotation,
    /// Inside `<...>` after a type name
    TypeArgument,
    Comment,
}

/// Summary of a whole physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// No tokens at all
    Blank,
    /// Line starts inside a block comment
    CommentBody,
    /// Line starts inside a `"""` text block
    TextBlockBody,
    /// Only comments
    Comment,
    /// Only annotations (and comments)
    Annotation,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedToken<'a> {
    pub token: Token<'a>,
    pub role: TokenRole,
}

/// Tokens of one physical line (newline excluded) with their roles
#[derive(Debug, Clone)]
pub struct ClassifiedLine<'a> {
    /// 1-based line number
    pub line: usize,
    pub tokens: Vec<ClassifiedToken<'a>>,
    pub starts_in_comment: bool,
    pub starts_in_text_block: bool,
    pub role: LineRole,
}

impl<'a> ClassifiedLine<'a> {
    /// First token that is not part of a comment
    #[must_use]
    pub fn leading(&self) -> Option<&ClassifiedToken<'a>> {
        self.tokens.iter().find(|t| t.role != TokenRole::Comment)
    }
}

/// Annotation recognition state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnnotationState {
    None,
    /// Just saw the marker (or a `.` inside a dotted name)
    ExpectName,
    AfterName,
    /// Inside the argument group, with its paren depth
    InArgs(usize),
}

/// Iterator adapter turning a token stream into classified lines
pub struct Classifier<'a, I: Iterator<Item = Token<'a>>> {
    tokens: I,
    line: usize,
    annotation: AnnotationState,
    /// Open `<` of generic type arguments
    type_depth: usize,
    previous_code: Option<TokenKind>,
    /// Position of the open block comment, if any
    comment_opener: Option<(usize, usize)>,
    /// Position of the open text block, if any
    text_block_opener: Option<(usize, usize)>,
    lex_errors: Vec<LexError>,
    done: bool,
}

impl<'a, I: Iterator<Item = Token<'a>>> Classifier<'a, I> {
    #[must_use]
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            line: 1,
            annotation: AnnotationState::None,
            type_depth: 0,
            previous_code: None,
            comment_opener: None,
            text_block_opener: None,
            lex_errors: Vec::new(),
            done: false,
        }
    }

    /// Lexical problems seen so far
    #[must_use]
    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    /// Assign the role of one code-region token
    fn role_of(&mut self, token: &Token<'a>) -> TokenRole {
        match self.annotation_role(token) {
            TokenRole::Code => self.type_argument_role(token),
            role => role,
        }
    }

    /// A `<` right after a name opens type arguments; parens, braces and `;`
    /// reset the depth so a stray comparison cannot leak past its statement
    fn type_argument_role(&mut self, token: &Token<'a>) -> TokenRole {
        let after_name = self.previous_code == Some(TokenKind::Identifier);
        self.previous_code = Some(token.kind);

        match token.kind {
            TokenKind::Other if token.text == "<" && (after_name || self.type_depth > 0) => {
                self.type_depth += 1;
                if self.type_depth == 1 {
                    TokenRole::Code
                } else {
                    TokenRole::TypeArgument
                }
            }
            TokenKind::Other if token.text == ">" && self.type_depth > 0 => {
                self.type_depth -= 1;
                TokenRole::TypeArgument
            }
            TokenKind::Semicolon
            | TokenKind::OpenBracket(BracketKind::Paren | BracketKind::Curly)
            | TokenKind::CloseBracket(BracketKind::Paren | BracketKind::Curly) => {
                self.type_depth = 0;
                TokenRole::Code
            }
            _ if self.type_depth > 0 => TokenRole::TypeArgument,
            _ => TokenRole::Code,
        }
    }

    /// Annotation role of a token, advancing the annotation state
    fn annotation_role(&mut self, token: &Token<'a>) -> TokenRole {
        use AnnotationState as A;

        if token.kind.is_comment() {
            return TokenRole::Comment;
        }

        match (self.annotation, token.kind) {
            (_, TokenKind::AnnotationMarker) if !matches!(self.annotation, A::InArgs(_)) => {
                self.annotation = A::ExpectName;
                TokenRole::Annotation
            }
            (A::ExpectName, TokenKind::Identifier | TokenKind::Keyword) => {
                self.annotation = A::AfterName;
                TokenRole::Annotation
            }
            (A::AfterName, TokenKind::Other) if token.text == "." => {
                self.annotation = A::ExpectName;
                TokenRole::Annotation
            }
            (A::AfterName, TokenKind::OpenBracket(BracketKind::Paren)) => {
                self.annotation = A::InArgs(1);
                TokenRole::Annotation
            }
            (A::InArgs(depth), TokenKind::OpenBracket(BracketKind::Paren)) => {
                self.annotation = A::InArgs(depth + 1);
                TokenRole::Annotation
            }
            (A::InArgs(depth), TokenKind::CloseBracket(BracketKind::Paren)) => {
                self.annotation = if depth > 1 {
                    A::InArgs(depth - 1)
                } else {
                    A::None
                };
                TokenRole::Annotation
            }
            (A::InArgs(_), TokenKind::Semicolon) => {
                // A statement terminator cannot be inside annotation arguments
                self.annotation = A::None;
                TokenRole::Code
            }
            (A::InArgs(_), _) => TokenRole::Annotation,
            _ => {
                self.annotation = A::None;
                TokenRole::Code
            }
        }
    }

    fn record_lex_error(&mut self, token: &Token<'a>) {
        match token.kind {
            TokenKind::BlockCommentOpen => {
                self.comment_opener = Some((token.line, token.column));
            }
            TokenKind::BlockCommentClose => {
                if token.unterminated {
                    let (line, column) = self
                        .comment_opener
                        .unwrap_or((token.line, token.column));
                    self.lex_errors
                        .push(LexError::UnterminatedBlockComment { line, column });
                }
                self.comment_opener = None;
            }
            TokenKind::TextBlockOpen => {
                self.text_block_opener = Some((token.line, token.column));
            }
            TokenKind::TextBlockClose => {
                if token.unterminated {
                    let (line, column) = self
                        .text_block_opener
                        .unwrap_or((token.line, token.column));
                    self.lex_errors
                        .push(LexError::UnterminatedTextBlock { line, column });
                }
                self.text_block_opener = None;
            }
            TokenKind::StringLiteral if token.unterminated => {
                self.lex_errors.push(LexError::UnterminatedString {
                    line: token.line,
                    column: token.column,
                });
            }
            _ => {}
        }
    }
}

fn line_role(
    starts_in_comment: bool,
    starts_in_text_block: bool,
    tokens: &[ClassifiedToken<'_>],
) -> LineRole {
    if starts_in_comment {
        return LineRole::CommentBody;
    }
    if starts_in_text_block {
        return LineRole::TextBlockBody;
    }
    if tokens.is_empty() {
        return LineRole::Blank;
    }
    let mut structural = tokens.iter().filter(|t| t.role != TokenRole::Comment);
    match structural.next() {
        None => LineRole::Comment,
        Some(first) => {
            if first.role == TokenRole::Annotation
                && structural.all(|t| t.role == TokenRole::Annotation)
            {
                LineRole::Annotation
            } else {
                LineRole::Code
            }
        }
    }
}

impl<'a, I: Iterator<Item = Token<'a>>> Iterator for Classifier<'a, I> {
    type Item = ClassifiedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let starts_in_comment = self.comment_opener.is_some();
        let starts_in_text_block = self.text_block_opener.is_some();
        let mut tokens = Vec::new();
        let mut saw_newline = false;

        while let Some(token) = self.tokens.next() {
            self.record_lex_error(&token);
            if token.kind == TokenKind::Newline {
                // Annotation names never continue on the next line
                if matches!(
                    self.annotation,
                    AnnotationState::ExpectName | AnnotationState::AfterName
                ) {
                    self.annotation = AnnotationState::None;
                }
                saw_newline = true;
                break;
            }
            let role = self.role_of(&token);
            tokens.push(ClassifiedToken { token, role });
        }

        if !saw_newline {
            self.done = true;
            // Nothing but the synthesized closer of an unterminated comment or text block
            if tokens.iter().all(|t| t.token.text.is_empty()) {
                return None;
            }
        }

        let line = ClassifiedLine {
            line: self.line,
            role: line_role(starts_in_comment, starts_in_text_block, &tokens),
            tokens,
            starts_in_comment,
            starts_in_text_block,
        };
        self.line += 1;
        Some(line)
    }
}

/// All classified lines of a text plus the lexical problems found on the way
#[derive(Debug, Clone)]
pub struct ClassifiedSource<'a> {
    pub lines: Vec<ClassifiedLine<'a>>,
    pub lex_errors: Vec<LexError>,
}

/// Tokenize and classify a whole text
#[must_use]
pub fn classify<'a>(source: &'a str, rules: &'a RuleTable) -> ClassifiedSource<'a> {
    let mut classifier = Classifier::new(Tokenizer::new(source, rules));
    let lines: Vec<_> = classifier.by_ref().collect();
    ClassifiedSource {
        lines,
        lex_errors: classifier.lex_errors,
    }
}

/// Whether a comment ends at the end of its line or at a closing marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// Lines covered by one comment (both ends inclusive, 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub kind: CommentKind,
    /// Block comment still open at end of input
    pub unterminated: bool,
}

impl CommentSpan {
    /// `line` lies strictly between the opener and closer lines
    #[must_use]
    pub fn encloses(&self, line: usize) -> bool {
        self.kind == CommentKind::Block && line > self.start_line && line < self.end_line
    }
}

/// Collect the comment spans of classified lines, in source order
#[must_use]
pub fn comment_spans(lines: &[ClassifiedLine<'_>]) -> Vec<CommentSpan> {
    let mut spans = Vec::new();
    let mut open_block: Option<usize> = None;
    let mut last_line = 0;

    for classified in lines.iter().flat_map(|line| &line.tokens) {
        let token = &classified.token;
        last_line = token.line;
        match token.kind {
            TokenKind::LineComment => spans.push(CommentSpan {
                start_line: token.line,
                end_line: token.line,
                kind: CommentKind::Line,
                unterminated: false,
            }),
            TokenKind::BlockCommentOpen => open_block = Some(token.line),
            TokenKind::BlockCommentClose => {
                if let Some(start_line) = open_block.take() {
                    spans.push(CommentSpan {
                        start_line,
                        end_line: token.line,
                        kind: CommentKind::Block,
                        unterminated: token.unterminated,
                    });
                }
            }
            _ => {}
        }
    }

    // A closer synthesized after a final newline is not part of any line
    if let Some(start_line) = open_block {
        spans.push(CommentSpan {
            start_line,
            end_line: last_line.max(start_line),
            kind: CommentKind::Block,
            unterminated: true,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(source: &str) -> Vec<LineRole> {
        let rules = RuleTable::default();
        classify(source, &rules)
            .lines
            .iter()
            .map(|l| l.role)
            .collect()
    }

    #[test]
    fn test_line_roles() {
        let source = "@Annotation\n@Complex(a, b)\nclass A\n\n// c\n/* x\n * y\n */\n";
        assert_eq!(
            roles(source),
            vec![
                LineRole::Annotation,
                LineRole::Annotation,
                LineRole::Code,
                LineRole::Blank,
                LineRole::Comment,
                LineRole::Comment,
                LineRole::CommentBody,
                LineRole::CommentBody,
            ]
        );
    }

    #[test]
    fn test_annotation_then_declaration_on_same_line() {
        let rules = RuleTable::default();
        let source = classify("@Override public void run()", &rules);
        let line = &source.lines[0];
        assert_eq!(line.role, LineRole::Code);
        assert_eq!(line.tokens[0].role, TokenRole::Annotation);
        assert_eq!(line.tokens[1].role, TokenRole::Annotation);
        assert_eq!(line.tokens[2].role, TokenRole::Code);
    }

    #[test]
    fn test_dotted_annotation_name() {
        let rules = RuleTable::default();
        let source = classify("@java.lang.Deprecated int x;", &rules);
        let line = &source.lines[0];
        let code_start = line
            .tokens
            .iter()
            .position(|t| t.role == TokenRole::Code)
            .unwrap();
        assert_eq!(line.tokens[code_start].token.text, "int");
    }

    #[test]
    fn test_wrapped_annotation_arguments() {
        let rules = RuleTable::default();
        let source = classify("@Complex(a,\n    b)\nclass A", &rules);
        assert_eq!(source.lines[0].role, LineRole::Annotation);
        assert_eq!(source.lines[1].role, LineRole::Annotation);
        assert_eq!(source.lines[2].role, LineRole::Code);
    }

    #[test]
    fn test_annotation_does_not_continue_past_newline() {
        let rules = RuleTable::default();
        let source = classify("@Annotation\n(x)", &rules);
        assert_eq!(source.lines[1].role, LineRole::Code);
    }

    #[test]
    fn test_leading_skips_comments() {
        let rules = RuleTable::default();
        let source = classify("/* c */ } x", &rules);
        let leading = source.lines[0].leading().unwrap();
        assert_eq!(leading.token.kind, TokenKind::CloseBracket(BracketKind::Curly));
    }

    #[test]
    fn test_line_numbers_and_trailing_line() {
        let rules = RuleTable::default();
        let source = classify("a\n\nb", &rules);
        let numbers: Vec<usize> = source.lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        // A final newline does not create an extra line
        let source = classify("a\n", &rules);
        assert_eq!(source.lines.len(), 1);
    }

    #[test]
    fn test_lex_errors() {
        let rules = RuleTable::default();
        let source = classify("s = \"open;\nclass A {\n/* never closed\n", &rules);
        assert_eq!(
            source.lex_errors,
            vec![
                LexError::UnterminatedString { line: 1, column: 4 },
                LexError::UnterminatedBlockComment { line: 3, column: 0 },
            ]
        );
    }

    #[test]
    fn test_comment_spans() {
        let rules = RuleTable::default();
        let source = "a; // x\n/* one\n * two\n */ b;\n/* open\nc\n";
        let classified = classify(source, &rules);
        let spans = comment_spans(&classified.lines);
        assert_eq!(
            spans,
            vec![
                CommentSpan {
                    start_line: 1,
                    end_line: 1,
                    kind: CommentKind::Line,
                    unterminated: false,
                },
                CommentSpan {
                    start_line: 2,
                    end_line: 4,
                    kind: CommentKind::Block,
                    unterminated: false,
                },
                CommentSpan {
                    start_line: 5,
                    end_line: 6,
                    kind: CommentKind::Block,
                    unterminated: true,
                },
            ]
        );
        assert!(spans[1].encloses(3));
        assert!(!spans[1].encloses(4));
        assert!(!spans[0].encloses(1));
    }

    #[test]
    fn test_generic_bound_is_type_argument() {
        let rules = RuleTable::default();
        let source = classify("List<? extends Foo<Bar>, Baz> list = a < b;", &rules);
        let roles: Vec<(&str, TokenRole)> = source.lines[0]
            .tokens
            .iter()
            .map(|t| (t.token.text, t.role))
            .collect();
        assert!(roles.contains(&("extends", TokenRole::TypeArgument)));
        assert!(roles.contains(&(",", TokenRole::TypeArgument)));
        assert!(roles.contains(&("list", TokenRole::Code)));
        assert_eq!(roles.last(), Some(&(";", TokenRole::Code)));
    }

    #[test]
    fn test_comparison_does_not_leak_past_parens() {
        let rules = RuleTable::default();
        let source = classify("if (a < b) {
class C extends D {", &rules);
        let extends = source.lines[1]
            .tokens
            .iter()
            .find(|t| t.token.text == "extends")
            .unwrap();
        assert_eq!(extends.role, TokenRole::Code);
    }
}
