//! Streaming tokenizer for indentation-sensitive templates.
//!
//! The scanner is a small state machine driven by the current char and, at a
//! line start, by the prefix of the remaining input. Every state consumes
//! just enough input to emit one or two tokens, so [`Tokenizer`] can be
//! pulled lazily by the tree builder.

mod cursor;

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use cursor::{Cursor, is_blank, is_newline};
use text_size::{TextLen as _, TextRange, TextSize};

pub const LEFT_DELIM: &str = "{{";
pub const RIGHT_DELIM: &str = "}}";

const COMMENT: &str = "//";
const DOCTYPE_SHORT: &str = "!!!";
const DOCTYPE_LONG: &str = "doctype";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    Text,
    NewLine,
    Tag,
    Attr,
    IndentSpace,
    IndentTab,
    Doctype,
    Comment,
    /// A line holding only spaces and tabs.
    Blank,
    Id,
    Class,
    EndOfInput,
    Error,
}

impl TokenKind {
    fn name(self) -> &'static str {
        match self {
            TokenKind::Error => "error",
            TokenKind::Text => "text",
            TokenKind::NewLine => "endl",
            TokenKind::Tag => "tag",
            TokenKind::Attr => "attr",
            TokenKind::IndentSpace => "indentSpace",
            TokenKind::IndentTab => "indentTab",
            TokenKind::Doctype => "doctype",
            TokenKind::Comment => "comment",
            TokenKind::Blank => "blank",
            TokenKind::Id => "id",
            TokenKind::Class => "class",
            TokenKind::EndOfInput => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexeme and where it came from.
///
/// For [`TokenKind::Error`] the `text` is the error message and `range`
/// covers the offending input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

impl Token<'_> {
    /// No token follows a terminal one.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput | TokenKind::Error)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => f.write_str("EOF"),
            TokenKind::Error => f.write_str(self.text),
            _ if self.text.chars().nth(10).is_some() => {
                let head: String = self.text.chars().take(10).collect();
                write!(f, "{head:?}...")
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Tag,
    Id,
    Class,
    Text,
    Comment,
    Doctype,
    Attr,
    Indent,
    Blank,
    NewLine,
    Eof,
    Done,
}

pub struct Tokenizer<'a> {
    name: &'a str,
    text: &'a str,
    left_delim: &'a str,
    right_delim: &'a str,
    cursor: Cursor<'a>,
    state: State,
    pending: VecDeque<Token<'a>>,
}

/// Starts scanning `text`. Empty delimiters fall back to `{{` and `}}`.
pub fn lex<'a>(
    name: &'a str,
    text: &'a str,
    left_delim: &'a str,
    right_delim: &'a str,
) -> Tokenizer<'a> {
    Tokenizer::new(name, text, left_delim, right_delim)
}

impl<'a> Tokenizer<'a> {
    pub fn new(name: &'a str, text: &'a str, left_delim: &'a str, right_delim: &'a str) -> Self {
        Self {
            name,
            text,
            left_delim: if left_delim.is_empty() { LEFT_DELIM } else { left_delim },
            right_delim: if right_delim.is_empty() { RIGHT_DELIM } else { right_delim },
            cursor: Cursor::new(text),
            state: State::Tag,
            pending: VecDeque::with_capacity(2),
        }
    }

    /// Action delimiters. They are reserved and never matched by the grammar.
    pub fn delimiters(&self) -> (&'a str, &'a str) {
        (self.left_delim, self.right_delim)
    }

    fn offset(&self) -> TextSize {
        self.text.text_len() - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn emit(&mut self, kind: TokenKind) {
        let range = self.range();
        let text = self.text;
        self.pending.push_back(Token { kind, text: &text[range], range });
        self.cursor.reset_pos_within_token();
    }

    fn emit_pending(&mut self, kind: TokenKind) {
        if self.cursor.has_pending() {
            self.emit(kind);
        }
    }

    fn ignore(&mut self) {
        self.cursor.reset_pos_within_token();
    }

    /// Consumes one separator char without making it part of any token.
    fn skip(&mut self) {
        self.cursor.advance();
        self.ignore();
    }

    fn error(&mut self, message: &'static str) -> State {
        let range = self.range();
        log::debug!("{}: {message} at {range:?}", self.name);
        self.pending.push_back(Token { kind: TokenKind::Error, text: message, range });
        self.cursor.reset_pos_within_token();
        State::Done
    }

    fn step(&mut self, state: State) -> State {
        match state {
            State::Tag => self.lex_tag(),
            State::Id => self.lex_name(TokenKind::Id),
            State::Class => self.lex_name(TokenKind::Class),
            State::Text => self.lex_line(TokenKind::Text),
            State::Comment => self.lex_line(TokenKind::Comment),
            State::Doctype => self.lex_doctype(),
            State::Attr => self.lex_attr(),
            State::Indent => self.lex_indent(),
            State::Blank => self.lex_blank(),
            State::NewLine => self.lex_newline(),
            State::Eof => {
                self.emit(TokenKind::EndOfInput);
                State::Done
            }
            State::Done => State::Done,
        }
    }

    /// Entered at the first non-blank char of every line.
    fn lex_tag(&mut self) -> State {
        match self.cursor.peek() {
            '.' => {
                self.skip();
                return State::Class;
            }
            '#' => {
                self.skip();
                return State::Id;
            }
            '|' => {
                self.skip();
                return State::Text;
            }
            ' ' | '\t' => return self.line_start(),
            '\r' | '\n' => return State::NewLine,
            _ => {}
        }

        let rest = self.cursor.as_str();
        if rest.starts_with(COMMENT) {
            return State::Comment;
        }
        if doctype_marker(rest).is_some() {
            return State::Doctype;
        }

        self.lex_name(TokenKind::Tag)
    }

    /// Scans a tag, id or class name up to the next delimiter.
    fn lex_name(&mut self, kind: TokenKind) -> State {
        loop {
            if let Some(next) = self.end_of_name(kind) {
                return next;
            }
            self.cursor.advance();
        }
    }

    fn end_of_name(&mut self, kind: TokenKind) -> Option<State> {
        if self.cursor.is_eof() {
            self.emit_pending(kind);
            return Some(State::Eof);
        }

        let next = match self.cursor.peek() {
            ' ' => State::Text,
            '(' => State::Attr,
            '.' => State::Class,
            '#' => State::Id,
            '\r' | '\n' => {
                self.emit_pending(kind);
                return Some(State::NewLine);
            }
            _ => return None,
        };

        self.emit_pending(kind);
        self.skip();
        Some(next)
    }

    fn lex_line(&mut self, kind: TokenKind) -> State {
        self.cursor.advance_while(|c| !is_newline(c));
        self.emit_pending(kind);
        if self.cursor.is_eof() { State::Eof } else { State::NewLine }
    }

    fn lex_doctype(&mut self) -> State {
        let rest = self.cursor.as_str();
        if !rest.contains('\n') {
            self.cursor.advance_while(|_| true);
            return self.error("unclosed doctype");
        }

        let marker = doctype_marker(rest).unwrap_or(DOCTYPE_LONG);
        self.cursor.advance_by(marker);
        self.cursor.advance_while(is_blank);
        self.ignore();

        self.cursor.advance_while(|c| !is_newline(c));
        self.emit(TokenKind::Doctype);
        State::NewLine
    }

    /// Scans one attribute up to `,` or `)`. A quote opens a quoted value
    /// only at the start of the attribute or right after `=`; elsewhere it
    /// is an ordinary char.
    fn lex_attr(&mut self) -> State {
        let mut quote = None;
        let mut prev = None;

        loop {
            if self.cursor.is_eof() {
                return self.error("unclosed attribute list");
            }

            match (self.cursor.peek(), quote) {
                (c, Some(open)) if c == open => quote = None,
                (_, Some(_)) => {}
                (c @ ('"' | '\''), None) if matches!(prev, None | Some('=')) => quote = Some(c),
                (')', None) => {
                    self.emit_pending(TokenKind::Attr);
                    self.skip();
                    return self.after_attrs();
                }
                (',', None) => {
                    self.emit_pending(TokenKind::Attr);
                    self.skip();
                    self.cursor.advance_while(|c| is_blank(c) || is_newline(c));
                    self.ignore();
                    return State::Attr;
                }
                _ => {}
            }

            prev = Some(self.cursor.advance());
        }
    }

    fn after_attrs(&mut self) -> State {
        if self.cursor.is_eof() {
            return State::Eof;
        }

        match self.cursor.peek() {
            ' ' => {
                self.skip();
                State::Text
            }
            '\r' | '\n' => State::NewLine,
            _ => State::Text,
        }
    }

    fn lex_indent(&mut self) -> State {
        let kind = match self.cursor.peek() {
            ' ' => TokenKind::IndentSpace,
            '\t' => TokenKind::IndentTab,
            _ => return State::Tag,
        };

        self.cursor.advance();
        self.emit(kind);
        State::Indent
    }

    fn lex_blank(&mut self) -> State {
        self.cursor.advance_while(is_blank);
        self.emit(TokenKind::Blank);
        if self.cursor.is_eof() { State::Eof } else { State::NewLine }
    }

    fn lex_newline(&mut self) -> State {
        if is_newline(self.cursor.peek()) {
            self.cursor.advance();
            self.emit(TokenKind::NewLine);
            return State::NewLine;
        }

        self.line_start()
    }

    fn line_start(&self) -> State {
        if self.cursor.at_blank_line() { State::Blank } else { State::Indent }
    }
}

/// The doctype marker `rest` starts with. The marker must be followed by a
/// blank, a newline or the end of input, so `doctypes` stays a tag.
fn doctype_marker(rest: &str) -> Option<&'static str> {
    [DOCTYPE_SHORT, DOCTYPE_LONG].into_iter().find(|marker| {
        rest.strip_prefix(marker)
            .is_some_and(|after| after.chars().next().is_none_or(|c| is_blank(c) || is_newline(c)))
    })
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }

            if self.state == State::Done {
                return None;
            }

            self.state = self.step(self.state);
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn tokens(text: &str) -> Vec<(TokenKind, &str)> {
        lex("test", text, "", "").map(|token| (token.kind, token.text)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokens(""), vec![(EndOfInput, "")]);
    }

    #[test]
    fn test_tag_with_text() {
        assert_eq!(tokens("h1 Hello"), vec![(Tag, "h1"), (Text, "Hello"), (EndOfInput, "")]);
    }

    #[test]
    fn test_only_first_space_separates_text() {
        assert_eq!(tokens("p  indented"), vec![(Tag, "p"), (Text, " indented"), (EndOfInput, "")]);
    }

    #[test]
    fn test_class_and_id_shorthand() {
        assert_eq!(
            tokens("h1.dd#fd.ee"),
            vec![(Tag, "h1"), (Class, "dd"), (Id, "fd"), (Class, "ee"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_line_starting_with_sigil() {
        assert_eq!(tokens(".test"), vec![(Class, "test"), (EndOfInput, "")]);
        assert_eq!(
            tokens("#container.class"),
            vec![(Id, "container"), (Class, "class"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_attribute_list() {
        assert_eq!(
            tokens(r#"html(lang="en")"#),
            vec![(Tag, "html"), (Attr, r#"lang="en""#), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_attribute_per_comma() {
        assert_eq!(
            tokens("div#main(data-x=1,data-y=2, data-z=3) body"),
            vec![
                (Tag, "div"),
                (Id, "main"),
                (Attr, "data-x=1"),
                (Attr, "data-y=2"),
                (Attr, "data-z=3"),
                (Text, "body"),
                (EndOfInput, ""),
            ]
        );
    }

    #[test]
    fn test_quoted_attribute_value() {
        assert_eq!(
            tokens(r#"a(onclick="f(1, 2)")"#),
            vec![(Tag, "a"), (Attr, r#"onclick="f(1, 2)""#), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_quote_inside_unquoted_value() {
        assert_eq!(
            tokens("p(title=it's) hi"),
            vec![(Tag, "p"), (Attr, "title=it's"), (Text, "hi"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_attribute_list_across_lines() {
        assert_eq!(
            tokens("a(href=x,\n  title=y) z"),
            vec![(Tag, "a"), (Attr, "href=x"), (Attr, "title=y"), (Text, "z"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_unclosed_attribute_list() {
        let mut tokenizer = lex("test", "a(href", "", "");

        assert_eq!(tokenizer.next().map(|t| t.kind), Some(Tag));
        let error = tokenizer.next().expect("error token");
        assert_eq!(error.kind, Error);
        assert_eq!(error.text, "unclosed attribute list");
        assert_eq!(error.range, TextRange::new(2.into(), 6.into()));
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_indentation_tokens() {
        assert_eq!(
            tokens("ul\n  li\n\tli"),
            vec![
                (Tag, "ul"),
                (NewLine, "\n"),
                (IndentSpace, " "),
                (IndentSpace, " "),
                (Tag, "li"),
                (NewLine, "\n"),
                (IndentTab, "\t"),
                (Tag, "li"),
                (EndOfInput, ""),
            ]
        );
    }

    #[test]
    fn test_newline_per_char() {
        assert_eq!(
            tokens("p\r\n\nb"),
            vec![(Tag, "p"), (NewLine, "\r"), (NewLine, "\n"), (NewLine, "\n"), (Tag, "b"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(
            tokens("p\n   \nspan"),
            vec![
                (Tag, "p"),
                (NewLine, "\n"),
                (Blank, "   "),
                (NewLine, "\n"),
                (Tag, "span"),
                (EndOfInput, ""),
            ]
        );
    }

    #[test]
    fn test_literal_text_line() {
        assert_eq!(
            tokens("  | if (foo) {"),
            vec![(IndentSpace, " "), (IndentSpace, " "), (Text, " if (foo) {"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_comment_and_doctype() {
        assert_eq!(
            tokens("// test.jade\ndoctype 5\n!!! xml\n"),
            vec![
                (Comment, "// test.jade"),
                (NewLine, "\n"),
                (Doctype, "5"),
                (NewLine, "\n"),
                (Doctype, "xml"),
                (NewLine, "\n"),
                (EndOfInput, ""),
            ]
        );
    }

    #[test]
    fn test_doctype_without_payload() {
        assert_eq!(tokens("doctype\n"), vec![(Doctype, ""), (NewLine, "\n"), (EndOfInput, "")]);
    }

    #[test]
    fn test_tag_starting_with_doctype() {
        assert_eq!(
            tokens("doctypes\n!!!x"),
            vec![(Tag, "doctypes"), (NewLine, "\n"), (Tag, "!!!x"), (EndOfInput, "")]
        );
    }

    #[test]
    fn test_unclosed_doctype() {
        let mut tokenizer = lex("test", "doctype 5", "", "");

        let error = tokenizer.next().expect("error token");
        assert_eq!(error.kind, Error);
        assert_eq!(error.text, "unclosed doctype");
        assert_eq!(error.range, TextRange::new(0.into(), 9.into()));
        assert_eq!(tokenizer.next(), None);
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_nothing_after_end_of_input() {
        let mut tokenizer = lex("test", "p", "", "");

        assert_eq!(tokenizer.next().map(|t| t.kind), Some(Tag));
        assert!(tokenizer.next().is_some_and(|t| t.is_terminal()));
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_ranges_match_lexemes() {
        let text = "html(lang=\"en\")\n  body.main\n    | hi there\n";

        for token in lex("test", text, "", "") {
            assert_eq!(token.text, &text[token.range], "{:?}", token.kind);
        }
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(lex("test", "", "", "").delimiters(), ("{{", "}}"));
        assert_eq!(lex("test", "", "<%", "%>").delimiters(), ("<%", "%>"));
    }

    #[test]
    fn test_display() {
        let mut tokenizer = lex("test", "h1 Jade - node template engine", "", "");

        assert_eq!(tokenizer.next().map(|t| t.to_string()).as_deref(), Some("\"h1\""));
        assert_eq!(
            tokenizer.next().map(|t| t.to_string()).as_deref(),
            Some("\"Jade - nod\"...")
        );
        assert_eq!(tokenizer.next().map(|t| t.to_string()).as_deref(), Some("EOF"));
        assert_eq!(IndentSpace.to_string(), "indentSpace");
        assert_eq!(NewLine.to_string(), "endl");
    }
}
