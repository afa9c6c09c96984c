//!
//! Multiple-Choice Parser Module
//!
//! Parses the `.mc` answer sheets students submit. The format is a sequence of
//! question/answer pairs:
//!
//! ```text
//! // comments run to the end of the line
//! 1 a
//! 2 bc
//! ```
//!
//! Tokens are `INT` (`[0-9]+`), `LETTER` (one ASCII letter), whitespace and line
//! comments (both skipped). The grammar is `sheet : qa+ EOF ; qa : INT LETTER+ ;`.
//! Whitespace between tokens carries no meaning, so `2 b c` equals `2 bc`.
//! A comment on the last line needs no trailing newline.
//!
//! # Error Handling
//!
//! Parse failure is an expected outcome, not a fault. The parser recovers from
//! every error, records a [`SyntaxError`] and continues, so the answer check can
//! still inspect whatever questions were recognised.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::traits::parser::Parser;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<comment>//[^\r\n]*)|(?P<ws>[ \t\r\n]+)|(?P<int>[0-9]+)|(?P<letter>[A-Za-z])|(?P<other>.)",
    )
    .expect("token pattern is valid")
});

/// A recognised `INT LETTER+` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    /// Question number as written by the student.
    pub number: u32,
    /// Answer letters in the order given, case preserved.
    pub letters: Vec<char>,
    /// 1-based line of the question number.
    pub line: usize,
}

/// All pairs recognised in a sheet, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    pub entries: Vec<QuestionAnswer>,
}

/// A syntax error with ANTLR-style position: 1-based line, 0-based column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{} {}", self.line, self.column, self.message)
    }
}

/// Result of a recovering parse: the partial sheet plus every error found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSheet {
    pub sheet: AnswerSheet,
    pub errors: Vec<SyntaxError>,
}

impl ParsedSheet {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Int(u32),
    Letter(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    line: usize,
    column: usize,
}

pub struct MultipleChoiceParser;

impl MultipleChoiceParser {
    /// Parse `source`, never giving up on the first error.
    pub fn parse_recovering(&self, source: &str) -> ParsedSheet {
        let mut errors = Vec::new();
        let (tokens, eof) = tokenize(source, &mut errors);

        let mut entries = Vec::new();
        let mut iter = tokens.into_iter().peekable();
        while let Some(token) = iter.next() {
            match token.kind {
                TokenKind::Int(number) => {
                    let mut letters = Vec::new();
                    while let Some(TokenKind::Letter(c)) = iter.peek().map(|t| t.kind.clone()) {
                        letters.push(c);
                        iter.next();
                    }
                    if letters.is_empty() {
                        let (line, column, found) = match iter.peek() {
                            Some(next) => (next.line, next.column, next.text.clone()),
                            None => (eof.0, eof.1, "<EOF>".to_string()),
                        };
                        errors.push(SyntaxError {
                            line,
                            column,
                            message: format!("missing LETTER at '{found}'"),
                        });
                    }
                    entries.push(QuestionAnswer {
                        number,
                        letters,
                        line: token.line,
                    });
                }
                TokenKind::Letter(_) => errors.push(SyntaxError {
                    line: token.line,
                    column: token.column,
                    message: format!("extraneous input '{}' expecting INT", token.text),
                }),
            }
        }

        if entries.is_empty() {
            errors.push(SyntaxError {
                line: eof.0,
                column: eof.1,
                message: "missing INT at '<EOF>'".to_string(),
            });
        }

        ParsedSheet {
            sheet: AnswerSheet { entries },
            errors,
        }
    }
}

impl<'a> Parser<&'a str, AnswerSheet> for MultipleChoiceParser {
    type Error = Vec<SyntaxError>;

    /// Strict parse: any syntax error rejects the whole sheet.
    fn parse(&self, input: &'a str) -> Result<AnswerSheet, Self::Error> {
        let parsed = self.parse_recovering(input);
        if parsed.is_valid() {
            Ok(parsed.sheet)
        } else {
            Err(parsed.errors)
        }
    }
}

/// Split `source` into tokens, dropping whitespace and comments.
///
/// Returns the tokens and the position just past the last character.
fn tokenize(source: &str, errors: &mut Vec<SyntaxError>) -> (Vec<Token>, (usize, usize)) {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 0;

    for caps in TOKEN.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let text = whole.as_str();

        if caps.name("int").is_some() {
            match text.parse::<u32>() {
                Ok(n) => tokens.push(Token {
                    kind: TokenKind::Int(n),
                    text: text.to_string(),
                    line,
                    column,
                }),
                Err(_) => errors.push(SyntaxError {
                    line,
                    column,
                    message: format!("question number '{text}' is too large"),
                }),
            }
        } else if caps.name("letter").is_some() {
            if let Some(c) = text.chars().next() {
                tokens.push(Token {
                    kind: TokenKind::Letter(c),
                    text: text.to_string(),
                    line,
                    column,
                });
            }
        } else if caps.name("other").is_some() {
            errors.push(SyntaxError {
                line,
                column,
                message: format!("token recognition error at: '{text}'"),
            });
        }

        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
    }

    (tokens, (line, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qa(number: u32, letters: &str, line: usize) -> QuestionAnswer {
        QuestionAnswer {
            number,
            letters: letters.chars().collect(),
            line,
        }
    }

    #[test]
    fn parses_simple_sheet() {
        let sheet = MultipleChoiceParser.parse("1 a\n2 bc\n").unwrap();
        assert_eq!(sheet.entries, vec![qa(1, "a", 1), qa(2, "bc", 2)]);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let src = "// antwoorden\n\n1 A // eerste\n  2   b C\n// slot zonder newline";
        let sheet = MultipleChoiceParser.parse(src).unwrap();
        assert_eq!(sheet.entries, vec![qa(1, "A", 3), qa(2, "bC", 4)]);
    }

    #[test]
    fn trailing_comment_without_newline_is_accepted() {
        let sheet = MultipleChoiceParser.parse("1 a // laatste regel").unwrap();
        assert_eq!(sheet.entries, vec![qa(1, "a", 1)]);

        let sheet = MultipleChoiceParser.parse("1 a\n2 b\n//").unwrap();
        assert_eq!(sheet.entries, vec![qa(1, "a", 1), qa(2, "b", 2)]);
    }

    #[test]
    fn whitespace_between_tokens_is_insignificant() {
        let spaced = MultipleChoiceParser.parse("1 a b").unwrap();
        let packed = MultipleChoiceParser.parse("1ab").unwrap();
        assert_eq!(spaced.entries[0].letters, packed.entries[0].letters);
    }

    #[test]
    fn empty_input_is_a_syntax_error() {
        let errors = MultipleChoiceParser.parse("").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "line 1:0 missing INT at '<EOF>'");

        assert!(MultipleChoiceParser.parse("  // enkel commentaar\n").is_err());
    }

    #[test]
    fn question_without_answers_is_kept_with_an_error() {
        let parsed = MultipleChoiceParser.parse_recovering("1\n2 b\n");
        assert_eq!(parsed.sheet.entries, vec![qa(1, "", 1), qa(2, "b", 2)]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "missing LETTER at '2'");
        assert_eq!((parsed.errors[0].line, parsed.errors[0].column), (2, 0));
    }

    #[test]
    fn unknown_characters_are_reported_and_skipped() {
        let parsed = MultipleChoiceParser.parse_recovering("1 a\n2 b-c\n");
        assert_eq!(parsed.sheet.entries, vec![qa(1, "a", 1), qa(2, "bc", 2)]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].to_string(),
            "line 2:3 token recognition error at: '-'"
        );
    }

    #[test]
    fn leading_letter_is_extraneous() {
        let parsed = MultipleChoiceParser.parse_recovering("a 1 b");
        assert_eq!(parsed.sheet.entries, vec![qa(1, "b", 1)]);
        assert_eq!(parsed.errors[0].message, "extraneous input 'a' expecting INT");
    }

    #[test]
    fn oversized_number_is_rejected() {
        let parsed = MultipleChoiceParser.parse_recovering("99999999999 a");
        assert!(!parsed.is_valid());
    }
}
