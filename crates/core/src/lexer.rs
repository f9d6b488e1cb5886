use crate::error::TranslateError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Lowercase identifier naming a fact, placeholder or variable
    Ident(String),
    /// String literal: a capitalised word or a quoted string (escapes resolved)
    Str(String),
    /// Integer literal
    Int(i64),

    // Declaration keywords
    Fact,
    Placeholder,
    Predicate,
    Invariant,
    Event,
    Act,
    Duty,
    Extend,
    // Field keywords
    StringType, // String
    IntType,    // Int
    IdentifiedBy,
    DerivedFrom,
    HoldsWhen,
    ConditionedBy,
    RelatedTo,
    SyncsWith,
    Creates,
    Terminates,
    Obfuscates,
    ViolatedWhen,
    Actor,
    Recipient,
    Holder,
    Claimant,
    For,
    When,
    // Expression keywords
    Foreach,
    Exists,
    Count,
    Sum,
    Min,
    Max,
    Holds,
    True,
    False,

    // Operators
    OrOr,   // ||
    AndAnd, // &&
    EqEq,   // ==
    Neq,    // !=
    Gte,    // >=
    Lte,    // <=
    Gt,
    Lt,
    Bang, // ! (also `Not` / `NOT`)
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    // Statement and query markers that are not also operators
    Tilde,         // ~
    Question,      // ?
    QuestionMinus, // ?-
    // Punctuation
    DotDot,
    Dot,
    Comma,
    Colon,
    LParen,
    RParen,
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}

/// Tail word and token of the two-word keyword opened by `head`, if any.
fn multi_word(head: &str) -> Option<(&'static str, Token)> {
    let entry = match head {
        "Identified" => ("by", Token::IdentifiedBy),
        "Derived" => ("from", Token::DerivedFrom),
        "Holds" => ("when", Token::HoldsWhen),
        "Conditioned" => ("by", Token::ConditionedBy),
        "Related" => ("to", Token::RelatedTo),
        "Syncs" => ("with", Token::SyncsWith),
        "Violated" => ("when", Token::ViolatedWhen),
        _ => return None,
    };
    Some(entry)
}

fn keyword(word: &str) -> Option<Token> {
    let tok = match word {
        "Fact" => Token::Fact,
        "Placeholder" => Token::Placeholder,
        "Predicate" => Token::Predicate,
        "Invariant" => Token::Invariant,
        "Event" => Token::Event,
        "Act" => Token::Act,
        "Duty" => Token::Duty,
        "Extend" => Token::Extend,
        "String" => Token::StringType,
        "Int" => Token::IntType,
        "Creates" => Token::Creates,
        "Terminates" => Token::Terminates,
        "Obfuscates" => Token::Obfuscates,
        "Actor" => Token::Actor,
        "Recipient" => Token::Recipient,
        "Holder" => Token::Holder,
        "Claimant" => Token::Claimant,
        "For" => Token::For,
        "When" => Token::When,
        "Foreach" => Token::Foreach,
        "Exists" => Token::Exists,
        "Count" => Token::Count,
        "Sum" => Token::Sum,
        "Min" => Token::Min,
        "Max" => Token::Max,
        "Holds" => Token::Holds,
        "True" => Token::True,
        "False" => Token::False,
        "Not" | "NOT" => Token::Bang,
        _ => return None,
    };
    Some(tok)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub fn lex(src: &str, filename: &str) -> Result<Vec<Spanned>, TranslateError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;
    let mut col: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];

        // Line comments: `//`, `#` and `;`
        if (c == '/' && chars.get(pos + 1) == Some(&'/')) || c == '#' || c == ';' {
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
                col += 1;
            }
            continue;
        }

        // Whitespace
        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            pos += 1;
            continue;
        }

        let tok_line = line;
        let tok_col = col;

        // Quoted string literal
        if c == '"' {
            pos += 1;
            col += 1;
            let mut s = String::new();
            loop {
                let Some(&sc) = chars.get(pos) else {
                    return Err(TranslateError::lex(
                        filename,
                        tok_line,
                        tok_col,
                        "unterminated string literal",
                    ));
                };
                if sc == '\n' {
                    return Err(TranslateError::lex(
                        filename,
                        tok_line,
                        tok_col,
                        "unterminated string literal",
                    ));
                }
                pos += 1;
                col += 1;
                if sc == '"' {
                    break;
                }
                if sc == '\\' {
                    let Some(&esc) = chars.get(pos) else {
                        return Err(TranslateError::lex(
                            filename,
                            tok_line,
                            tok_col,
                            "unterminated escape in string",
                        ));
                    };
                    match esc {
                        '"' => s.push('"'),
                        '\\' => s.push('\\'),
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                    pos += 1;
                    col += 1;
                    continue;
                }
                s.push(sc);
            }
            tokens.push(Spanned {
                token: Token::Str(s),
                line: tok_line,
                column: tok_col,
            });
            continue;
        }

        // Integer literal
        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            let s: String = chars[start..pos].iter().collect();
            col += (pos - start) as u32;
            let n: i64 = s.parse().map_err(|_| {
                TranslateError::lex(
                    filename,
                    tok_line,
                    tok_col,
                    format!("invalid integer '{}'", s),
                )
            })?;
            tokens.push(Spanned {
                token: Token::Int(n),
                line: tok_line,
                column: tok_col,
            });
            continue;
        }

        // Identifier: lowercase head, then lowercase letters and `_`.
        // A `-` joins two words (`fact-name`) but never ends one, so
        // `a - 1` and `a-1` stay subtractions.
        if c.is_ascii_lowercase() {
            let start = pos;
            pos += 1;
            while pos < chars.len() {
                let nc = chars[pos];
                let joins = nc == '-'
                    && chars
                        .get(pos + 1)
                        .is_some_and(|n| n.is_ascii_lowercase() || *n == '_');
                if nc.is_ascii_lowercase() || nc == '_' || joins {
                    pos += 1;
                } else {
                    break;
                }
            }
            let word: String = chars[start..pos].iter().collect();
            col += (pos - start) as u32;
            tokens.push(Spanned {
                token: Token::Ident(word),
                line: tok_line,
                column: tok_col,
            });
            continue;
        }

        // Capitalised word: keyword, multi-word keyword or string literal
        if c.is_ascii_uppercase() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_alphanumeric() {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            col += (pos - start) as u32;

            if let Some((tail, tok)) = multi_word(&word) {
                let mut look = pos;
                while look < chars.len() && (chars[look] == ' ' || chars[look] == '\t') {
                    look += 1;
                }
                let tail_chars: Vec<char> = tail.chars().collect();
                let tail_end = look + tail_chars.len();
                let tail_matches = look > pos
                    && chars.get(look..tail_end) == Some(tail_chars.as_slice())
                    && !chars.get(tail_end).is_some_and(|n| is_word_char(*n));
                if tail_matches {
                    col += (tail_end - pos) as u32;
                    pos = tail_end;
                    tokens.push(Spanned {
                        token: tok,
                        line: tok_line,
                        column: tok_col,
                    });
                    continue;
                }
            }

            let token = keyword(&word).unwrap_or(Token::Str(word));
            tokens.push(Spanned {
                token,
                line: tok_line,
                column: tok_col,
            });
            continue;
        }

        // Operators and punctuation, longest match first
        let next = chars.get(pos + 1).copied();
        let (token, len) = match (c, next) {
            ('|', Some('|')) => (Token::OrOr, 2),
            ('&', Some('&')) => (Token::AndAnd, 2),
            ('=', Some('=')) => (Token::EqEq, 2),
            ('!', Some('=')) => (Token::Neq, 2),
            ('>', Some('=')) => (Token::Gte, 2),
            ('<', Some('=')) => (Token::Lte, 2),
            ('.', Some('.')) => (Token::DotDot, 2),
            ('?', Some('-')) => (Token::QuestionMinus, 2),
            ('>', _) => (Token::Gt, 1),
            ('<', _) => (Token::Lt, 1),
            ('!', _) => (Token::Bang, 1),
            ('?', _) => (Token::Question, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('~', _) => (Token::Tilde, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('.', _) => (Token::Dot, 1),
            (',', _) => (Token::Comma, 1),
            (':', _) => (Token::Colon, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            _ => {
                return Err(TranslateError::lex(
                    filename,
                    tok_line,
                    tok_col,
                    format!("unexpected character '{}'", c),
                ))
            }
        };
        pos += len;
        col += len as u32;
        tokens.push(Spanned {
            token,
            line: tok_line,
            column: tok_col,
        });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
        column: col,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src, "test.eflint")
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn multi_word_keywords_take_priority() {
        assert_eq!(
            kinds("Fact owns Identified by person * thing"),
            vec![
                Token::Fact,
                Token::Ident("owns".into()),
                Token::IdentifiedBy,
                Token::Ident("person".into()),
                Token::Star,
                Token::Ident("thing".into()),
                Token::Eof,
            ]
        );
        assert_eq!(
            kinds("Holds when Holds(x)"),
            vec![
                Token::HoldsWhen,
                Token::Holds,
                Token::LParen,
                Token::Ident("x".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn head_word_without_tail_is_a_literal() {
        assert_eq!(
            kinds("Identified byx"),
            vec![Token::Str("Identified".into()), Token::Ident("byx".into()), Token::Eof]
        );
    }

    #[test]
    fn capitalised_words_are_classified_whole() {
        assert_eq!(
            kinds("Factory Alice String"),
            vec![
                Token::Str("Factory".into()),
                Token::Str("Alice".into()),
                Token::StringType,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn identifiers_join_with_hyphens() {
        assert_eq!(
            kinds("fact-name a-1 b - c"),
            vec![
                Token::Ident("fact-name".into()),
                Token::Ident("a".into()),
                Token::Minus,
                Token::Int(1),
                Token::Ident("b".into()),
                Token::Minus,
                Token::Ident("c".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_elided() {
        assert_eq!(
            kinds("// header\n+x. # trailing\n; semicolon style\n?x."),
            vec![
                Token::Plus,
                Token::Ident("x".into()),
                Token::Dot,
                Token::Question,
                Token::Ident("x".into()),
                Token::Dot,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn symbols_prefer_longest_match() {
        assert_eq!(
            kinds("?- ? .. . != ! Not >= >"),
            vec![
                Token::QuestionMinus,
                Token::Question,
                Token::DotDot,
                Token::Dot,
                Token::Neq,
                Token::Bang,
                Token::Bang,
                Token::Gte,
                Token::Gt,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn quoted_strings_resolve_escapes() {
        assert_eq!(
            kinds(r#""Alice \"A\" Smith""#),
            vec![Token::Str("Alice \"A\" Smith".into()), Token::Eof]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let toks = lex("Fact a\n  Identified by Int", "t").unwrap();
        assert_eq!((toks[0].line, toks[0].column), (1, 1));
        assert_eq!((toks[1].line, toks[1].column), (1, 6));
        assert_eq!((toks[2].line, toks[2].column), (2, 3));
        assert_eq!((toks[3].line, toks[3].column), (2, 17));
    }

    #[test]
    fn unknown_character_is_fatal() {
        let err = lex("Fact a\n  $", "bad.eflint").unwrap_err();
        assert_eq!(err.stage, Stage::Lexical);
        assert_eq!((err.line, err.column), (2, 3));
        assert!(err.message.contains('$'));
        assert!(lex("a & b", "t").is_err());
    }

    #[test]
    fn unterminated_string_is_fatal() {
        assert!(lex("\"open", "t").is_err());
    }

    #[test]
    fn integer_overflow_is_fatal() {
        assert!(lex("99999999999999999999", "t").is_err());
    }
}
