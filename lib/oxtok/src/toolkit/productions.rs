//! Productions shared by several tokenizers.

use crate::token::{Token, TokenKind};
use crate::toolkit::cursor::LexerState;
use crate::toolkit::error::{TokenSyntaxErrorKind, TokenizerError};
use crate::toolkit::escape::{EscapeMode, handle_escapes};
use crate::toolkit::source::CharSource;
use crate::toolkit::terms::{is_numeric, is_valid_lang_spec};
use oxilangtag::LanguageTag;
use oxiri::IriRef;

/// How raw white spaces inside `<>` are handled.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum UriWhiteSpace {
    Forbidden,
    Discarded,
}

/// How triple quoted literals are handled.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum LongLiterals {
    /// `""` is always an empty literal.
    Forbidden,
    /// A quote directly following the closing triple quote is an error.
    Strict,
    /// Quotes directly following the closing triple quote belong to the literal.
    Greedy,
}

/// Consumes a single character and emits it as a token of the given kind.
pub fn punctuation<S: CharSource>(
    state: &mut LexerState<S>,
    kind: TokenKind,
) -> Result<Token, TokenizerError> {
    state.consume()?;
    Ok(state.emit_value(kind))
}

/// `#` comment up to the end of the line.
///
/// The new line is consumed but is not part of the token. The last token kind is left unchanged.
pub fn comment<S: CharSource>(state: &mut LexerState<S>) -> Result<Token, TokenizerError> {
    while !matches!(state.peek()?, None | Some('\n' | '\r')) {
        state.consume()?;
    }
    let value = state.take_value();
    let token = state.token(TokenKind::Comment, value);
    state.consume_new_line(false, true)?;
    Ok(token)
}

// [18]  IRIREF  ::=  '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
/// IRI reference starting at `<`, emitted without its `<>`.
pub fn uri<S: CharSource>(
    state: &mut LexerState<S>,
    mode: EscapeMode,
    white_space: UriWhiteSpace,
) -> Result<Token, TokenizerError> {
    state.consume()?;
    uri_body(state, mode, white_space)
}

/// Rest of an IRI reference once its `<` has been consumed.
pub fn uri_body<S: CharSource>(
    state: &mut LexerState<S>,
    mode: EscapeMode,
    white_space: UriWhiteSpace,
) -> Result<Token, TokenizerError> {
    loop {
        match state.peek()? {
            None => return Err(state.unexpected_end_of_input("a URI")),
            Some('>') => {
                state.consume()?;
                return Ok(state.emit_trimmed(TokenKind::Uri, 1, 1));
            }
            Some('\\') => handle_escapes(state, mode)?,
            Some(c) if c.is_whitespace() => match white_space {
                UriWhiteSpace::Discarded => state.skip_white_space()?,
                UriWhiteSpace::Forbidden if matches!(c, '\n' | '\r') => {
                    return Err(state.unexpected_new_line("a URI"));
                }
                UriWhiteSpace::Forbidden => {
                    return Err(state.error(
                        TokenSyntaxErrorKind::UnexpectedCharacter,
                        "Illegal white space in URI",
                    ));
                }
            },
            Some(_) => {
                state.consume()?;
            }
        }
    }
}

/// Fails if the value of the given URI token is not a valid IRI reference.
pub fn validate_iri<S: CharSource>(
    state: &mut LexerState<S>,
    token: Token,
) -> Result<Token, TokenizerError> {
    if let Err(e) = IriRef::parse(token.value()) {
        return Err(state.token_error(
            TokenSyntaxErrorKind::InvalidLiteral,
            format!("Invalid IRI <{}>: {e}", token.value()),
        ));
    }
    Ok(token)
}

// [22]  STRING_LITERAL_QUOTE              ::=  '"' ([^#x22#x5C#xA#xD] | ECHAR | UCHAR)* '"'
// [23]  STRING_LITERAL_SINGLE_QUOTE       ::=  "'" ([^#x27#x5C#xA#xD] | ECHAR | UCHAR)* "'"
// [24]  STRING_LITERAL_LONG_SINGLE_QUOTE  ::=  "'''" (("'" | "''")? ([^'\] | ECHAR | UCHAR))* "'''"
// [25]  STRING_LITERAL_LONG_QUOTE         ::=  '"""' (('"' | '""')? ([^"\] | ECHAR | UCHAR))* '"""'
/// Quoted literal starting at `quote`, emitted without its quotes and with its escapes decoded.
pub fn quoted_literal<S: CharSource>(
    state: &mut LexerState<S>,
    quote: char,
    mode: EscapeMode,
    long: LongLiterals,
) -> Result<Token, TokenizerError> {
    state.consume()?;
    if state.peek_is(quote)? {
        state.consume()?;
        if long == LongLiterals::Forbidden || !state.peek_is(quote)? {
            return Ok(state.emit_trimmed(TokenKind::Literal, 1, 1));
        }
        state.consume()?;
        return long_literal(state, quote, mode, long);
    }
    loop {
        match state.peek()? {
            None => return Err(state.unexpected_end_of_input("a literal")),
            Some('\\') => handle_escapes(state, mode)?,
            Some('\n' | '\r') => {
                return Err(state.unexpected_new_line(
                    "a quoted literal, use the triple quoted long literal syntax for multi-line literals",
                ));
            }
            Some(c) if c == quote => {
                state.consume()?;
                return Ok(state.emit_trimmed(TokenKind::Literal, 1, 1));
            }
            Some(_) => {
                state.consume()?;
            }
        }
    }
}

fn long_literal<S: CharSource>(
    state: &mut LexerState<S>,
    quote: char,
    mode: EscapeMode,
    long: LongLiterals,
) -> Result<Token, TokenizerError> {
    loop {
        match state.peek()? {
            None => return Err(state.unexpected_end_of_input("a long literal")),
            Some('\\') => handle_escapes(state, mode)?,
            Some('\n' | '\r') => state.consume_new_line(true, false)?,
            Some(c) if c == quote => {
                state.consume()?;
                if state.peek_is(quote)? {
                    state.consume()?;
                    if state.peek_is(quote)? {
                        state.consume()?;
                        if state.peek_is(quote)? {
                            if long == LongLiterals::Strict {
                                return Err(state.error(
                                    TokenSyntaxErrorKind::InvalidLiteral,
                                    format!(
                                        "Too many {quote} characters encountered at the end of a long literal, ensure that you escape quotes at the end of the literal"
                                    ),
                                ));
                            }
                            while state.peek_is(quote)? {
                                state.consume()?;
                            }
                        }
                        return Ok(state.emit_trimmed(TokenKind::LongLiteral, 3, 3));
                    }
                }
            }
            Some(_) => {
                state.consume()?;
            }
        }
    }
}

// [144s]  LANGTAG  ::=  '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
/// Language tag after its `@` has been skipped. `strict` also checks BCP 47 well-formedness.
pub fn lang_spec<S: CharSource>(
    state: &mut LexerState<S>,
    strict: bool,
) -> Result<Token, TokenizerError> {
    while state
        .peek()?
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        state.consume()?;
    }
    if state.is_empty() {
        return match state.peek()? {
            Some(c) => Err(state.unexpected_character(c, "a language specifier")),
            None => Err(state.unexpected_end_of_input("a language specifier")),
        };
    }
    emit_lang_spec(state, strict)
}

/// Validates the accumulated token text as a language tag and emits it.
pub fn emit_lang_spec<S: CharSource>(
    state: &mut LexerState<S>,
    strict: bool,
) -> Result<Token, TokenizerError> {
    if !is_valid_lang_spec(state.value()) {
        let message = format!("'{}' is not a valid language specifier", state.value());
        return Err(state.token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
    }
    if strict {
        if let Err(e) = LanguageTag::parse(state.value()) {
            let message = format!("'{}' is not a valid language tag: {e}", state.value());
            return Err(state.token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
    }
    Ok(state.emit_value(TokenKind::LangSpec))
}

// [19]  INTEGER  ::=  [+-]? [0-9]+
// [20]  DECIMAL  ::=  [+-]? [0-9]* '.' [0-9]+
// [21]  DOUBLE   ::=  [+-]? ([0-9]+ '.' [0-9]* EXPONENT | '.' [0-9]+ EXPONENT | [0-9]+ EXPONENT)
/// Numeric literal. The token text may already hold a leading sign or dot.
///
/// With `trailing_dot` a final `.` is given back to the input so that `1.` reads as `1` followed by a dot.
pub fn numeric<S: CharSource>(
    state: &mut LexerState<S>,
    trailing_dot: bool,
) -> Result<Token, TokenizerError> {
    let mut dot_occurred = state.value().ends_with('.');
    let mut sign_occurred = state.value().starts_with(['+', '-']);
    let mut exp_occurred = false;
    while let Some(c) = state.peek()? {
        match c {
            '0'..='9' => (),
            '.' => {
                if dot_occurred || exp_occurred {
                    break;
                }
                dot_occurred = true;
            }
            '+' | '-' if state.is_empty() => sign_occurred = true,
            '+' | '-' => {
                if sign_occurred {
                    return Err(state.error(
                        TokenSyntaxErrorKind::InvalidLiteral,
                        format!("Unexpected additional sign '{c}' in a numeric literal"),
                    ));
                }
                if !exp_occurred {
                    return Err(state.error(
                        TokenSyntaxErrorKind::InvalidLiteral,
                        format!(
                            "Unexpected sign '{c}', a sign may only occur at the start of a numeric literal or directly after its exponent marker"
                        ),
                    ));
                }
                if !state.value().ends_with(['e', 'E']) {
                    return Err(state.error(
                        TokenSyntaxErrorKind::InvalidLiteral,
                        format!(
                            "Unexpected sign '{c}', the sign of an exponent must directly follow the exponent marker"
                        ),
                    ));
                }
                sign_occurred = true;
            }
            'e' | 'E' => {
                if exp_occurred {
                    return Err(state.error(
                        TokenSyntaxErrorKind::InvalidLiteral,
                        "Unexpected second exponent marker in a numeric literal",
                    ));
                }
                exp_occurred = true;
                sign_occurred = false;
            }
            _ => break,
        }
        state.consume()?;
    }
    if trailing_dot && state.len() > 1 && state.value().ends_with('.') {
        state.backtrack()?;
    }
    if !is_numeric(state.value()) {
        let message = format!(
            "The numeric literal {} is not valid in {}",
            state.value(),
            state.format()
        );
        return Err(state.token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
    }
    Ok(state.emit_value(TokenKind::PlainLiteral))
}
