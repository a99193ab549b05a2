use crate::toolkit::cursor::LexerState;
use crate::toolkit::error::{TokenSyntaxErrorKind, TokenizerError};
use crate::toolkit::source::CharSource;

/// The set of `\` escape sequences allowed in a given construct.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum EscapeMode {
    /// IRI references: only `\u`, `\U` and `\>`.
    Uri,
    /// Legacy IRI references: `\u`, `\U`, `\\`, `\n`, `\r` and `\t`.
    PermissiveUri,
    /// `"` quoted literals: `\"` but not `\'`.
    QuotedLiterals,
    /// `'` quoted literals: `\'` but not `\"`.
    QuotedLiteralsAlternate,
    /// Literals allowing both `\"` and `\'`.
    QuotedLiteralsBoth,
    /// Names: only `\u` and `\U`.
    QName,
}

impl EscapeMode {
    fn is_literal(self) -> bool {
        matches!(
            self,
            Self::QuotedLiterals | Self::QuotedLiteralsAlternate | Self::QuotedLiteralsBoth
        )
    }
}

// [26]   UCHAR  ::=  '\u' HEX HEX HEX HEX | '\U' HEX HEX HEX HEX HEX HEX HEX HEX
// [159s] ECHAR  ::=  '\' [tbnrf"'\]
/// Decodes the escape sequence starting at the `\` the state is positioned on and appends the decoded character to the token text.
pub fn handle_escapes<S: CharSource>(
    state: &mut LexerState<S>,
    mode: EscapeMode,
) -> Result<(), TokenizerError> {
    let backslash = state.skip()?;
    if backslash != '\\' {
        return Err(state.unexpected_character(backslash, "'\\' starting an escape sequence"));
    }
    let Some(c) = state.peek()? else {
        return Err(state.unexpected_end_of_input("an escape sequence"));
    };
    let decoded = match c {
        '\\' if mode.is_literal() || mode == EscapeMode::PermissiveUri => '\\',
        '"' if matches!(
            mode,
            EscapeMode::QuotedLiterals | EscapeMode::QuotedLiteralsBoth
        ) =>
        {
            '"'
        }
        '\'' if matches!(
            mode,
            EscapeMode::QuotedLiteralsAlternate | EscapeMode::QuotedLiteralsBoth
        ) =>
        {
            '\''
        }
        '>' if mode == EscapeMode::Uri => '>',
        'n' if mode.is_literal() || mode == EscapeMode::PermissiveUri => '\n',
        'r' if mode.is_literal() || mode == EscapeMode::PermissiveUri => '\r',
        't' if mode.is_literal() || mode == EscapeMode::PermissiveUri => '\t',
        'b' if mode.is_literal() => '\x08',
        'f' if mode.is_literal() => '\x0C',
        'u' => {
            state.skip()?;
            let c = read_hex_char(state, 4, 'u', "four")?;
            state.push_output(c);
            return Ok(());
        }
        'U' => {
            state.skip()?;
            let c = read_hex_char(state, 8, 'U', "eight")?;
            state.push_output(c);
            return Ok(());
        }
        c => {
            return Err(state.error(
                TokenSyntaxErrorKind::InvalidEscape,
                format!(
                    "Invalid escape sequence encountered, \\{} is not a valid escape sequence in the current token",
                    c.escape_default()
                ),
            ));
        }
    };
    state.skip()?;
    state.push_output(decoded);
    Ok(())
}

fn read_hex_char<S: CharSource>(
    state: &mut LexerState<S>,
    len: usize,
    escape_char: char,
    count: &str,
) -> Result<char, TokenizerError> {
    let mut codepoint = 0;
    let mut digits = String::with_capacity(len);
    for _ in 0..len {
        let digit = state.peek()?.and_then(|c| c.to_digit(16).map(|d| (c, d)));
        let Some((c, d)) = digit else {
            return Err(state.error(
                TokenSyntaxErrorKind::InvalidEscape,
                format!(
                    "Unexpected character while parsing the \\{escape_char}{digits} escape sequence, the \\{escape_char} escape must be followed by {count} hex digits"
                ),
            ));
        };
        state.skip()?;
        digits.push(c);
        codepoint = codepoint * 16 + d;
    }
    char::from_u32(codepoint).ok_or_else(|| {
        state.error(
            TokenSyntaxErrorKind::InvalidEscape,
            format!("The escape sequence \\{escape_char}{digits} is not a valid Unicode code point"),
        )
    })
}

/// Characters that may be `\` escaped in the local part of a prefixed name.
// [173s] PN_LOCAL_ESC  ::=  '\' ('_' | '~' | '.' | '-' | '!' | '$' | '&' | "'" | '(' | ')' | '*' | '+' | ',' | ';' | '=' | '/' | '?' | '#' | '@' | '%')
pub fn is_local_name_escapable(c: char) -> bool {
    matches!(
        c,
        '_' | '~'
            | '.'
            | '-'
            | '!'
            | '$'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | '+'
            | ','
            | ';'
            | '='
            | '/'
            | '?'
            | '#'
            | '@'
            | '%'
    )
}

// [170s] PLX      ::=  PERCENT | PN_LOCAL_ESC
// [171s] PERCENT  ::=  '%' HEX HEX
/// Validates a `\` or `%` escape inside the local part of a prefixed name and appends it to the token text undecoded.
pub fn handle_complex_local_name_escapes<S: CharSource>(
    state: &mut LexerState<S>,
) -> Result<(), TokenizerError> {
    match state.peek()? {
        Some('\\') => {
            state.consume()?;
            match state.peek()? {
                Some(c) if is_local_name_escapable(c) => {
                    state.consume()?;
                    Ok(())
                }
                Some('u' | 'U') => Err(state.error(
                    TokenSyntaxErrorKind::InvalidEscape,
                    "Illegal unicode escape (\\u or \\U) in local name portion of a prefixed name",
                )),
                Some(c) => Err(state.error(
                    TokenSyntaxErrorKind::InvalidEscape,
                    format!(
                        "Invalid escape sequence \\{} in the local name portion of a prefixed name",
                        c.escape_default()
                    ),
                )),
                None => Err(state.unexpected_end_of_input("an escape sequence")),
            }
        }
        Some('%') => {
            state.consume()?;
            for _ in 0..2 {
                if !state.peek()?.is_some_and(|c| c.is_ascii_hexdigit()) {
                    return Err(state.error(
                        TokenSyntaxErrorKind::InvalidEscape,
                        "Encountered a % character in a local name but the required two hex digits were not present after it",
                    ));
                }
                state.consume()?;
            }
            Ok(())
        }
        Some(c) => Err(state.unexpected_character(c, "'\\' or '%' starting an escape sequence")),
        None => Err(state.unexpected_end_of_input("an escape sequence")),
    }
}

/// Removes the `\` of escaped punctuation in a prefixed name local part.
pub fn unescape_local_name(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if is_local_name_escapable(next) {
                    output.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        output.push(c);
    }
    output
}
