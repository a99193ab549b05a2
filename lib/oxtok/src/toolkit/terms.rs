//! Lexical checks of the terms produced by the tokenizers.
#![allow(clippy::range_plus_one)]

use crate::toolkit::escape::is_local_name_escapable;

// [157s]  PN_CHARS_BASE  ::=  [A-Z] | [a-z] | [#x00C0-#x00D6] | [#x00D8-#x00F6] | [#x00F8-#x02FF] | [#x0370-#x037D] | [#x037F-#x1FFF] | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF] | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
pub fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
    'A'..='Z'
    | 'a'..='z'
    | '\u{00C0}'..='\u{00D6}'
    | '\u{00D8}'..='\u{00F6}'
    | '\u{00F8}'..='\u{02FF}'
    | '\u{0370}'..='\u{037D}'
    | '\u{037F}'..='\u{1FFF}'
    | '\u{200C}'..='\u{200D}'
    | '\u{2070}'..='\u{218F}'
    | '\u{2C00}'..='\u{2FEF}'
    | '\u{3001}'..='\u{D7FF}'
    | '\u{F900}'..='\u{FDCF}'
    | '\u{FDF0}'..='\u{FFFD}'
    | '\u{10000}'..='\u{EFFFF}')
}

// [158s]  PN_CHARS_U  ::=  PN_CHARS_BASE | '_'
pub fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

// [160s]  PN_CHARS  ::=  PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
pub fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || matches!(c,
    '-' | '0'..='9' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

// Legacy Turtle and N3 names
// nameStartChar  ::=  [A-Z] | "_" | [a-z] | [#x00C0-#x00D6] | ...
// nameChar       ::=  nameStartChar | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
fn is_legacy_name_start_char(c: char) -> bool {
    is_pn_chars_u(c)
}

fn is_legacy_name_char(c: char) -> bool {
    is_pn_chars(c)
}

// [19]  INTEGER  ::=  [+-]? [0-9]+
pub fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// [20]  DECIMAL  ::=  [+-]? [0-9]* '.' [0-9]+
// The legacy `[0-9]+ '.' [0-9]*` form is also accepted.
pub fn is_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let Some((before, after)) = unsigned.split_once('.') else {
        return is_integer(unsigned) && !unsigned.starts_with(['+', '-']);
    };
    let before_ok = before.bytes().all(|b| b.is_ascii_digit());
    let after_ok = after.bytes().all(|b| b.is_ascii_digit());
    before_ok && after_ok && (!before.is_empty() || !after.is_empty())
}

// [21]  DOUBLE    ::=  [+-]? ([0-9]+ '.' [0-9]* EXPONENT | '.' [0-9]+ EXPONENT | [0-9]+ EXPONENT)
// [154s] EXPONENT ::=  [eE] [+-]? [0-9]+
pub fn is_double(value: &str) -> bool {
    let Some((mantissa, exponent)) = value.split_once(['e', 'E']) else {
        return false;
    };
    is_decimal(mantissa) && is_integer(exponent)
}

pub fn is_numeric(value: &str) -> bool {
    is_integer(value) || is_decimal(value) || is_double(value)
}

pub fn is_boolean(value: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        matches!(value, "true" | "false")
    } else {
        value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
    }
}

/// An unquoted literal: a boolean or a number.
pub fn is_plain_literal(value: &str, case_sensitive_booleans: bool) -> bool {
    is_boolean(value, case_sensitive_booleans) || is_numeric(value)
}

// [167s]  PN_PREFIX  ::=  PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?
pub fn is_pn_prefix(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_pn_chars_base(first)
        && chars.clone().all(|c| is_pn_chars(c) || c == '.')
        && chars.last().is_none_or(is_pn_chars)
}

fn is_legacy_prefix(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c != '_' && is_legacy_name_start_char(c))
        && chars.all(is_legacy_name_char)
}

/// A prefix declaration name with its trailing `:`.
pub fn is_valid_prefix(value: &str, legacy: bool) -> bool {
    let Some(name) = value.strip_suffix(':') else {
        return false;
    };
    name.is_empty() || if legacy { is_legacy_prefix(name) } else { is_pn_prefix(name) }
}

// [168s]  PN_LOCAL  ::=  (PN_CHARS_U | ':' | [0-9] | PLX) ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
/// The local part of a prefixed name. `with_plx` enables `:` and the `\` and `%` escapes of SPARQL 1.1 and Turtle 1.1.
pub fn is_pn_local(value: &str, with_plx: bool) -> bool {
    let chars = value.chars().collect::<Vec<_>>();
    let mut i = 0;
    let mut last_is_dot = false;
    while i < chars.len() {
        let c = chars[i];
        let step = if with_plx && c == '%' {
            if !chars
                .get(i + 1..i + 3)
                .is_some_and(|h| h.iter().all(char::is_ascii_hexdigit))
            {
                return false;
            }
            3
        } else if with_plx && c == '\\' {
            if !chars.get(i + 1).is_some_and(|e| is_local_name_escapable(*e)) {
                return false;
            }
            2
        } else if i == 0 {
            if !(is_pn_chars_u(c) || c.is_ascii_digit() || (with_plx && c == ':')) {
                return false;
            }
            1
        } else if is_pn_chars(c) || c == '.' || (with_plx && c == ':') {
            1
        } else {
            return false;
        };
        last_is_dot = step == 1 && c == '.';
        i += step;
    }
    !last_is_dot
}

fn is_legacy_local_name(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_none_or(is_legacy_name_start_char) && chars.all(is_legacy_name_char)
}

/// A Turtle family prefixed name `prefix:local`.
pub fn is_valid_turtle_qname(value: &str, legacy: bool) -> bool {
    let Some((prefix, local)) = value.split_once(':') else {
        return false;
    };
    if legacy {
        (prefix.is_empty() || is_legacy_prefix(prefix)) && is_legacy_local_name(local)
    } else {
        (prefix.is_empty() || is_pn_prefix(prefix)) && is_pn_local(local, true)
    }
}

/// A SPARQL prefixed name. SPARQL 1.0 allows neither escapes nor `:` in the local part.
pub fn is_valid_sparql_qname(value: &str, sparql10: bool) -> bool {
    let Some((prefix, local)) = value.split_once(':') else {
        return false;
    };
    (prefix.is_empty() || is_pn_prefix(prefix)) && is_pn_local(local, !sparql10)
}

// Notation 3 names: a letter, '_' or ':' followed by letters, digits, '_', '-' or ':'
pub fn is_valid_n3_name(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c == ':' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c == ':' || c == '-' || c.is_alphanumeric())
}

// Notation 3 universal variables: '?' then a letter or '_' followed by letters, digits, '_' or '-'
pub fn is_valid_n3_variable(value: &str) -> bool {
    let Some(name) = value.strip_prefix('?') else {
        return false;
    };
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c == '-' || c.is_alphanumeric())
}

// [143s]  VAR1     ::=  '?' VARNAME
// [144s]  VAR2     ::=  '$' VARNAME
// [166s]  VARNAME  ::=  (PN_CHARS_U | [0-9]) (PN_CHARS_U | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040])*
pub fn is_valid_var_name(value: &str) -> bool {
    let Some(name) = value.strip_prefix(['?', '$']) else {
        return false;
    };
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| is_pn_chars_u(c) || c.is_ascii_digit())
        && chars.all(|c| is_pn_chars(c) && c != '-')
}

// [141s]  BLANK_NODE_LABEL  ::=  '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
pub fn is_valid_blank_node(value: &str) -> bool {
    let Some(label) = value.strip_prefix("_:") else {
        return false;
    };
    let mut chars = label.chars();
    chars
        .next()
        .is_some_and(|c| is_pn_chars_u(c) || c.is_ascii_digit())
        && chars.clone().all(|c| is_pn_chars(c) || c == '.')
        && chars.last().is_none_or(is_pn_chars)
}

// N-Triples 2004 nodeID  ::=  '_:' name
//                name    ::=  [A-Za-z][A-Za-z0-9]*
pub fn is_valid_legacy_ntriples_blank_node(value: &str) -> bool {
    let Some(label) = value.strip_prefix("_:") else {
        return false;
    };
    let mut chars = label.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric())
}

// [144s]  LANGTAG  ::=  '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
pub fn is_valid_lang_spec(value: &str) -> bool {
    let mut parts = value.split('-');
    parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphabetic()))
        && parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}
