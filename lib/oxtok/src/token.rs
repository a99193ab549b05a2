//! The [`Token`] type and its kinds.

use crate::toolkit::TextPosition;
use std::fmt;

/// The kind of a [`Token`].
///
/// The set is shared by all the tokenizers of this crate: each of them only emits the subset relevant to its syntax.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum TokenKind {
    /// Beginning of the input, always the first token.
    Bof,
    /// End of the input, always the last token.
    Eof,
    /// End of a line in line based formats (CSV and TSV).
    Eol,
    /// `@`
    At,
    /// `.`
    Dot,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// A tab character in TSV.
    Tab,
    /// `^^`
    HatHat,
    /// `^`
    Hat,
    /// `!`
    Exclamation,
    /// `?`
    Question,
    /// `|`
    BitwiseOr,
    /// `:=`
    Assignment,
    /// A `#` comment.
    Comment,
    /// `[`
    LeftSquareBracket,
    /// `]`
    RightSquareBracket,
    /// `(`
    LeftBracket,
    /// `)`
    RightBracket,
    /// `{`
    LeftCurlyBracket,
    /// `}`
    RightCurlyBracket,
    /// `prefix` or `PREFIX`
    PrefixDirective,
    /// A prefix name with its trailing `:`.
    Prefix,
    /// `base` or `BASE`
    BaseDirective,
    /// `@keywords`
    KeywordDirective,
    /// `@forAll`
    ForAll,
    /// `@forSome`
    ForSome,
    /// An IRI reference, without its `<>`.
    Uri,
    /// A prefixed name.
    QName,
    /// An unquoted literal (boolean or number).
    PlainLiteral,
    /// A quoted literal, without its quotes.
    Literal,
    /// A triple quoted literal, without its quotes.
    LongLiteral,
    /// A language tag, without its `@`.
    LangSpec,
    /// An anonymous blank node.
    BlankNode,
    /// A labeled blank node `_:label`.
    BlankNodeWithId,
    /// A variable, with its `?` or `$`.
    Variable,
    /// `a`
    KeywordA,
    /// `is`
    KeywordIs,
    /// `of`
    KeywordOf,
    /// A keyword declared by a N3 `@keywords` directive.
    KeywordCustom,
    /// A keyword declaration inside a N3 `@keywords` directive.
    KeywordDefinition,
    /// `=>`
    Implies,
    /// `<=`
    ImpliedBy,
    /// `=`
    Equals,
    /// `*` in a SPARQL projection.
    All,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `!=`
    NotEquals,
    /// `!` in a SPARQL expression.
    Negation,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqualTo,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqualTo,
    /// A SPARQL keyword.
    Keyword(Keyword),
}

impl TokenKind {
    /// The upper case name of the kind used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bof => "BOF",
            Self::Eof => "EOF",
            Self::Eol => "EOL",
            Self::At => "AT",
            Self::Dot => "DOT",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Tab => "TAB",
            Self::HatHat => "HATHAT",
            Self::Hat => "HAT",
            Self::Exclamation => "EXCLAMATION",
            Self::Question => "QUESTION",
            Self::BitwiseOr => "BITWISEOR",
            Self::Assignment => "ASSIGNMENT",
            Self::Comment => "COMMENT",
            Self::LeftSquareBracket => "LEFTSQBRACKET",
            Self::RightSquareBracket => "RIGHTSQBRACKET",
            Self::LeftBracket => "LEFTBRACKET",
            Self::RightBracket => "RIGHTBRACKET",
            Self::LeftCurlyBracket => "LEFTCURLYBRACKET",
            Self::RightCurlyBracket => "RIGHTCURLYBRACKET",
            Self::PrefixDirective => "PREFIXDIRECTIVE",
            Self::Prefix => "PREFIX",
            Self::BaseDirective => "BASEDIRECTIVE",
            Self::KeywordDirective => "KEYWORDDIRECTIVE",
            Self::ForAll => "FORALL",
            Self::ForSome => "FORSOME",
            Self::Uri => "URI",
            Self::QName => "QNAME",
            Self::PlainLiteral => "PLAINLITERAL",
            Self::Literal => "LITERAL",
            Self::LongLiteral => "LONGLITERAL",
            Self::LangSpec => "LANGSPEC",
            Self::BlankNode => "BLANKNODE",
            Self::BlankNodeWithId => "BLANKNODEWITHID",
            Self::Variable => "VARIABLE",
            Self::KeywordA => "KEYWORDA",
            Self::KeywordIs => "KEYWORDIS",
            Self::KeywordOf => "KEYWORDOF",
            Self::KeywordCustom => "KEYWORDCUSTOM",
            Self::KeywordDefinition => "KEYWORDDEF",
            Self::Implies => "IMPLIES",
            Self::ImpliedBy => "IMPLIEDBY",
            Self::Equals => "EQUALS",
            Self::All => "ALL",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::NotEquals => "NOTEQUALS",
            Self::Negation => "NEGATION",
            Self::And => "AND",
            Self::Or => "OR",
            Self::LessThan => "LESSTHAN",
            Self::LessThanOrEqualTo => "LESSTHANOREQUALTO",
            Self::GreaterThan => "GREATERTHAN",
            Self::GreaterThanOrEqualTo => "GREATERTHANOREQUALTO",
            Self::Keyword(keyword) => keyword.as_str(),
        }
    }

    /// Is it a quoted literal (short or long)?
    #[inline]
    pub const fn is_quoted_literal(self) -> bool {
        matches!(self, Self::Literal | Self::LongLiteral)
    }
}

impl fmt::Display for TokenKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// A [SPARQL](https://www.w3.org/TR/sparql11-query/) keyword.
        ///
        /// Keywords are matched case-insensitively and carried as their canonical upper case text.
        #[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The canonical upper case text of the keyword.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    Abs => "ABS",
    Add => "ADD",
    AllWord => "ALL",
    As => "AS",
    Asc => "ASC",
    Ask => "ASK",
    Avg => "AVG",
    Bind => "BIND",
    Bindings => "BINDINGS",
    BNode => "BNODE",
    Bound => "BOUND",
    Call => "CALL",
    Ceil => "CEIL",
    Clear => "CLEAR",
    Coalesce => "COALESCE",
    Concat => "CONCAT",
    Construct => "CONSTRUCT",
    Contains => "CONTAINS",
    Copy => "COPY",
    Count => "COUNT",
    Create => "CREATE",
    Data => "DATA",
    DataType => "DATATYPE",
    Day => "DAY",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Describe => "DESCRIBE",
    Distinct => "DISTINCT",
    Drop => "DROP",
    EncodeForUri => "ENCODE_FOR_URI",
    Exists => "EXISTS",
    Filter => "FILTER",
    Floor => "FLOOR",
    From => "FROM",
    Graph => "GRAPH",
    GroupBy => "GROUP BY",
    GroupConcat => "GROUP_CONCAT",
    Having => "HAVING",
    Hours => "HOURS",
    If => "IF",
    In => "IN",
    Insert => "INSERT",
    Into => "INTO",
    Iri => "IRI",
    IsBlank => "ISBLANK",
    IsIri => "ISIRI",
    IsLiteral => "ISLITERAL",
    IsNumeric => "ISNUMERIC",
    IsUri => "ISURI",
    Lang => "LANG",
    LangMatches => "LANGMATCHES",
    LCase => "LCASE",
    Length => "LENGTH",
    Let => "LET",
    Limit => "LIMIT",
    Load => "LOAD",
    Max => "MAX",
    Md5 => "MD5",
    Median => "MEDIAN",
    Min => "MIN",
    Minus => "MINUS",
    Minutes => "MINUTES",
    Mode => "MODE",
    Month => "MONTH",
    Move => "MOVE",
    Named => "NAMED",
    NMax => "NMAX",
    NMin => "NMIN",
    NotExists => "NOT EXISTS",
    NotIn => "NOT IN",
    Now => "NOW",
    Offset => "OFFSET",
    Optional => "OPTIONAL",
    OrderBy => "ORDER BY",
    Rand => "RAND",
    Reduced => "REDUCED",
    Regex => "REGEX",
    Replace => "REPLACE",
    Round => "ROUND",
    SameTerm => "SAMETERM",
    Sample => "SAMPLE",
    Seconds => "SECONDS",
    Select => "SELECT",
    Separator => "SEPARATOR",
    Service => "SERVICE",
    Sha1 => "SHA1",
    Sha256 => "SHA256",
    Sha384 => "SHA384",
    Sha512 => "SHA512",
    Silent => "SILENT",
    Str => "STR",
    StrAfter => "STRAFTER",
    StrBefore => "STRBEFORE",
    StrDt => "STRDT",
    StrEnds => "STRENDS",
    StrLang => "STRLANG",
    StrLen => "STRLEN",
    StrStarts => "STRSTARTS",
    StrUuid => "STRUUID",
    SubStr => "SUBSTR",
    Sum => "SUM",
    Timezone => "TIMEZONE",
    To => "TO",
    Tz => "TZ",
    UCase => "UCASE",
    Undef => "UNDEF",
    Union => "UNION",
    Unsaid => "UNSAID",
    Uri => "URI",
    Using => "USING",
    Uuid => "UUID",
    Values => "VALUES",
    Where => "WHERE",
    With => "WITH",
    Year => "YEAR",
}

impl Keyword {
    /// Looks up a single word keyword, ignoring case.
    ///
    /// Multi-word keywords like `GROUP BY` are never returned.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| !k.is_multi_word() && k.as_str().eq_ignore_ascii_case(word))
    }

    /// `GROUP BY`, `ORDER BY`, `NOT EXISTS` or `NOT IN`.
    #[inline]
    pub const fn is_multi_word(self) -> bool {
        matches!(
            self,
            Self::GroupBy | Self::OrderBy | Self::NotExists | Self::NotIn
        )
    }

    /// One of the four query forms: `SELECT`, `ASK`, `CONSTRUCT` and `DESCRIBE`.
    #[inline]
    pub const fn is_query_form(self) -> bool {
        matches!(
            self,
            Self::Select | Self::Ask | Self::Construct | Self::Describe
        )
    }

    /// A keyword that may start a SPARQL update operation.
    #[inline]
    pub const fn starts_update(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Clear
                | Self::Copy
                | Self::Create
                | Self::Delete
                | Self::Drop
                | Self::Insert
                | Self::Load
                | Self::Move
                | Self::With
        )
    }
}

impl fmt::Display for Keyword {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The position of a [`Token`] in the input.
///
/// Lines and columns start at 1. The end position is the one of the last character of the token.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct TokenSpan {
    pub start_line: u64,
    pub end_line: u64,
    pub start_column: u64,
    pub end_column: u64,
}

impl TokenSpan {
    #[inline]
    pub(crate) fn new(start: TextPosition, end: TextPosition) -> Self {
        Self {
            start_line: start.line,
            end_line: end.line,
            start_column: start.column,
            end_column: end.column,
        }
    }

    #[inline]
    pub fn start(&self) -> TextPosition {
        TextPosition {
            line: self.start_line,
            column: self.start_column,
        }
    }

    #[inline]
    pub fn end(&self) -> TextPosition {
        TextPosition {
            line: self.end_line,
            column: self.end_column,
        }
    }
}

/// A lexical unit of the input.
///
/// The value is the semantic payload of the token: IRIs are given without their `<>`, literals without their quotes and with their escape sequences decoded, language tags without their `@`...
///
/// ```
/// use oxtok::{TokenKind, Tokenizer, TurtleTokenizer};
///
/// let mut tokenizer = TurtleTokenizer::for_str("<http://example.com/s> .");
/// assert_eq!(tokenizer.next_token()?.kind(), TokenKind::Bof);
/// let uri = tokenizer.next_token()?;
/// assert_eq!(uri.kind(), TokenKind::Uri);
/// assert_eq!(uri.value(), "http://example.com/s");
/// assert_eq!(uri.span().end_column, 22);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Token {
    kind: TokenKind,
    value: String,
    span: TokenSpan,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, value: impl Into<String>, span: TokenSpan) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// The beginning of input token, at `(1, 1, 1, 1)`.
    #[inline]
    pub fn bof() -> Self {
        Self::new(
            TokenKind::Bof,
            "",
            TokenSpan::new(TextPosition::START, TextPosition::START),
        )
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    #[inline]
    pub fn span(&self) -> TokenSpan {
        self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Lines {}-{} Columns {}-{}] {} {}",
            self.span.start_line,
            self.span.end_line,
            self.span.start_column,
            self.span.end_column,
            self.kind,
            self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(Keyword::from_word("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_word("Group_Concat"), Some(Keyword::GroupConcat));
        assert_eq!(Keyword::from_word("encode_for_uri"), Some(Keyword::EncodeForUri));
        assert_eq!(Keyword::from_word("all"), Some(Keyword::AllWord));
        assert_eq!(Keyword::from_word("foo"), None);
    }

    #[test]
    fn multi_word_keywords_are_not_looked_up() {
        assert_eq!(Keyword::from_word("GROUP BY"), None);
        assert_eq!(Keyword::from_word("GROUP"), None);
        assert_eq!(Keyword::from_word("NOT"), None);
        assert!(Keyword::OrderBy.is_multi_word());
    }

    #[test]
    fn keyword_categories() {
        for keyword in Keyword::ALL {
            if keyword.is_query_form() {
                assert!(!keyword.starts_update(), "{keyword}");
            }
        }
        assert!(Keyword::Describe.is_query_form());
        assert!(Keyword::With.starts_update());
        assert!(!Keyword::Data.starts_update());
    }

    #[test]
    fn token_display() {
        let token = Token::new(
            TokenKind::Uri,
            "http://example.com/",
            TokenSpan {
                start_line: 2,
                end_line: 2,
                start_column: 3,
                end_column: 23,
            },
        );
        assert_eq!(
            token.to_string(),
            "[Lines 2-2 Columns 3-23] URI http://example.com/"
        );
        assert_eq!(Token::bof().to_string(), "[Lines 1-1 Columns 1-1] BOF ");
        assert_eq!(
            TokenKind::Keyword(Keyword::GroupBy).to_string(),
            "GROUP BY"
        );
    }
}
