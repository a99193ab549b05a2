#![allow(clippy::panic_in_result_fn)]

use oxtok::{
    CsvTokenizer, Keyword, N3Tokenizer, NTriplesTokenizer, SparqlTokenizer, Token, TokenKind,
    TokenSyntaxErrorKind, Tokenizer, TokenizerError, TriGTokenizer, TsvTokenizer,
    TurtleTokenizer,
};
use std::error::Error;
use std::io;

fn collect(tokenizer: impl Tokenizer) -> Result<Vec<Token>, TokenizerError> {
    tokenizer.tokens().collect()
}

fn kinds_and_values(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
    tokens.iter().map(|t| (t.kind(), t.value())).collect()
}

fn assert_well_formed(tokens: &[Token]) {
    assert_eq!(tokens.first().map(Token::kind), Some(TokenKind::Bof));
    assert_eq!(tokens.last().map(Token::kind), Some(TokenKind::Eof));
    assert_eq!(
        tokens.iter().filter(|t| t.kind() == TokenKind::Eof).count(),
        1
    );
    for pair in tokens.windows(2) {
        assert!(
            pair[0].span().end() <= pair[1].span().start(),
            "{} is followed by {}",
            pair[0],
            pair[1]
        );
        assert!(
            pair[1].span().start() <= pair[1].span().end(),
            "{} ends before it starts",
            pair[1]
        );
    }
}

#[test]
fn turtle_uri_then_dot() -> Result<(), Box<dyn Error>> {
    let tokens = collect(TurtleTokenizer::for_str("<http://example.org/a> ."))?;
    assert_eq!(
        kinds_and_values(&tokens),
        [
            (TokenKind::Bof, ""),
            (TokenKind::Uri, "http://example.org/a"),
            (TokenKind::Dot, "."),
            (TokenKind::Eof, ""),
        ]
    );
    Ok(())
}

#[test]
fn turtle_language_tagged_literal() -> Result<(), Box<dyn Error>> {
    let tokens = collect(TurtleTokenizer::for_str("\"hello\"@en"))?;
    assert_eq!(
        kinds_and_values(&tokens),
        [
            (TokenKind::Bof, ""),
            (TokenKind::Literal, "hello"),
            (TokenKind::LangSpec, "en"),
            (TokenKind::Eof, ""),
        ]
    );
    Ok(())
}

#[test]
fn turtle_typed_literal() -> Result<(), Box<dyn Error>> {
    let tokens = collect(TurtleTokenizer::for_str(
        "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>",
    ))?;
    assert_eq!(
        kinds_and_values(&tokens),
        [
            (TokenKind::Bof, ""),
            (TokenKind::Literal, "5"),
            (TokenKind::HatHat, "^^"),
            (TokenKind::Uri, "http://www.w3.org/2001/XMLSchema#integer"),
            (TokenKind::Eof, ""),
        ]
    );
    Ok(())
}

#[test]
fn turtle_empty_long_literal() -> Result<(), Box<dyn Error>> {
    let tokens = collect(TurtleTokenizer::for_str("\"\"\"\"\"\""))?;
    assert_eq!(
        kinds_and_values(&tokens),
        [
            (TokenKind::Bof, ""),
            (TokenKind::LongLiteral, ""),
            (TokenKind::Eof, ""),
        ]
    );
    Ok(())
}

#[test]
fn turtle_unterminated_uri() {
    let mut tokenizer = TurtleTokenizer::for_str("<http://example.org/a");
    let error = collect(&mut tokenizer).unwrap_err();
    assert_eq!(
        error.syntax_kind(),
        Some(TokenSyntaxErrorKind::UnexpectedEndOfInput)
    );
    let message = error.to_string();
    assert!(message.starts_with("Syntax error at line 1"), "{message}");
    assert!(message.contains("URI"), "{message}");

    // the input is closed after an error
    assert_eq!(
        tokenizer.next_token().unwrap_err().syntax_kind(),
        Some(TokenSyntaxErrorKind::Closed)
    );
    assert_eq!(
        io::Error::from(error).kind(),
        io::ErrorKind::InvalidData
    );
}

#[test]
fn sparql_select_all() -> Result<(), Box<dyn Error>> {
    let tokens = collect(SparqlTokenizer::for_str("SELECT * WHERE { }"))?;
    assert_eq!(
        kinds_and_values(&tokens),
        [
            (TokenKind::Bof, ""),
            (TokenKind::Keyword(Keyword::Select), "SELECT"),
            (TokenKind::All, "*"),
            (TokenKind::Keyword(Keyword::Where), "WHERE"),
            (TokenKind::LeftCurlyBracket, "{"),
            (TokenKind::RightCurlyBracket, "}"),
            (TokenKind::Eof, ""),
        ]
    );
    Ok(())
}

#[test]
fn numeric_boundaries() -> Result<(), Box<dyn Error>> {
    for number in ["+1", "-1", "1e10", "1.5e-3"] {
        let tokens = collect(TurtleTokenizer::for_str(number))?;
        assert_eq!(
            kinds_and_values(&tokens)[1..],
            [(TokenKind::PlainLiteral, number), (TokenKind::Eof, "")]
        );
    }
    let tokens = collect(TurtleTokenizer::for_str("1.0."))?;
    assert_eq!(
        kinds_and_values(&tokens)[1..],
        [
            (TokenKind::PlainLiteral, "1.0"),
            (TokenKind::Dot, "."),
            (TokenKind::Eof, "")
        ]
    );
    assert!(collect(TurtleTokenizer::for_str("1-2")).is_err());
    Ok(())
}

#[test]
fn positions_are_monotonic() -> Result<(), Box<dyn Error>> {
    assert_well_formed(&collect(TurtleTokenizer::for_str(
        "@prefix ex: <http://example.com/> .\nex:s ex:p \"\"\"multi\nline\"\"\" ;\n    ex:q ( 1 2.5 true ) , [ ex:r _:b ] . # done\n",
    ))?);
    assert_well_formed(&collect(TriGTokenizer::for_str(
        "GRAPH <http://example.com/g> { <s> <p> 'o' }",
    ))?);
    assert_well_formed(&collect(NTriplesTokenizer::for_str(
        "<http://example.com/s> <http://example.com/p> \"o\"@en .\n_:b <http://example.com/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
    ))?);
    assert_well_formed(&collect(N3Tokenizer::for_str("@keywords a, is. x a y."))?);
    assert_well_formed(&collect(SparqlTokenizer::for_str(
        "PREFIX ex: <http://example.com/>\nSELECT ?s (COUNT(*) AS ?c)\nWHERE { ?s ex:p ?o . FILTER(?o >= 2) }\nGROUP BY ?s ORDER BY DESC(?c) LIMIT 10",
    ))?);
    assert_well_formed(&collect(CsvTokenizer::for_str(
        "s,o\r\nhttp://example.com/,\"a\r\nb\"\r\n",
    ))?);
    assert_well_formed(&collect(TsvTokenizer::for_str(
        "?s\t?o\n<http://example.com/>\t\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>\n",
    ))?);
    Ok(())
}

#[test]
fn white_space_and_comments_do_not_change_tokens() -> Result<(), Box<dyn Error>> {
    let pieces = [
        "ex:s", "a", "ex:Person", ";", "ex:name", "\"v\"@en", ",", "'w'", ";", "ex:age",
        "1.5", ".", "_:b", "ex:p", "(", "1", "true", ")", ",", "[", "ex:q", "ex:o", "]", ".",
    ];
    let prologue = "@prefix ex: <http://example.com/> .\n";
    let compact = format!("{prologue}{}", pieces.join(" "));
    let spaced = format!("{prologue}{}", pieces.join("  # comment\n\t "));

    let compact = collect(TurtleTokenizer::for_str(&compact))?;
    let spaced = collect(TurtleTokenizer::for_str(&spaced))?;
    assert!(spaced.iter().any(|t| t.kind() == TokenKind::Comment));
    let without_comments = |tokens: &[Token]| {
        tokens
            .iter()
            .filter(|t| t.kind() != TokenKind::Comment)
            .map(|t| (t.kind(), t.value().to_owned()))
            .collect::<Vec<_>>()
    };
    assert_eq!(without_comments(&compact), without_comments(&spaced));
    Ok(())
}

#[test]
fn readers_and_strings_give_the_same_tokens() -> Result<(), Box<dyn Error>> {
    let input = "PREFIX ex: <http://example.com/>\nASK { ?s ex:p \"\u{e9}\\u00E9\" }";
    let from_str = collect(SparqlTokenizer::for_str(input))?;
    let from_reader = collect(SparqlTokenizer::for_reader(input.as_bytes()))?;
    assert_eq!(from_str, from_reader);
    Ok(())
}

#[test]
fn unicode_escapes_are_decoded() -> Result<(), Box<dyn Error>> {
    let input = "<http://example.com/\\u00E9> \"a\\u00E9\\U0001F600\" 'b\\u0027' .";
    for tokens in [
        collect(TurtleTokenizer::for_str(input))?,
        collect(TurtleTokenizer::for_reader(input.as_bytes()))?,
    ] {
        assert_eq!(
            kinds_and_values(&tokens)[1..],
            [
                (TokenKind::Uri, "http://example.com/\u{e9}"),
                (TokenKind::Literal, "a\u{e9}\u{1F600}"),
                (TokenKind::Literal, "b'"),
                (TokenKind::Dot, "."),
                (TokenKind::Eof, ""),
            ]
        );
    }
    Ok(())
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let error = collect(TurtleTokenizer::for_reader(&[b'<', 0xFF, b'>'][..])).unwrap_err();
    let TokenizerError::Io(error) = error else {
        panic!("expected an I/O error, found {error}")
    };
    assert_eq!(error.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn every_tokenizer_reports_its_format() {
    assert_eq!(TurtleTokenizer::for_str("").format(), "Turtle");
    assert_eq!(SparqlTokenizer::for_str("").format(), "SPARQL");
    assert_eq!(CsvTokenizer::for_str("").format(), "CSV");
    assert_eq!(TsvTokenizer::for_str("").format(), "TSV");
    assert_eq!(NTriplesTokenizer::for_str("").format(), "N-Triples");
}

#[test]
fn boxed_tokenizers() -> Result<(), Box<dyn Error>> {
    let tokenizers: Vec<Box<dyn Tokenizer>> = vec![
        Box::new(TurtleTokenizer::for_str("")),
        Box::new(TriGTokenizer::for_str("")),
        Box::new(N3Tokenizer::for_str("")),
        Box::new(NTriplesTokenizer::for_str("")),
        Box::new(SparqlTokenizer::for_str("")),
        Box::new(CsvTokenizer::for_str("")),
        Box::new(TsvTokenizer::for_str("")),
    ];
    for tokenizer in tokenizers {
        let tokens = collect(tokenizer)?;
        assert_eq!(
            tokens.iter().map(Token::kind).collect::<Vec<_>>(),
            [TokenKind::Bof, TokenKind::Eof]
        );
    }
    Ok(())
}
