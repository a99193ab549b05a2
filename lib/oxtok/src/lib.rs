#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

pub mod csv;
pub mod n3;
pub mod ntriples;
pub mod queue;
pub mod sparql;
mod token;
mod tokenizer;
mod toolkit;
pub mod trig;
pub mod tsv;
pub mod turtle;

pub use crate::csv::CsvTokenizer;
pub use crate::n3::N3Tokenizer;
pub use crate::ntriples::{NTriplesSyntax, NTriplesTokenizer};
pub use crate::queue::{
    AsyncTokenQueue, BufferedTokenQueue, EagerTokenQueue, ExplicitTokenQueue, TokenQueue,
    TokenQueueMode,
};
pub use crate::sparql::{SparqlQuerySyntax, SparqlTokenizer};
pub use crate::token::{Keyword, Token, TokenKind, TokenSpan};
pub use crate::tokenizer::{TokenIterator, Tokenizer};
pub use crate::toolkit::{
    CharSource, EscapeMode, ReaderSource, StrSource, TextPosition, TokenSyntaxError,
    TokenSyntaxErrorKind, TokenizerError,
};
pub use crate::trig::{TriGSyntax, TriGTokenizer};
pub use crate::tsv::TsvTokenizer;
pub use crate::turtle::{TurtleSyntax, TurtleTokenizer};
