//! Go source formatter for generated schema files.
//!
//! Understands the subset of Go the emitter produces: a package clause,
//! single-line imports and `var` declarations initialised with composite
//! literals. Output follows `gofmt` layout: tab indentation, one element per
//! line in multi-line literals, and aligned values across runs of single-line
//! `key: value` elements.

use std::error;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

const GO_KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

const ILLEGAL_NUL: &str = "illegal character NUL";

/// A Go syntax error at a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl error::Error for SyntaxError {}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Format Go source the way `gofmt` lays it out.
///
/// # Errors
///
/// Returns `SyntaxError` if the source is not valid Go within the supported subset.
pub fn format_source(source: &str) -> Result<String, SyntaxError> {
    let tokens: Vec<Token> = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let file: SourceFile = parser.parse_file()?;
    let mut printer = Printer::default();
    printer.file(&file);
    Ok(printer.out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    /// String literal including its quotes.
    Str(String),
    LBrace,
    RBrace,
    Comma,
    Colon,
    Amp,
    Dot,
    Assign,
    Semicolon { implicit: bool },
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "'{name}'"),
            Self::Str(literal) => write!(f, "{literal}"),
            Self::LBrace => write!(f, "'{{'"),
            Self::RBrace => write!(f, "'}}'"),
            Self::Comma => write!(f, "','"),
            Self::Colon => write!(f, "':'"),
            Self::Amp => write!(f, "'&'"),
            Self::Dot => write!(f, "'.'"),
            Self::Assign => write!(f, "'='"),
            Self::Semicolon { implicit: true } => write!(f, "newline"),
            Self::Semicolon { implicit: false } => write!(f, "';'"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    /// Go inserts a semicolon at a newline after an identifier, literal or `}`.
    insert_semicolon: bool,
}

fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
        tokens: Vec::new(),
        insert_semicolon: false,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

fn is_valid_escape(c: char) -> bool {
    matches!(
        c,
        'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '"' | 'x' | 'u' | 'U' | '0'..='7'
    )
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c: char = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Like `bump`, but refuses to cross a line break.
    fn bump_in_line(&mut self) -> Option<char> {
        if self.chars.peek() == Some(&'\n') {
            return None;
        }
        self.bump()
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.insert_semicolon = matches!(
            kind,
            TokenKind::Ident(_) | TokenKind::Str(_) | TokenKind::RBrace
        );
        self.tokens.push(Token { kind, line, column });
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some(&c) = self.chars.peek() {
            let (line, column): (usize, usize) = (self.line, self.column);
            let punct: Option<TokenKind> = match c {
                '{' => Some(TokenKind::LBrace),
                '}' => Some(TokenKind::RBrace),
                ',' => Some(TokenKind::Comma),
                ':' => Some(TokenKind::Colon),
                '&' => Some(TokenKind::Amp),
                '.' => Some(TokenKind::Dot),
                '=' => Some(TokenKind::Assign),
                ';' => Some(TokenKind::Semicolon { implicit: false }),
                _ => None,
            };
            if let Some(kind) = punct {
                self.bump();
                self.push(kind, line, column);
                continue;
            }
            match c {
                '\n' => {
                    if self.insert_semicolon {
                        self.push(TokenKind::Semicolon { implicit: true }, line, column);
                    }
                    self.bump();
                }
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '/' => {
                    self.bump();
                    if self.chars.peek() != Some(&'/') {
                        return Err(SyntaxError::new(line, column, "unexpected character '/'"));
                    }
                    while self.bump_in_line().is_some() {}
                }
                '"' => {
                    self.bump();
                    let literal: String = self.interpreted_string(line, column)?;
                    self.push(TokenKind::Str(literal), line, column);
                }
                '`' => {
                    self.bump();
                    let literal: String = self.raw_string(line, column)?;
                    self.push(TokenKind::Str(literal), line, column);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let name: String = self.identifier();
                    self.push(TokenKind::Ident(name), line, column);
                }
                other => {
                    return Err(SyntaxError::new(
                        line,
                        column,
                        format!("unexpected character U+{:04X} '{other}'", u32::from(other)),
                    ));
                }
            }
        }
        if self.insert_semicolon {
            self.push(
                TokenKind::Semicolon { implicit: true },
                self.line,
                self.column,
            );
        }
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
            column: self.column,
        });
        Ok(())
    }

    fn identifier(&mut self) -> String {
        let mut name: String = String::new();
        while let Some(&c) = self.chars.peek() {
            if !(c.is_alphabetic() || c.is_ascii_digit() || c == '_') {
                break;
            }
            name.push(c);
            self.bump();
        }
        name
    }

    /// Reads the rest of a `"..."` literal; the opening quote is already consumed.
    fn interpreted_string(&mut self, line: usize, column: usize) -> Result<String, SyntaxError> {
        let unterminated = || SyntaxError::new(line, column, "string literal not terminated");
        let mut literal: String = String::from("\"");
        loop {
            let (char_line, char_column): (usize, usize) = (self.line, self.column);
            let c: char = self.bump_in_line().ok_or_else(unterminated)?;
            literal.push(c);
            match c {
                '"' => return Ok(literal),
                '\0' => return Err(SyntaxError::new(char_line, char_column, ILLEGAL_NUL)),
                '\\' => {
                    let (escape_line, escape_column): (usize, usize) = (self.line, self.column);
                    let escaped: char = self.bump_in_line().ok_or_else(unterminated)?;
                    if !is_valid_escape(escaped) {
                        return Err(SyntaxError::new(
                            escape_line,
                            escape_column,
                            "unknown escape sequence",
                        ));
                    }
                    literal.push(escaped);
                }
                _ => {}
            }
        }
    }

    /// Reads the rest of a `` `...` `` literal; the opening backquote is already consumed.
    fn raw_string(&mut self, line: usize, column: usize) -> Result<String, SyntaxError> {
        let mut literal: String = String::from("`");
        loop {
            let (char_line, char_column): (usize, usize) = (self.line, self.column);
            let c: char = self.bump().ok_or_else(|| {
                SyntaxError::new(line, column, "raw string literal not terminated")
            })?;
            match c {
                '`' => {
                    literal.push(c);
                    return Ok(literal);
                }
                '\0' => return Err(SyntaxError::new(char_line, char_column, ILLEGAL_NUL)),
                _ => literal.push(c),
            }
        }
    }
}

struct SourceFile {
    package: String,
    imports: Vec<String>,
    decls: Vec<VarDecl>,
}

struct VarDecl {
    name: String,
    value: Expr,
}

enum Expr {
    /// Identifier or qualified identifier such as `bigquery.StringFieldType`.
    Name(String),
    Str(String),
    AddressOf(Box<Expr>),
    Composite(CompositeLit),
}

struct CompositeLit {
    ty: Option<String>,
    elements: Vec<Element>,
    /// Whether the closing brace sat on a later line than the opening one.
    multiline: bool,
}

struct Element {
    key: Option<Expr>,
    value: Expr,
}

impl Expr {
    fn is_multiline(&self) -> bool {
        match self {
            Self::AddressOf(inner) => inner.is_multiline(),
            Self::Composite(lit) => lit.multiline && !lit.elements.is_empty(),
            Self::Name(_) | Self::Str(_) => false,
        }
    }
}

impl Element {
    /// Single-line keyed elements take part in value alignment.
    fn is_alignable(&self) -> bool {
        self.key.as_ref().is_some_and(|key| !key.is_multiline()) && !self.value.is_multiline()
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token: Token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expected(&self, what: &str) -> SyntaxError {
        let token: &Token = self.peek();
        SyntaxError::new(
            token.line,
            token.column,
            format!("expected {what}, found {}", token.kind),
        )
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), SyntaxError> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(&format!("'{keyword}'")))
        }
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        match &self.peek().kind {
            TokenKind::Ident(name) if !GO_KEYWORDS.contains(&name.as_str()) => {
                let name: String = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.expected("'IDENT'")),
        }
    }

    fn expect_string(&mut self) -> Result<String, SyntaxError> {
        match &self.peek().kind {
            TokenKind::Str(literal) => {
                let literal: String = literal.clone();
                self.advance();
                Ok(literal)
            }
            _ => Err(self.expected("'STRING'")),
        }
    }

    fn expect_punct(&mut self, kind: &TokenKind) -> Result<Token, SyntaxError> {
        if self.peek().kind == *kind {
            Ok(self.advance())
        } else {
            Err(self.expected(&kind.to_string()))
        }
    }

    fn expect_terminator(&mut self) -> Result<(), SyntaxError> {
        match self.peek().kind {
            TokenKind::Semicolon { .. } => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.expected("';'")),
        }
    }

    fn parse_file(&mut self) -> Result<SourceFile, SyntaxError> {
        self.expect_keyword("package")?;
        let package: String = self.expect_ident()?;
        self.expect_terminator()?;

        let mut imports: Vec<String> = Vec::new();
        while self.at_keyword("import") {
            self.advance();
            imports.push(self.expect_string()?);
            self.expect_terminator()?;
        }

        let mut decls: Vec<VarDecl> = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            if !self.at_keyword("var") {
                return Err(self.expected("declaration"));
            }
            self.advance();
            let name: String = self.expect_ident()?;
            self.expect_punct(&TokenKind::Assign)?;
            let value: Expr = self.parse_expr()?;
            self.expect_terminator()?;
            decls.push(VarDecl { name, value });
        }

        Ok(SourceFile {
            package,
            imports,
            decls,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        match &self.peek().kind {
            TokenKind::Amp => {
                self.advance();
                Ok(Expr::AddressOf(Box::new(self.parse_expr()?)))
            }
            TokenKind::Str(literal) => {
                let literal: String = literal.clone();
                self.advance();
                Ok(Expr::Str(literal))
            }
            TokenKind::Ident(_) => {
                let mut name: String = self.expect_ident()?;
                if self.peek().kind == TokenKind::Dot {
                    self.advance();
                    let selector: String = self.expect_ident()?;
                    name = format!("{name}.{selector}");
                }
                if self.peek().kind == TokenKind::LBrace {
                    Ok(Expr::Composite(self.parse_composite(Some(name))?))
                } else {
                    Ok(Expr::Name(name))
                }
            }
            TokenKind::LBrace => Ok(Expr::Composite(self.parse_composite(None)?)),
            _ => Err(self.expected("operand")),
        }
    }

    fn parse_composite(&mut self, ty: Option<String>) -> Result<CompositeLit, SyntaxError> {
        let open: Token = self.expect_punct(&TokenKind::LBrace)?;
        let mut elements: Vec<Element> = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            let first: Expr = self.parse_expr()?;
            let element: Element = if self.peek().kind == TokenKind::Colon {
                self.advance();
                Element {
                    key: Some(first),
                    value: self.parse_expr()?,
                }
            } else {
                Element {
                    key: None,
                    value: first,
                }
            };
            elements.push(element);

            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBrace => {}
                TokenKind::Semicolon { implicit: true } => {
                    let token: &Token = self.peek();
                    return Err(SyntaxError::new(
                        token.line,
                        token.column,
                        "missing ',' before newline in composite literal",
                    ));
                }
                _ => return Err(self.expected("',' or '}'")),
            }
        }
        let close: Token = self.advance();
        Ok(CompositeLit {
            ty,
            elements,
            multiline: close.line > open.line,
        })
    }
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn file(&mut self, file: &SourceFile) {
        self.out.push_str("package ");
        self.out.push_str(&file.package);
        self.out.push('\n');

        if !file.imports.is_empty() {
            self.out.push('\n');
            for import in &file.imports {
                self.out.push_str("import ");
                self.out.push_str(import);
                self.out.push('\n');
            }
        }

        if !file.decls.is_empty() {
            self.out.push('\n');
            for decl in &file.decls {
                self.out.push_str("var ");
                self.out.push_str(&decl.name);
                self.out.push_str(" = ");
                self.expr(&decl.value, 0);
                self.out.push('\n');
            }
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    fn expr(&mut self, expr: &Expr, depth: usize) {
        match expr {
            Expr::Name(text) | Expr::Str(text) => self.out.push_str(text),
            Expr::AddressOf(inner) => {
                self.out.push('&');
                self.expr(inner, depth);
            }
            Expr::Composite(lit) => self.composite(lit, depth),
        }
    }

    fn composite(&mut self, lit: &CompositeLit, depth: usize) {
        if let Some(ty) = &lit.ty {
            self.out.push_str(ty);
        }
        self.out.push('{');

        if lit.elements.is_empty() {
            self.out.push('}');
            return;
        }

        if !lit.multiline {
            for (i, element) in lit.elements.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                if let Some(key) = &element.key {
                    self.expr(key, depth);
                    self.out.push_str(": ");
                }
                self.expr(&element.value, depth);
            }
            self.out.push('}');
            return;
        }

        self.out.push('\n');
        let inner: usize = depth + 1;
        let mut start: usize = 0;
        while start < lit.elements.len() {
            let run_len: usize = lit.elements[start..]
                .iter()
                .take_while(|element| element.is_alignable())
                .count()
                .max(1);
            let run: &[Element] = &lit.elements[start..start + run_len];
            let key_width: usize = run
                .iter()
                .filter_map(|element| element.key.as_ref())
                .map(|key| render_inline(key).chars().count())
                .max()
                .unwrap_or(0);

            for element in run {
                self.indent(inner);
                if let Some(key) = &element.key {
                    let key_text: String = render_inline(key);
                    let padding: usize = if element.is_alignable() {
                        key_width - key_text.chars().count() + 1
                    } else {
                        1
                    };
                    self.out.push_str(&key_text);
                    self.out.push(':');
                    self.out.push_str(&" ".repeat(padding));
                }
                self.expr(&element.value, inner);
                self.out.push_str(",\n");
            }
            start += run_len;
        }
        self.indent(depth);
        self.out.push('}');
    }
}

fn render_inline(expr: &Expr) -> String {
    let mut printer = Printer::default();
    printer.expr(expr, 0);
    printer.out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_TWO_FIELDS: &str = "package main
import \"cloud.google.com/go/bigquery\"
var Schema = bigquery.Schema{
&bigquery.FieldSchema{
Name: \"numbers\",
Type: bigquery.IntegerFieldType,
},
&bigquery.FieldSchema{
Name: \"currency_code\",
Type: bigquery.StringFieldType,
},
}
";

    #[test]
    fn formats_flat_schema() {
        let expected: &str = "package main

import \"cloud.google.com/go/bigquery\"

var Schema = bigquery.Schema{
\t&bigquery.FieldSchema{
\t\tName: \"numbers\",
\t\tType: bigquery.IntegerFieldType,
\t},
\t&bigquery.FieldSchema{
\t\tName: \"currency_code\",
\t\tType: bigquery.StringFieldType,
\t},
}
";
        let actual: String = format_source(RAW_TWO_FIELDS).expect("valid Go");
        assert_eq!(expected, actual);
    }

    #[test]
    fn formatting_is_idempotent() {
        let once: String = format_source(RAW_TWO_FIELDS).expect("valid Go");
        let twice: String = format_source(&once).expect("formatted output is valid Go");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_literal_collapses() {
        let raw: &str = "package main\nimport \"cloud.google.com/go/bigquery\"\nvar Schema = bigquery.Schema{\n}\n";
        let expected: &str =
            "package main\n\nimport \"cloud.google.com/go/bigquery\"\n\nvar Schema = bigquery.Schema{}\n";
        let actual: String = format_source(raw).expect("valid Go");
        assert_eq!(expected, actual);
    }

    #[test]
    fn aligns_values_of_single_line_keys() {
        let raw: &str = "package p\nvar S = T{\n&F{\nName: \"tags\",\nType: bigquery.StringFieldType,\nRepeated: true,\n},\n}\n";
        let expected: &str = "package p

var S = T{
\t&F{
\t\tName:     \"tags\",
\t\tType:     bigquery.StringFieldType,
\t\tRepeated: true,
\t},
}
";
        let actual: String = format_source(raw).expect("valid Go");
        assert_eq!(expected, actual);
    }

    #[test]
    fn multiline_value_breaks_alignment() {
        let raw: &str = "package p\nvar S = T{\n&F{\nName: \"addr\",\nRepeated: true,\nSchema: T{\n&F{\nName: \"city\",\n},\n},\n},\n}\n";
        let expected: &str = "package p

var S = T{
\t&F{
\t\tName:     \"addr\",
\t\tRepeated: true,
\t\tSchema: T{
\t\t\t&F{
\t\t\t\tName: \"city\",
\t\t\t},
\t\t},
\t},
}
";
        let actual: String = format_source(raw).expect("valid Go");
        assert_eq!(expected, actual);
    }

    #[test]
    fn single_line_literal_stays_inline() {
        let raw: &str = "package p\nvar S = T{A: x, B: \"y\",}\n";
        let actual: String = format_source(raw).expect("valid Go");
        assert_eq!("package p\n\nvar S = T{A: x, B: \"y\"}\n", actual);
    }

    #[test]
    fn comments_and_raw_strings_are_accepted() {
        let raw: &str = "// generated\npackage p // trailing\nimport `fmt`\nvar S = T{}\n";
        let actual: String = format_source(raw).expect("valid Go");
        assert_eq!("package p\n\nimport `fmt`\n\nvar S = T{}\n", actual);
    }

    #[test]
    fn missing_comma_before_newline_is_an_error() {
        let raw: &str = "package p\nvar S = T{\nName: \"x\"\n}\n";
        let err: SyntaxError = format_source(raw).expect_err("should fail");
        let expected = SyntaxError::new(
            3,
            10,
            "missing ',' before newline in composite literal",
        );
        assert_eq!(expected, err);
    }

    #[test]
    fn quote_inside_name_is_an_error() {
        let raw: &str = "package p\nvar S = T{\nName: \"a\"b\",\n}\n";
        let err: SyntaxError = format_source(raw).expect_err("should fail");
        assert_eq!("string literal not terminated", err.message);
        assert_eq!(3, err.line);
    }

    #[test]
    fn invalid_package_name_is_an_error() {
        let err: SyntaxError = format_source("package my-pkg\n").expect_err("should fail");
        assert_eq!("1:11: unexpected character U+002D '-'", err.to_string());
    }

    #[test]
    fn non_ascii_digit_in_identifier_is_an_error() {
        let err: SyntaxError = format_source("package ma\u{b2}in\n").expect_err("should fail");
        assert_eq!("1:11: unexpected character U+00B2 '\u{b2}'", err.to_string());
    }

    #[test]
    fn unicode_letters_in_identifier_are_accepted() {
        let actual: String = format_source("package caf\u{e9}9\n").expect("valid Go");
        assert_eq!("package caf\u{e9}9\n", actual);
    }

    #[test]
    fn nul_inside_string_is_an_error() {
        let raw: &str = "package p\nvar S = T{Name: \"a\u{0}b\"}\n";
        let err: SyntaxError = format_source(raw).expect_err("should fail");
        assert_eq!("2:19: illegal character NUL", err.to_string());
    }

    #[test]
    fn nul_inside_raw_string_is_an_error() {
        let raw: &str = "package p\nvar S = T{Name: `a\u{0}b`}\n";
        let err: SyntaxError = format_source(raw).expect_err("should fail");
        assert_eq!("2:19: illegal character NUL", err.to_string());
    }

    #[test]
    fn keyword_package_name_is_an_error() {
        let err: SyntaxError = format_source("package var\n").expect_err("should fail");
        assert_eq!("1:9: expected 'IDENT', found 'var'", err.to_string());
    }

    #[test]
    fn unbalanced_braces_are_an_error() {
        let raw: &str = "package p\nvar S = T{\n&F{\n},\n";
        let err: SyntaxError = format_source(raw).expect_err("should fail");
        assert!(err.message.starts_with("expected operand"), "{err}");
    }

    #[test]
    fn unknown_escape_is_an_error() {
        let raw: &str = "package p\nvar S = T{Name: \"a\\qb\"}\n";
        let err: SyntaxError = format_source(raw).expect_err("should fail");
        assert_eq!("unknown escape sequence", err.message);
    }

    #[test]
    fn missing_package_clause_is_an_error() {
        let err: SyntaxError = format_source("var S = T{}\n").expect_err("should fail");
        assert_eq!("1:1: expected 'package', found 'var'", err.to_string());
    }
}
