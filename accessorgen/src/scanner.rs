//! Lightweight static scan of PHP sources.
//!
//! The generator must know which methods a class already declares, including
//! ones written into the file moments ago, without compiling or loading it.
//! This module tokenizes a file and records, per class, the declared method
//! and property names.
//!
//! Only one namespace per file is tracked; files with several braced
//! `namespace { }` blocks are attributed to the last namespace seen.

use serde::Serialize;

/// A significant token. Whitespace and comments are dropped while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Ident(&'a str),
    /// `$name`, without the `$`.
    Variable(&'a str),
    NsSeparator,
    Str,
    Number,
    Punct(char),
}

impl Token<'_> {
    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Ident(ident) if ident.eq_ignore_ascii_case(keyword))
    }
}

/// Methods and properties a class declares in source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScannedClass {
    /// Fully-qualified name, without a leading separator.
    pub name: String,
    pub methods: Vec<String>,
    pub properties: Vec<String>,
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.bytes[self.pos..].starts_with(needle.as_bytes())
    }

    /// Skip inline HTML up to and including the next open tag.
    fn skip_inline_html(&mut self) {
        match self.src[self.pos..].find("<?") {
            Some(offset) => {
                self.pos += offset + 2;
                if self.bytes[self.pos..].get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case(b"php")) {
                    self.pos += 3;
                } else if self.peek(0) == Some(b'=') {
                    self.pos += 1;
                }
            }
            None => self.pos = self.bytes.len(),
        }
    }

    fn skip_until(&mut self, needle: &str) {
        match self.src[self.pos..].find(needle) {
            Some(offset) => self.pos += offset + needle.len(),
            None => self.pos = self.bytes.len(),
        }
    }

    fn skip_line_comment(&mut self) {
        // `?>` ends a line comment as well as the line itself.
        while let Some(b) = self.peek(0) {
            if b == b'\n' || self.starts_with("?>") {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            self.pos += 1;
            if b == b'\\' {
                self.pos += 1;
            } else if b == quote {
                return;
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn skip_heredoc(&mut self) {
        self.pos += 3;
        while matches!(self.peek(0), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
        let quoted = matches!(self.peek(0), Some(b'\'' | b'"'));
        if quoted {
            self.pos += 1;
        }
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let label = &self.src[start..self.pos];
        if quoted {
            self.pos = (self.pos + 1).min(self.bytes.len());
        }
        if label.is_empty() {
            return;
        }

        // The body ends at the first line whose content starts with the label.
        let mut line_start = match self.src[self.pos..].find('\n') {
            Some(offset) => self.pos + offset + 1,
            None => {
                self.pos = self.bytes.len();
                return;
            }
        };
        loop {
            let line = &self.src[line_start..];
            let trimmed = line.trim_start_matches([' ', '\t']);
            if trimmed.starts_with(label) {
                self.pos = line_start + (line.len() - trimmed.len()) + label.len();
                return;
            }
            match line.find('\n') {
                Some(offset) => line_start += offset + 1,
                None => {
                    self.pos = self.bytes.len();
                    return;
                }
            }
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            let b = self.peek(0)?;

            if b.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }
            if self.starts_with("?>") {
                self.pos += 2;
                self.skip_inline_html();
                continue;
            }
            if self.starts_with("//") || (b == b'#' && self.peek(1) != Some(b'[')) {
                self.skip_line_comment();
                continue;
            }
            if self.starts_with("/*") {
                self.pos += 2;
                self.skip_until("*/");
                continue;
            }
            if self.starts_with("<<<") {
                self.skip_heredoc();
                return Some(Token::Str);
            }

            match b {
                b'\'' | b'"' | b'`' => {
                    self.skip_quoted(b);
                    return Some(Token::Str);
                }
                b'$' if self.peek(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    let start = self.pos;
                    while self.peek(0).is_some_and(is_ident_continue) {
                        self.pos += 1;
                    }
                    return Some(Token::Variable(&self.src[start..self.pos]));
                }
                b'\\' => {
                    self.pos += 1;
                    return Some(Token::NsSeparator);
                }
                b if b.is_ascii_digit() => {
                    while self.peek(0).is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.') {
                        self.pos += 1;
                    }
                    return Some(Token::Number);
                }
                b if is_ident_start(b) => {
                    let start = self.pos;
                    while self.peek(0).is_some_and(is_ident_continue) {
                        self.pos += 1;
                    }
                    return Some(Token::Ident(&self.src[start..self.pos]));
                }
                _ => {
                    let c = self.src[self.pos..].chars().next()?;
                    self.pos += c.len_utf8();
                    return Some(Token::Punct(c));
                }
            }
        }
    }
}

/// Splits PHP source into significant tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    lexer.skip_inline_html();

    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}

const PROPERTY_KEYWORDS: &[&str] = &["var", "public", "private", "protected"];
const CLASS_KEYWORDS: &[&str] = &["class", "trait", "interface"];

/// Records the classes declared in `source` with their methods and properties.
pub fn scan(source: &str) -> Vec<ScannedClass> {
    let tokens = tokenize(source);
    let mut classes: Vec<ScannedClass> = Vec::new();
    let mut namespace = String::new();
    let mut in_namespace = false;

    for (i, token) in tokens.iter().enumerate() {
        if in_namespace {
            match token {
                Token::Ident(part) => namespace.push_str(part),
                Token::NsSeparator => namespace.push('\\'),
                Token::Punct(';' | '{') => in_namespace = false,
                _ => {}
            }
            continue;
        }

        if token.is_keyword("namespace") {
            // `namespace\foo()` is a relative name, not a declaration.
            if tokens.get(i + 1) != Some(&Token::NsSeparator) {
                namespace.clear();
                in_namespace = true;
            }
        } else if CLASS_KEYWORDS.iter().any(|keyword| token.is_keyword(keyword)) {
            let is_class_constant = i >= 2 && tokens[i - 1] == Token::Punct(':') && tokens[i - 2] == Token::Punct(':');
            if let (false, Some(Token::Ident(class_name))) = (is_class_constant, tokens.get(i + 1)) {
                let namespace = namespace.trim_matches('\\');
                let qualified = if namespace.is_empty() {
                    class_name.to_string()
                } else {
                    format!("{namespace}\\{class_name}")
                };
                classes.push(ScannedClass {
                    name: qualified,
                    ..Default::default()
                });
            }
        } else if token.is_keyword("function") {
            let name = match (tokens.get(i + 1), tokens.get(i + 2)) {
                (Some(Token::Ident(name)), _) => Some(*name),
                (Some(Token::Punct('&')), Some(Token::Ident(name))) => Some(*name),
                _ => None,
            };
            if let (Some(name), Some(class)) = (name, classes.last_mut()) {
                class.methods.push(name.to_string());
            }
        } else if PROPERTY_KEYWORDS.iter().any(|keyword| token.is_keyword(keyword)) {
            if let (Some(property), Some(class)) = (declared_property(&tokens[i + 1..]), classes.last_mut()) {
                class.properties.push(property.to_string());
            }
        }
    }

    classes
}

/// Finds the property a visibility keyword introduces, skipping modifiers and
/// type declarations. Returns `None` for methods and constants.
fn declared_property<'a>(rest: &[Token<'a>]) -> Option<&'a str> {
    for token in rest {
        match token {
            Token::Variable(name) => return Some(name),
            Token::Ident(word) if word.eq_ignore_ascii_case("function") || word.eq_ignore_ascii_case("const") => {
                return None;
            }
            Token::Ident(_) | Token::NsSeparator | Token::Punct('?' | '|' | '&' | '(' | ')') => {}
            _ => return None,
        }
    }
    None
}
