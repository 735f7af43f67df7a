//! Lexer half of C2: turns source bytes into a flat token stream. Block
//! comments beginning `/**` are kept as `DocComment` tokens rather than
//! discarded, so the parser can attach them to the declaration that follows
//! (see `doc_comments::leading_comment`); ordinary `//` and `/* */` comments
//! are dropped entirely.
//!
//! Every token carries a byte-offset span (`start..end`) alongside its line
//! number, so a `Parse` diagnostic can point `miette` at the exact source
//! range instead of just a line number.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Package,
    Import,
    Parcelable,
    Interface,
    Oneway,
    In,
    Out,
    Inout,
    Ident(String),
    Integer(u32),
    Dot,
    Semi,
    Comma,
    Equals,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    DocComment(String),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct LexError {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub message: String,
}

pub fn lex(src: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    // (byte_offset, char) pairs so every index below doubles as a byte span.
    let mut chars: Vec<(usize, char)> = src.char_indices().collect();
    chars.push((src.len(), '\0'));
    let eof_offset = src.len();
    let mut i = 0;
    let mut line = 1usize;

    macro_rules! push {
        ($kind:expr, $start:expr) => {{
            tokens.push(Token {
                kind: $kind,
                line,
                start: $start,
                end: chars[i].0,
            });
        }};
    }

    while i < chars.len() - 1 {
        let (start, c) = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => {
                i += 1;
            }
            '/' if chars.get(i + 1).map(|(_, c)| *c) == Some('/') => {
                while i < chars.len() - 1 && chars[i].1 != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1).map(|(_, c)| *c) == Some('*') => {
                let start_line = line;
                let is_doc = chars.get(i + 2).map(|(_, c)| *c) == Some('*')
                    && chars.get(i + 3).map(|(_, c)| *c) != Some('/');
                let text_start_idx = i;
                i += 2;
                loop {
                    if i >= chars.len() - 1 {
                        return Err(LexError {
                            line: start_line,
                            start,
                            end: eof_offset,
                            message: "unterminated block comment".to_string(),
                        });
                    }
                    if chars[i].1 == '\n' {
                        line += 1;
                    }
                    if chars[i].1 == '*' && chars.get(i + 1).map(|(_, c)| *c) == Some('/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                if is_doc {
                    let text: String = chars[text_start_idx..i].iter().map(|(_, c)| *c).collect();
                    tokens.push(Token {
                        kind: TokenKind::DocComment(text),
                        line: start_line,
                        start: chars[text_start_idx].0,
                        end: chars[i].0,
                    });
                }
            }
            '.' => {
                i += 1;
                push!(TokenKind::Dot, start);
            }
            ';' => {
                i += 1;
                push!(TokenKind::Semi, start);
            }
            ',' => {
                i += 1;
                push!(TokenKind::Comma, start);
            }
            '=' => {
                i += 1;
                push!(TokenKind::Equals, start);
            }
            '{' => {
                i += 1;
                push!(TokenKind::LBrace, start);
            }
            '}' => {
                i += 1;
                push!(TokenKind::RBrace, start);
            }
            '(' => {
                i += 1;
                push!(TokenKind::LParen, start);
            }
            ')' => {
                i += 1;
                push!(TokenKind::RParen, start);
            }
            '[' => {
                i += 1;
                push!(TokenKind::LBracket, start);
            }
            ']' => {
                i += 1;
                push!(TokenKind::RBracket, start);
            }
            '<' => {
                i += 1;
                push!(TokenKind::Lt, start);
            }
            '>' => {
                i += 1;
                push!(TokenKind::Gt, start);
            }
            c if c.is_ascii_digit() => {
                let start_idx = i;
                while i < chars.len() - 1 && chars[i].1.is_ascii_digit() {
                    i += 1;
                }
                let text: String = chars[start_idx..i].iter().map(|(_, c)| *c).collect();
                let value: u32 = text.parse().map_err(|_| LexError {
                    line,
                    start,
                    end: chars[i].0,
                    message: format!("integer literal `{text}` out of range"),
                })?;
                push!(TokenKind::Integer(value), start);
            }
            c if c.is_alphabetic() || c == '_' => {
                let start_idx = i;
                while i < chars.len() - 1 && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                    i += 1;
                }
                let text: String = chars[start_idx..i].iter().map(|(_, c)| *c).collect();
                let kind = match text.as_str() {
                    "package" => TokenKind::Package,
                    "import" => TokenKind::Import,
                    "parcelable" => TokenKind::Parcelable,
                    "interface" => TokenKind::Interface,
                    "oneway" => TokenKind::Oneway,
                    "in" => TokenKind::In,
                    "out" => TokenKind::Out,
                    "inout" => TokenKind::Inout,
                    _ => TokenKind::Ident(text),
                };
                push!(kind, start);
            }
            other => {
                return Err(LexError {
                    line,
                    start,
                    end: chars[i + 1].0,
                    message: format!("unexpected character '{other}'"),
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        start: eof_offset,
        end: eof_offset,
    });
    Ok(tokens)
}
