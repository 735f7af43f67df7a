//! Recursive descent over the token stream from `lexer::lex`, producing a
//! package name, an import list, and a `Document`. On any syntax error a
//! `Parse` or `Structural` diagnostic is returned and no partial document is
//! handed back -- a parse failure is fatal, so there is no reason to carry a
//! best-effort half-built tree past this module.

use std::path::Path;

use miette::{NamedSource, SourceSpan};

use crate::doc_comments::leading_comment;
use crate::error::CoreError;
use crate::lexer::{self, Token, TokenKind};
use crate::model::ast::{Argument, Direction, Document, Import, Interface, Method, Parcelable, QualifiedName, TypeRef};

pub struct ParsedFile {
    pub package: QualifiedName,
    pub imports: Vec<Import>,
    pub document: Document,
}

pub fn parse(source: &str, file: &Path) -> Result<ParsedFile, CoreError> {
    let file_name = file.display().to_string();
    let tokens = lexer::lex(source).map_err(|e| CoreError::Parse {
        file: file_name.clone(),
        line: e.line,
        message: e.message,
        src: Some(NamedSource::new(file_name.clone(), source.to_string())),
        span: Some(SourceSpan::new(e.start.into(), e.end.saturating_sub(e.start))),
    })?;
    let mut p = Parser {
        tokens,
        pos: 0,
        file: file_name,
        source: source.to_string(),
    };
    p.parse_file()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: String,
    source: String,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    /// Build a `Parse` diagnostic pointing at the current token's byte span,
    /// so `miette` can render an underlined snippet.
    fn err(&self, message: impl Into<String>) -> CoreError {
        let tok = &self.tokens[self.pos];
        let len = tok.end.saturating_sub(tok.start).max(1);
        CoreError::Parse {
            file: self.file.clone(),
            line: tok.line,
            message: message.into(),
            src: Some(NamedSource::new(self.file.clone(), self.source.clone())),
            span: Some(SourceSpan::new(tok.start.into(), len)),
        }
    }

    fn structural_err(&self, line: usize, message: impl Into<String>) -> CoreError {
        CoreError::Structural {
            file: self.file.clone(),
            line,
            message: message.into(),
        }
    }

    /// Advance past any run of `DocComment` tokens so the next `peek()`
    /// lands on the declaration they precede, with `tokens[pos - 1]` left
    /// as the comment `leading_comment` looks backward from.
    fn skip_doc_comments(&mut self) {
        while matches!(self.peek(), TokenKind::DocComment(_)) {
            self.advance();
        }
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, CoreError> {
        if self.peek() == kind {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected {what}, found {:?}", self.peek())))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, usize), CoreError> {
        let line = self.line();
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, line))
            }
            other => Err(self.err(format!("expected {what}, found {other:?}"))),
        }
    }

    fn parse_qualified_name(&mut self) -> Result<QualifiedName, CoreError> {
        let (first, _) = self.expect_ident("identifier")?;
        let mut segments = vec![first];
        while *self.peek() == TokenKind::Dot {
            self.advance();
            let (seg, _) = self.expect_ident("identifier after '.'")?;
            segments.push(seg);
        }
        Ok(QualifiedName::new(segments))
    }

    fn parse_file(&mut self) -> Result<ParsedFile, CoreError> {
        self.expect(&TokenKind::Package, "'package'")?;
        let package = self.parse_qualified_name()?;
        self.expect(&TokenKind::Semi, "';' after package declaration")?;

        let mut imports = Vec::new();
        while *self.peek() == TokenKind::Import {
            let line = self.line();
            self.advance();
            let class_name = self.parse_qualified_name()?;
            self.expect(&TokenKind::Semi, "';' after import")?;
            imports.push(Import::new(Path::new(&self.file).to_path_buf(), class_name, line));
        }

        self.skip_doc_comments();
        let document = match self.peek().clone() {
            TokenKind::Oneway | TokenKind::Interface => {
                let iface = self.parse_interface(&package)?;
                Document::Interface(iface)
            }
            TokenKind::Parcelable => {
                let mut parcelables = vec![self.parse_parcelable(&package)?];
                loop {
                    self.skip_doc_comments();
                    if *self.peek() != TokenKind::Parcelable {
                        break;
                    }
                    parcelables.push(self.parse_parcelable(&package)?);
                }
                Document::Parcelables(parcelables)
            }
            other => {
                return Err(self.structural_err(
                    self.line(),
                    format!("expected an interface or parcelable declaration, found {other:?}"),
                ));
            }
        };

        if *self.peek() != TokenKind::Eof {
            return Err(self.structural_err(
                self.line(),
                "a file may declare only one interface, or one-or-more parcelables, but not both",
            ));
        }

        Ok(ParsedFile {
            package,
            imports,
            document,
        })
    }

    fn parse_parcelable(&mut self, package: &QualifiedName) -> Result<Parcelable, CoreError> {
        let line = self.line();
        self.expect(&TokenKind::Parcelable, "'parcelable'")?;
        let (name, _) = self.expect_ident("parcelable name")?;
        self.expect(&TokenKind::Semi, "';' after parcelable declaration")?;
        Ok(Parcelable {
            name,
            package: package.clone(),
            line,
        })
    }

    fn parse_interface(&mut self, package: &QualifiedName) -> Result<Interface, CoreError> {
        let token_index = self.pos;
        let line = self.line();
        let oneway = if *self.peek() == TokenKind::Oneway {
            self.advance();
            true
        } else {
            false
        };
        self.expect(&TokenKind::Interface, "'interface'")?;
        let (name, _) = self.expect_ident("interface name")?;
        self.expect(&TokenKind::LBrace, "'{'")?;

        let mut methods = Vec::new();
        loop {
            self.skip_doc_comments();
            if *self.peek() == TokenKind::RBrace {
                break;
            }
            methods.push(self.parse_method()?);
        }
        self.expect(&TokenKind::RBrace, "'}'")?;

        Ok(Interface {
            name,
            package: package.clone(),
            oneway,
            methods,
            line,
            leading_comment: leading_comment(&self.tokens, token_index),
        })
    }

    fn parse_method(&mut self) -> Result<Method, CoreError> {
        let token_index = self.pos;
        let line = self.line();
        let oneway = if *self.peek() == TokenKind::Oneway {
            self.advance();
            true
        } else {
            false
        };
        let return_type = self.parse_type()?;
        let (name, _) = self.expect_ident("method name")?;
        self.expect(&TokenKind::LParen, "'(' after method name")?;

        let mut args = Vec::new();
        if *self.peek() != TokenKind::RParen {
            args.push(self.parse_argument()?);
            while *self.peek() == TokenKind::Comma {
                self.advance();
                args.push(self.parse_argument()?);
            }
        }
        self.expect(&TokenKind::RParen, "')' after argument list")?;

        let explicit_id = if *self.peek() == TokenKind::Equals {
            self.advance();
            match self.peek().clone() {
                TokenKind::Integer(n) => {
                    self.advance();
                    Some(n)
                }
                other => return Err(self.err(format!("expected integer id, found {other:?}"))),
            }
        } else {
            None
        };
        self.expect(&TokenKind::Semi, "';' after method declaration")?;

        Ok(Method {
            oneway,
            return_type,
            name,
            args,
            explicit_id,
            assigned_id: None,
            line,
            leading_comment: leading_comment(&self.tokens, token_index),
        })
    }

    fn parse_argument(&mut self) -> Result<Argument, CoreError> {
        let (direction, direction_explicit) = match self.peek() {
            TokenKind::In => {
                self.advance();
                (Direction::In, true)
            }
            TokenKind::Out => {
                self.advance();
                (Direction::Out, true)
            }
            TokenKind::Inout => {
                self.advance();
                (Direction::InOut, true)
            }
            _ => (Direction::In, false),
        };
        let ty = self.parse_type()?;
        let (name, line) = self.expect_ident("argument name")?;
        Ok(Argument {
            direction,
            direction_explicit,
            ty,
            name,
            line,
        })
    }

    /// Parses a type name, including an optional generic parameter list
    /// (`List<String>`, `Map<String,Foo>`) and an optional trailing `[]`.
    /// Generic parameters are folded into the type's textual name rather
    /// than a structured field, matching `add_container`'s contract of
    /// inspecting "a textual type name".
    fn parse_type(&mut self) -> Result<TypeRef, CoreError> {
        let token_index = self.pos;
        let line = self.line();
        let name = self.parse_type_text()?;
        let mut is_array = false;
        if *self.peek() == TokenKind::LBracket {
            self.advance();
            self.expect(&TokenKind::RBracket, "']' to close array type")?;
            is_array = true;
        }
        Ok(TypeRef {
            name,
            line,
            is_array,
            leading_comment: leading_comment(&self.tokens, token_index),
        })
    }

    fn parse_type_text(&mut self) -> Result<String, CoreError> {
        let qn = self.parse_qualified_name()?;
        let mut text = qn.dot_form();
        if *self.peek() == TokenKind::Lt {
            self.advance();
            let mut params = vec![self.parse_type_text()?];
            while *self.peek() == TokenKind::Comma {
                self.advance();
                params.push(self.parse_type_text()?);
            }
            self.expect(&TokenKind::Gt, "'>' to close generic parameter list")?;
            text.push('<');
            text.push_str(&params.join(","));
            text.push('>');
        }
        Ok(text)
    }
}
