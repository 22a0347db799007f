//! Parser for the mesh description language.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{MeshError, Result};

/// Parser for mesh descriptions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
        }
    }

    /// Parse the entire description.
    pub fn parse(&mut self) -> Result<MeshAst> {
        let mut ast = MeshAst::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    if ast.mesh_count.is_none() {
                        return Err(MeshError::parse(
                            self.current.line,
                            "'.meshes' must be declared before any element",
                        ));
                    }
                    let element = self.parse_element()?;
                    ast.elements.push(element);
                }
                _ => {
                    return Err(MeshError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(MeshError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        if ast.mesh_count.is_none() {
            return Err(MeshError::parse(self.current.line, "missing '.meshes' directive"));
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(MeshError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn parse_directive(&mut self, ast: &mut MeshAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".meshes" => {
                if ast.mesh_count.is_some() {
                    return Err(MeshError::parse(line, "'.meshes' declared more than once"));
                }
                ast.mesh_count = Some(self.parse_mesh_number(line)?);
            }
            _ => {
                return Err(MeshError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_element(&mut self) -> Result<ElementDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = ElementKind::from_keyword(&keyword).ok_or_else(|| {
            MeshError::parse(line, format!("unknown element type '{}'", keyword))
        })?;

        let mut meshes = Vec::with_capacity(kind.mesh_count());
        for _ in 0..kind.mesh_count() {
            meshes.push(self.parse_mesh_number(line)?);
        }

        let mut values = vec![self.parse_number(line)?];
        if kind.accepts_list() {
            while matches!(self.current.kind, TokenKind::Comma | TokenKind::Number) {
                if self.current.kind == TokenKind::Comma {
                    self.advance()?;
                }
                values.push(self.parse_number(line)?);
            }
        }

        Ok(ElementDef {
            kind,
            meshes,
            values,
            line,
        })
    }

    fn parse_mesh_number(&mut self, line: usize) -> Result<usize> {
        let tok = self.expect(TokenKind::Number)?;
        tok.text
            .parse::<usize>()
            .map_err(|_| MeshError::parse(line, format!("invalid mesh number: {}", tok.text)))
    }

    fn parse_number(&mut self, line: usize) -> Result<f64> {
        if self.current.kind != TokenKind::Number {
            return Err(MeshError::parse(
                line,
                format!("expected a value, got {:?}", self.current.text),
            ));
        }
        let text = self.current.text.clone();
        self.advance()?;
        parse_value(&text).ok_or_else(|| MeshError::parse(line, format!("invalid number: {}", text)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    #[test]
    fn test_parse_elements() {
        let input = ".meshes 2\nR 1 2, 5 10k\nV 2 -5\nI 1 3\nCR 1 2 4.7";
        let ast = parse(input).unwrap();
        assert_eq!(ast.mesh_count, Some(2));
        assert_eq!(ast.elements.len(), 4);

        assert_eq!(ast.elements[0].kind, ElementKind::Resistor);
        assert_eq!(ast.elements[0].meshes, vec![1]);
        assert_eq!(ast.elements[0].values, vec![2.0, 5.0, 10_000.0]);
        assert_eq!(ast.elements[0].line, 2);

        assert_eq!(ast.elements[1].values, vec![-5.0]);
        assert_eq!(ast.elements[2].kind, ElementKind::CurrentSource);
        assert_eq!(ast.elements[3].meshes, vec![1, 2]);
        assert_eq!(ast.elements[3].values, vec![4.7]);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# Two-loop ladder\n\n.meshes 1 ; one loop\nR 1 10 # load\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.elements.len(), 1);
    }

    #[test]
    fn test_missing_meshes() {
        let err = parse("# nothing\n").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { .. }));

        let err = parse("R 1 10\n.meshes 1").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_meshes() {
        let err = parse(".meshes 1\n.meshes 2").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_unknown_element() {
        let err = parse(".meshes 1\nL 1 10m").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = parse(".meshes 1\nR 1 ten").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_single_value_elements_reject_lists() {
        let err = parse(".meshes 2\nI 1 3, 4").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_invalid_mesh_number() {
        let err = parse(".meshes 2\nR 1.5 10").unwrap_err();
        assert!(matches!(err, MeshError::ParseError { line: 2, .. }));
        assert!(parse(".meshes -1").is_err());
    }

    #[test]
    fn test_expect_reports_kind() {
        let mut parser = Parser::new(Lexer::new(".meshes"));
        let err = parser.parse().unwrap_err();
        assert!(err.to_string().contains("expected Number"));
    }
}
