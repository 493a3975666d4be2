use super::*;
use crate::lexer::Keyword;

impl Parser {
    /// Parses a top level statement. Bare expressions are wrapped in [`Node::ExprStmt`].
    pub fn parse_stmt(&mut self) -> ParseResult<Node> {
        match self.current_token.kind {
            TokenKind::Keyword(Keyword::Function)
            | TokenKind::Keyword(Keyword::If)
            | TokenKind::Keyword(Keyword::While) => self.parse_body(),
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Identifier
            | TokenKind::OpenParen
            | TokenKind::Keyword(Keyword::Call) => Ok(Node::expr_stmt(self.parse_expr()?)),
            _ => Err(self.unexpected_token()),
        }
    }

    /// Parses the body of a function, if or while:
    /// a single declaration, statement or bare expression.
    pub fn parse_body(&mut self) -> ParseResult<Node> {
        self.nested("statement", |parser| match parser.current_token.kind {
            TokenKind::Keyword(Keyword::Function) => parser.parse_fn_declaration(),
            TokenKind::Keyword(Keyword::If) => parser.parse_if_stmt(),
            TokenKind::Keyword(Keyword::While) => parser.parse_while_stmt(),
            _ => parser.parse_expr(),
        })
    }

    fn parse_ident(&mut self, expected: &str) -> ParseResult<String> {
        Ok(self.expect(TokenKind::Identifier, expected)?.text)
    }

    fn parse_fn_declaration(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword(Keyword::Function), "`function`")?;
        let ident = self.parse_ident("function name")?;

        self.expect(TokenKind::OpenParen, "`(`")?;
        let mut params = Vec::new();
        if !self.eat(TokenKind::CloseParen) {
            loop {
                params.push(self.parse_ident("parameter name")?);

                if self.eat(TokenKind::CloseParen) {
                    break;
                } else if !self.eat(TokenKind::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        let body = self.parse_body()?;
        Ok(Node::function(ident, params, body))
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword(Keyword::If), "`if`")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Keyword(Keyword::Then), "`then`")?;
        let consequent = self.parse_body()?;
        let alternate = if self.eat(TokenKind::Keyword(Keyword::Else)) {
            Some(self.parse_body()?)
        } else {
            None
        };
        Ok(Node::if_stmt(condition, consequent, alternate))
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Keyword(Keyword::While), "`while`")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Keyword(Keyword::Do), "`do`")?;
        let body = self.parse_body()?;
        Ok(Node::while_stmt(condition, body))
    }
}
