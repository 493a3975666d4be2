use super::*;
use crate::lexer::Keyword;

impl Parser {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> ParseResult<Node> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Node> {
        self.nested("expression", |parser| parser.parse_binary_expr(min_bp))
    }

    fn parse_binary_expr(&mut self, min_bp: u8) -> ParseResult<Node> {
        let mut lhs = self.parse_postfix_expr()?;

        loop {
            let (l_bp, r_bp) = match self.current_token.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token is a valid binop
            let op = match self.next().kind {
                TokenKind::Operator(op) => op,
                _ => unreachable!("binop_bp only accepts operators"),
            };

            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = Node::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parses a primary expression followed by any number of argument lists (e.g. `f(1)(2)`).
    fn parse_postfix_expr(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_primary_expr()?;
        while self.eat(TokenKind::OpenParen) {
            let args = self.parse_call_args()?;
            expr = Node::call(expr, args);
        }
        Ok(expr)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Node> {
        match self.current_token.kind {
            TokenKind::Number | TokenKind::String => self.parse_literal_expr(),
            TokenKind::Identifier => {
                let ident = self.next().text;
                Ok(Node::Identifier(ident))
            }
            TokenKind::OpenParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::Keyword(Keyword::Call) => self.parse_call_expr(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /* Expressions.Literals */
    /// Parses a literal expression.
    /// A literal can be either a number literal or a string literal.
    fn parse_literal_expr(&mut self) -> ParseResult<Node> {
        let token = self.next();
        match token.kind {
            TokenKind::Number => match token.text.parse::<f64>() {
                Ok(val) => Ok(Node::number(val)),
                Err(_) => Err(SyntaxError::new(
                    format!("invalid number literal `{}`", token.text),
                    &token.text,
                    token.span,
                )
                .into()),
            },
            // the lexer guarantees both quotes are present
            TokenKind::String => Ok(Node::string(&token.text[1..token.text.len() - 1])),
            _ => unreachable!("only called on literal tokens"),
        }
    }

    /* Expressions.Call */
    /// Parses an explicit call: `call callee(args)`.
    fn parse_call_expr(&mut self) -> ParseResult<Node> {
        self.next(); // eat `call`
        match self.nested("expression", Self::parse_postfix_expr)? {
            call @ Node::Call { .. } => Ok(call),
            _ => Err(self.unexpected("`(`")),
        }
    }

    /// Parses the arguments of a call after its `(` has been eaten, including the closing `)`.
    fn parse_call_args(&mut self) -> ParseResult<Vec<Node>> {
        let mut args = Vec::new();

        if !self.eat(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expr()?);

                if self.eat(TokenKind::CloseParen) {
                    break;
                } else if !self.eat(TokenKind::Comma) {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        Ok(args)
    }
}
