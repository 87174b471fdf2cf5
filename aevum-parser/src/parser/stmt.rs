use super::*;
use crate::ast::{FunctionDecl, Ident, Literal};
use std::rc::Rc;

impl<'a> Parser<'a> {
    /// Parses a declaration (or statement).
    /// On a grammar violation, the error has already been reported; the parser resynchronizes
    /// at the next statement boundary and `None` is returned.
    pub fn parse_declaration(&mut self) -> Option<Stmt> {
        let result = match self.peek().kind {
            TokenKind::Var => self.parse_var_declaration(),
            TokenKind::Fun => self.parse_fn_declaration(),
            _ => self.parse_stmt(),
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::LeftBrace => {
                self.next();
                Ok(Stmt::Block(self.parse_block()?))
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parses the declarations of a block up to and including the closing brace.
    /// The opening brace must already be consumed.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                body.push(stmt);
            }
        }
        self.expect(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(body)
    }

    fn parse_ident(&mut self, message: &str) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Identifier, message)?;
        Ok(Ident {
            name: token.lexeme,
            line: token.line,
        })
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Var, "Expect 'var'.")?;
        let ident = self.parse_ident("Expect variable name.")?;
        let initializer = if self.eat(TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::VarDeclaration { ident, initializer })
    }

    fn parse_fn_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Fun, "Expect 'fun'.")?;
        let ident = self.parse_ident("Expect function name.")?;

        self.expect(TokenKind::LeftParen, "Expect '(' after function name.")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_ident("Expect parameter name.")?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.expect(TokenKind::LeftBrace, "Expect '{' before function body.")?;
        let body = self.parse_block()?;

        Ok(Stmt::FnDeclaration(Rc::new(FunctionDecl {
            ident,
            params,
            body,
        })))
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect(TokenKind::Print, "Expect 'print'.")?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print {
            expr,
            line: keyword.line,
        })
    }

    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::ExprStmt(expr))
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If, "Expect 'if'.")?;
        self.expect(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::While, "Expect 'while'.")?;
        self.expect(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { condition, body })
    }

    /// `for` has no node of its own; it is desugared into a block holding the initializer and a `while` loop.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::For, "Expect 'for'.")?;
        self.expect(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = match self.peek().kind {
            TokenKind::Semicolon => {
                self.next();
                None
            }
            TokenKind::Var => Some(self.parse_var_declaration()?),
            _ => Some(self.parse_expr_stmt()?),
        };

        let condition = if self.check(TokenKind::Semicolon) {
            Expr::Literal(Literal::Bool(true))
        } else {
            self.parse_expr()?
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.parse_stmt()?;
        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::ExprStmt(increment)]);
        }

        let mut desugared = Vec::with_capacity(2);
        desugared.extend(initializer);
        desugared.push(Stmt::While {
            condition,
            body: Box::new(body),
        });
        Ok(Stmt::Block(desugared))
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect(TokenKind::Return, "Expect 'return'.")?;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::ReturnStmt {
            value,
            line: keyword.line,
        })
    }
}
