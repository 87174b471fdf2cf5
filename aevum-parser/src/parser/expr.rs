use super::*;
use crate::ast::{BinaryOp, Ident, Literal, LogicalOp, UnaryOp};

/// Binding power of the operand of a prefix operator. Higher than any infix operator.
const PREFIX_BP: u8 = 15;

/// What an infix operator token builds.
#[derive(Debug, Clone, Copy)]
enum InfixOp {
    Assign,
    Logical(LogicalOp),
    Binary(BinaryOp),
}

/// Returns the infix operator and its binding power or `None` if the token is not an infix operator.
/// Binding power `0` is reserved for accepting any expression.
/// Assignment (`TokenKind::Equal`) has the lowest precedence with `(2, 1)` and is the only right associative operator.
fn infix_op(kind: TokenKind) -> Option<(InfixOp, (u8, u8))> {
    let op = match kind {
        /* Assignment */
        TokenKind::Equal => (InfixOp::Assign, (2, 1)),
        /* Logical */
        TokenKind::Or => (InfixOp::Logical(LogicalOp::Or), (3, 4)),
        TokenKind::And => (InfixOp::Logical(LogicalOp::And), (5, 6)),
        /* Equality */
        TokenKind::EqualEqual => (InfixOp::Binary(BinaryOp::Equal), (7, 8)),
        TokenKind::BangEqual => (InfixOp::Binary(BinaryOp::NotEqual), (7, 8)),
        /* Ordering */
        TokenKind::Greater => (InfixOp::Binary(BinaryOp::Greater), (9, 10)),
        TokenKind::GreaterEqual => (InfixOp::Binary(BinaryOp::GreaterEqual), (9, 10)),
        TokenKind::Less => (InfixOp::Binary(BinaryOp::Less), (9, 10)),
        TokenKind::LessEqual => (InfixOp::Binary(BinaryOp::LessEqual), (9, 10)),
        /* Additive */
        TokenKind::Plus => (InfixOp::Binary(BinaryOp::Add), (11, 12)),
        TokenKind::Minus => (InfixOp::Binary(BinaryOp::Sub), (11, 12)),
        /* Multiplicative */
        TokenKind::Star => (InfixOp::Binary(BinaryOp::Mul), (13, 14)),
        TokenKind::Slash => (InfixOp::Binary(BinaryOp::Div), (13, 14)),
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_prefix_expr()?;

        loop {
            let (op, (l_bp, r_bp)) = match infix_op(self.peek().kind) {
                Some(op) => op,
                None => break, // not a valid infix operator, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.peek() is a valid infix operator
            let op_token = self.next();
            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = match op {
                InfixOp::Assign => self.finish_assignment(lhs, &op_token, rhs),
                InfixOp::Logical(op) => Expr::Logical {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                },
                InfixOp::Binary(op) => Expr::Binary {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                    line: op_token.line,
                },
            }
        }

        Ok(lhs)
    }

    /// Only a variable can be assigned to. Anything else is reported without unwinding
    /// and the target expression is kept as is.
    fn finish_assignment(&mut self, target: Expr, equals: &Token, value: Expr) -> Expr {
        match target {
            Expr::Variable(ident) => Expr::Assign {
                ident,
                value: Box::new(value),
            },
            target => {
                self.error_at(equals, "Invalid assignment target.");
                target
            }
        }
    }

    /// Parses a prefix (unary) expression or falls through to a call expression.
    fn parse_prefix_expr(&mut self) -> ParseResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            _ => return self.parse_call_expr(),
        };
        let op_token = self.next();
        let operand = self.parse_expr_bp(PREFIX_BP)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            line: op_token.line,
        })
    }

    /// Parses a primary expression followed by any number of argument lists.
    fn parse_call_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        while self.eat(TokenKind::LeftParen) {
            let mut args = Vec::new();
            if !self.check(TokenKind::RightParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let paren = self.expect(TokenKind::RightParen, "Expect ')' after arguments.")?;

            expr = Expr::Call {
                callee: Box::new(expr),
                args,
                line: paren.line,
            };
        }

        Ok(expr)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::Number | TokenKind::Str | TokenKind::True | TokenKind::False => {
                let token = self.next();
                Ok(Expr::Literal(token.literal.unwrap_or(Literal::Nil)))
            }
            TokenKind::Nil => {
                self.next();
                Ok(Expr::Literal(Literal::Nil))
            }
            TokenKind::Identifier => {
                let token = self.next();
                Ok(Expr::Variable(Ident {
                    name: token.lexeme,
                    line: token.line,
                }))
            }
            TokenKind::LeftParen => {
                self.next();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(inner)))
            }
            _ => Err(self.unexpected("Expect expression.")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn expr(source: &str) -> String {
        let source = source.into();
        let ast = Parser::new(&source).parse_expr();
        assert!(source.has_no_errors(), "{}", source.errors);
        ast.expect("expression should parse").to_string()
    }

    #[test]
    fn test_literal() {
        assert_snapshot!(expr("true"), @"true");
        assert_snapshot!(expr("false"), @"false");
        assert_snapshot!(expr("nil"), @"nil");
        assert_snapshot!(expr("1"), @"1");
        assert_snapshot!(expr("2.0"), @"2");
        assert_snapshot!(expr("2.5"), @"2.5");
        assert_snapshot!(expr(r#""hi there""#), @r###""hi there""###);
    }

    #[test]
    fn test_binary_expr() {
        assert_snapshot!(expr("1 + 1"), @"(+ 1 1)");
        assert_snapshot!(expr("1 + 2 * 3"), @"(+ 1 (* 2 3))");
        assert_snapshot!(expr("(1 + 2) * 3"), @"(* (group (+ 1 2)) 3)");
        assert_snapshot!(expr("1 == 2 - 1"), @"(== 1 (- 2 1))");
        assert_snapshot!(expr("1 < 2 == true"), @"(== (< 1 2) true)");
        assert_snapshot!(expr("2 * 2 * 2"), @"(* (* 2 2) 2)"); // should be (2 * 2) * 2
        assert_snapshot!(expr("8 / 4 - 1 - 1"), @"(- (- (/ 8 4) 1) 1)");
    }

    #[test]
    fn test_unary_expr() {
        assert_snapshot!(expr("-a * b"), @"(* (- a) b)");
        assert_snapshot!(expr("!!true"), @"(! (! true))");
        assert_snapshot!(expr("-(1 + 2)"), @"(- (group (+ 1 2)))");
    }

    #[test]
    fn test_logical_expr() {
        assert_snapshot!(expr("a or b and c"), @"(or a (and b c))");
        assert_snapshot!(expr("a and b or c"), @"(or (and a b) c)");
        assert_snapshot!(expr("a == b and c"), @"(and (== a b) c)");
    }

    #[test]
    fn test_assignment() {
        assert_snapshot!(expr("a = b = c"), @"(= a (= b c))"); // should be a = (b = c)
        assert_snapshot!(expr("x = 1 + 2"), @"(= x (+ 1 2))");
        assert_snapshot!(expr("x = a or b"), @"(= x (or a b))");
    }

    #[test]
    fn test_identifier() {
        assert_snapshot!(expr("foo"), @"foo");
    }

    #[test]
    fn test_fn_call() {
        assert_snapshot!(expr("foo()"), @"(call foo)");
        assert_snapshot!(expr("foo(1, bar)"), @"(call foo 1 bar)");
        assert_snapshot!(expr("foo(1, bar, baz())"), @"(call foo 1 bar (call baz))");
        assert_snapshot!(expr("make()()"), @"(call (call make))");
        assert_snapshot!(expr("-f(1)"), @"(- (call f 1))");
    }

    #[test]
    fn test_missing_paren() {
        let source = "foo(1, 2".into();
        let ast = Parser::new(&source).parse_expr();
        assert_eq!(ast, Err(ParseError));
        assert_eq!(
            source.errors.to_string(),
            "[line 1] Error at end: Expect ')' after arguments.\n"
        );
    }
}
