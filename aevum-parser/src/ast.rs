use std::fmt;
use std::rc::Rc;

/// A literal value, as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

/// A name in source together with the line it appears on.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A parenthesized expression (e.g. `(1 + 2)`).
    Grouping(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: usize,
    },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
        line: usize,
    },
    /// A short-circuiting `and` / `or`.
    Logical {
        lhs: Box<Expr>,
        op: LogicalOp,
        rhs: Box<Expr>,
    },
    /// An identifier (e.g. `foo`).
    Variable(Ident),
    /// Assignment to an existing binding (e.g. `foo = 1`).
    Assign { ident: Ident, value: Box<Expr> },
    /// A call expression (e.g. `foo(1, bar)`). `line` is the line of the closing paren.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub ident: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    ExprStmt(Expr),
    Print {
        expr: Expr,
        line: usize,
    },
    VarDeclaration {
        ident: Ident,
        initializer: Option<Expr>,
    },
    /// A block introduces a new scope.
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    /// Shared with every function value created from this declaration.
    FnDeclaration(Rc<FunctionDecl>),
    ReturnStmt {
        value: Option<Expr>,
        line: usize,
    },
}

/// A whole program (or one REPL chunk).
pub type Program = Vec<Stmt>;

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(val) => write!(f, "{}", val),
            Literal::Str(val) => write!(f, "{:?}", val),
            Literal::Bool(val) => write!(f, "{}", val),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        })
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        })
    }
}

/// Parenthesized prefix form, e.g. `(+ 1 (* 2 3))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::Grouping(inner) => write!(f, "(group {})", inner),
            Expr::Unary { op, operand, .. } => write!(f, "({} {})", op, operand),
            Expr::Binary { lhs, op, rhs, .. } => write!(f, "({} {} {})", op, lhs, rhs),
            Expr::Logical { lhs, op, rhs } => write!(f, "({} {} {})", op, lhs, rhs),
            Expr::Variable(ident) => write!(f, "{}", ident.name),
            Expr::Assign { ident, value } => write!(f, "(= {} {})", ident.name, value),
            Expr::Call { callee, args, .. } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::ExprStmt(expr) => write!(f, "(expr {})", expr),
            Stmt::Print { expr, .. } => write!(f, "(print {})", expr),
            Stmt::VarDeclaration {
                ident,
                initializer: Some(initializer),
            } => write!(f, "(var {} {})", ident.name, initializer),
            Stmt::VarDeclaration { ident, .. } => write!(f, "(var {})", ident.name),
            Stmt::Block(body) => {
                write!(f, "(block")?;
                for stmt in body {
                    write!(f, " {}", stmt)?;
                }
                write!(f, ")")
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "(if {} {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " {}", else_branch)?;
                }
                write!(f, ")")
            }
            Stmt::While { condition, body } => write!(f, "(while {} {})", condition, body),
            Stmt::FnDeclaration(decl) => {
                let params: Vec<&str> = decl.params.iter().map(|p| p.name.as_str()).collect();
                write!(f, "(fun {} ({})", decl.ident.name, params.join(" "))?;
                for stmt in &decl.body {
                    write!(f, " {}", stmt)?;
                }
                write!(f, ")")
            }
            Stmt::ReturnStmt { value: Some(value), .. } => write!(f, "(return {})", value),
            Stmt::ReturnStmt { value: None, .. } => write!(f, "(return)"),
        }
    }
}
