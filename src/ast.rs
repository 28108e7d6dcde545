// Sirocco Abstract Syntax Tree

#[derive(Debug, Clone)]
pub enum Stmt {
    // Expression statement: evaluate for side effect, discard result
    Expr(Expr),

    // var/final/const a = 1, b;  — one entry per declared name
    VarDecl {
        modifier: VarModifier,
        decls: Vec<(String, Option<Expr>)>,
    },

    // Named function declaration (top-level or local)
    FunDecl(FunDecl),

    // { ... } — runs in a fresh child scope
    Block(Vec<Stmt>),

    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While {
        cond: Expr,
        body: Box<Stmt>,
    },

    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },

    // for (init; cond; update, ...) body
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },

    // for (x in iterable) body
    ForIn {
        var: String,
        iterable: Expr,
        body: Box<Stmt>,
    },

    Return(Option<Expr>),
    Break,
    Continue,

    Try {
        body: Vec<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarModifier {
    Var,
    Final,
    Const,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    // `on Type` restriction; recognized syntactically, refused at runtime
    pub exception_type: Option<String>,
    pub param: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct FunDecl {
    pub name: String,
    pub params: Vec<String>,
    // Declaration used [] / {} parameter syntax; refused when the closure
    // is constructed
    pub optional_params: bool,
    pub body: FunBody,
}

#[derive(Debug, Clone)]
pub enum FunBody {
    // `=> expr` — the function's value is the expression's value
    Expr(Box<Expr>),
    // `{ ... }` — the function's value comes from `return`, or null
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    // Literals
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),

    // "a ${b} c" — literal and expression parts in source order
    StringInterp(Vec<StringPart>),

    Ident(String),

    Binary {
        lhs: Box<Expr>,
        op: BinOp,
        rhs: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    // ++x / --x / x++ / x--
    IncDec {
        target: Box<Expr>,
        dec: bool,
        prefix: bool,
    },

    // cond ? a : b
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    // target = value, or compound: target op= value
    Assign {
        target: Box<Expr>,
        op: Option<BinOp>,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    // obj.name
    Property {
        object: Box<Expr>,
        name: String,
    },

    // obj.name(args)
    MethodCall {
        object: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },

    // [elements]
    ListLit(Vec<Element>),

    // {elements} — a Map or a Set, classified after staging
    SetOrMapLit(Vec<Element>),

    // (params) => expr  or  (params) { ... }
    FunLit {
        params: Vec<String>,
        optional_params: bool,
        body: FunBody,
    },
}

#[derive(Debug, Clone)]
pub enum StringPart {
    Lit(String),
    Expr(Expr),
}

/// One element of a collection literal, expanded into staged entries
/// left to right at evaluation time.
#[derive(Debug, Clone)]
pub enum Element {
    Expr(Expr),
    // key: value — only inside braces
    Pair(Expr, Expr),
    // ...expr / ...?expr
    Spread { expr: Expr, null_aware: bool },
    // ?expr — contributes the value only if non-null
    NullAware(Expr),
    // if (cond) element else element
    If {
        cond: Expr,
        then_branch: Box<Element>,
        else_branch: Option<Box<Element>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add, Sub, Mul, Div, TruncDiv, Mod,
    Eq, NotEq, Lt, LtEq, Gt, GtEq,
    And, Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add      => "+",
            BinOp::Sub      => "-",
            BinOp::Mul      => "*",
            BinOp::Div      => "/",
            BinOp::TruncDiv => "~/",
            BinOp::Mod      => "%",
            BinOp::Eq       => "==",
            BinOp::NotEq    => "!=",
            BinOp::Lt       => "<",
            BinOp::LtEq     => "<=",
            BinOp::Gt       => ">",
            BinOp::GtEq     => ">=",
            BinOp::And      => "&&",
            BinOp::Or       => "||",
        }
    }
}
