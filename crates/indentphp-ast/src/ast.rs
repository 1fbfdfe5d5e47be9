use serde::Serialize;

use crate::Span;

/// The root AST node: a whole source file as an ordered run of HTML
/// passthrough and PHP scripts.
#[derive(Debug, Clone, Serialize)]
pub struct File {
    pub parts: Vec<FilePart>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum FilePart {
    /// Text outside of PHP tags, kept verbatim.
    Html(String),
    Script(Script),
}

/// One `<?php ... ?>` region.
#[derive(Debug, Clone, Serialize)]
pub struct Script {
    pub stmts: Vec<Stmt>,
    /// Spelling of the open tag in the source. Output always uses `<?php`.
    pub open_tag: OpenTag,
    /// `false` when the file ended before a `?>` was seen.
    pub closed: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpenTag {
    /// `<?php`
    Long,
    /// `<?`
    Short,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum StmtKind {
    /// Block statement: `{ stmts }`
    Block(Vec<Stmt>),

    /// `if (cond) stmt [else stmt]`
    If(IfStmt),

    /// `return;`
    Return,

    /// Empty statement `;`
    Nop,

    /// Function declaration
    Function(FunctionDecl),

    /// Class or interface declaration
    Class(ClassDecl),
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub by_ref: bool,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub name: String,
    pub by_ref: bool,
    /// Class name or `array`.
    pub type_hint: Option<String>,
    pub default: Option<StaticScalar>,
    pub span: Span,
}

// =============================================================================
// Classes
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub name: String,
    pub modifier: Option<ClassModifier>,
    /// At most one name for a class, any number for an interface.
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
}

impl ClassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassModifier {
    Abstract,
    Final,
}

impl ClassModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassModifier::Abstract => "abstract",
            ClassModifier::Final => "final",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassMember {
    pub kind: ClassMemberKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum ClassMemberKind {
    /// `public static $a = 1, $b;`
    Property(PropertyDecl),
    /// `const A = 1, B = 2;`
    Constants(Vec<ConstItem>),
    Method(MethodDecl),
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDecl {
    /// In source order; never empty.
    pub modifiers: Vec<Modifier>,
    pub items: Vec<PropertyItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyItem {
    pub name: String,
    pub default: Option<StaticScalar>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstItem {
    pub name: String,
    pub value: StaticScalar,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub by_ref: bool,
    pub name: String,
    pub params: Vec<Param>,
    /// `None` for a body-less (abstract or interface) method.
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    /// Legacy `var`, only valid on properties.
    Var,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Abstract => "abstract",
            Modifier::Final => "final",
            Modifier::Var => "var",
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum ExprKind {
    /// `$name`, stored with its sigil.
    Variable(String),

    /// `$a[expr]` or `$a[]`
    ArrayAccess(ArrayAccessExpr),

    /// `variable = expr`
    Assign(AssignExpr),

    /// `cond ? a : b`
    Ternary(TernaryExpr),

    /// `isset($a, $b)`
    Isset(Vec<Expr>),

    /// `empty($a)`
    Empty(Box<Expr>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TernaryExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
}

// =============================================================================
// Static scalars
// =============================================================================

/// A constant value allowed in default-value and initializer positions.
#[derive(Debug, Clone, Serialize)]
pub struct StaticScalar {
    pub kind: ScalarKind,
    /// Set by an odd number of leading unary `-`.
    pub negated: bool,
    pub span: Span,
}

impl StaticScalar {
    pub fn new(kind: ScalarKind, span: Span) -> Self {
        Self {
            kind,
            negated: false,
            span,
        }
    }

    pub fn negate(&mut self) {
        self.negated = !self.negated;
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ScalarKind {
    /// Number, quoted string or magic constant, as written.
    Literal(String),
    /// Bare identifier referring to a constant.
    Constant(String),
    /// `Class::NAME`
    ClassConstant { class: String, name: String },
    /// `array(...)`
    Array(Vec<ArrayElement>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrayElement {
    pub key: Option<StaticScalar>,
    pub value: StaticScalar,
    pub span: Span,
}
