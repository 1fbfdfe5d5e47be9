use indentphp_ast::*;

use crate::indent::IndentContext;

/// Render a parsed file in canonical form.
///
/// The result always ends with exactly one `\n` unless the last HTML run
/// already supplies one.
pub fn print_file(file: &File, ctx: &mut IndentContext) -> String {
    let mut printer = Printer::new(ctx);
    printer.file(file);
    let mut out = printer.finish();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub struct Printer<'ctx> {
    out: String,
    ctx: &'ctx mut IndentContext,
}

impl<'ctx> Printer<'ctx> {
    pub fn new(ctx: &'ctx mut IndentContext) -> Self {
        Self {
            out: String::new(),
            ctx,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_indent(&mut self) {
        let indent = self.ctx.indent();
        self.out.push_str(&indent);
    }

    /// Render `f` one level deeper.
    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.ctx.push();
        f(self);
        self.ctx.pop();
    }

    fn join<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            each(self, item);
        }
    }

    // =========================================================================
    // File structure
    // =========================================================================

    pub fn file(&mut self, file: &File) {
        for part in &file.parts {
            match part {
                FilePart::Html(text) => self.write(text),
                FilePart::Script(script) => self.script(script),
            }
        }
    }

    /// Always the long open tag and an explicit close tag, whatever the
    /// source used.
    fn script(&mut self, script: &Script) {
        self.write("<?php\n");
        self.stmt_list(&script.stmts);
        self.write("?>");
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn stmt_list(&mut self, stmts: &[Stmt]) {
        for (i, stmt) in stmts.iter().enumerate() {
            self.stmt(stmt);
            let separated = matches!(stmt.kind, StmtKind::If(_) | StmtKind::Function(_));
            if separated && i + 1 < stmts.len() {
                self.write("\n");
            }
        }
    }

    pub fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Nop => {
                self.write_indent();
                self.write(";\n");
            }
            StmtKind::Return => {
                self.write_indent();
                self.write("return;\n");
            }
            StmtKind::Block(stmts) => self.braced(stmts),
            StmtKind::If(if_stmt) => self.if_stmt(if_stmt),
            StmtKind::Function(func) => self.function(func),
            StmtKind::Class(class) => self.class(class),
        }
    }

    /// `{`, the statements one level deeper, then `}`, each brace on its own
    /// line at the current depth.
    fn braced(&mut self, stmts: &[Stmt]) {
        self.write_indent();
        self.write("{\n");
        self.nested(|p| p.stmt_list(stmts));
        self.write_indent();
        self.write("}\n");
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.write_indent();
        self.write("if (");
        self.expr(&if_stmt.condition);
        self.write(")\n");
        self.branch(&if_stmt.then_branch);

        if let Some(else_branch) = &if_stmt.else_branch {
            self.write_indent();
            self.write("else\n");
            self.branch(else_branch);
        }
    }

    /// A block body brings its own braces and stays at the `if` depth;
    /// anything else is indented one level.
    fn branch(&mut self, body: &Stmt) {
        if matches!(body.kind, StmtKind::Block(_)) {
            self.stmt(body);
        } else {
            self.nested(|p| p.stmt(body));
        }
    }

    fn function(&mut self, func: &FunctionDecl) {
        self.write_indent();
        self.write("function ");
        self.signature(func.by_ref, &func.name, &func.params);
        self.write("\n");
        self.braced(&func.body);
    }

    fn signature(&mut self, by_ref: bool, name: &str, params: &[Param]) {
        if by_ref {
            self.write("&");
        }
        self.write(name);
        self.write("(");
        self.join(params, |p, param| p.param(param));
        self.write(")");
    }

    fn param(&mut self, param: &Param) {
        if let Some(type_hint) = &param.type_hint {
            self.write(type_hint);
            self.write(" ");
        }
        if param.by_ref {
            self.write("&");
        }
        self.write(&param.name);
        if let Some(default) = &param.default {
            self.write(" = ");
            self.scalar(default);
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    fn class(&mut self, class: &ClassDecl) {
        self.write("\n");
        self.write_indent();
        if let Some(modifier) = class.modifier {
            self.write(modifier.as_str());
            self.write(" ");
        }
        self.write(class.kind.as_str());
        self.write(" ");
        self.write(&class.name);
        if !class.extends.is_empty() {
            self.write(" extends ");
            self.write(&class.extends.join(", "));
        }
        if !class.implements.is_empty() {
            self.write(" implements ");
            self.write(&class.implements.join(", "));
        }
        self.write("\n");

        self.write_indent();
        self.write("{\n");
        self.nested(|p| {
            for (i, member) in class.members.iter().enumerate() {
                if i > 0 {
                    p.write("\n");
                }
                p.member(member);
                p.write("\n");
            }
        });
        self.write_indent();
        self.write("}\n");
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.write(modifier.as_str());
            self.write(" ");
        }
    }

    /// A member without its trailing newline.
    fn member(&mut self, member: &ClassMember) {
        self.write_indent();
        match &member.kind {
            ClassMemberKind::Property(prop) => {
                self.modifiers(&prop.modifiers);
                self.join(&prop.items, |p, item| {
                    p.write(&item.name);
                    if let Some(default) = &item.default {
                        p.write(" = ");
                        p.scalar(default);
                    }
                });
                self.write(";");
            }
            ClassMemberKind::Constants(items) => {
                self.write("const ");
                self.join(items, |p, item| {
                    p.write(&item.name);
                    p.write(" = ");
                    p.scalar(&item.value);
                });
                self.write(";");
            }
            ClassMemberKind::Method(method) => {
                self.modifiers(&method.modifiers);
                self.write("function ");
                self.signature(method.by_ref, &method.name, &method.params);
                match &method.body {
                    None => self.write(";"),
                    Some(body) => {
                        self.write("\n");
                        self.write_indent();
                        self.write("{\n");
                        self.nested(|p| p.stmt_list(body));
                        self.write_indent();
                        self.write("}");
                    }
                }
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Variable(name) => self.write(name),
            ExprKind::ArrayAccess(access) => {
                self.expr(&access.array);
                self.write("[");
                if let Some(index) = &access.index {
                    self.expr(index);
                }
                self.write("]");
            }
            ExprKind::Assign(assign) => {
                self.expr(&assign.target);
                self.write(" = ");
                self.expr(&assign.value);
            }
            ExprKind::Ternary(ternary) => {
                self.expr(&ternary.condition);
                self.write(" ? ");
                self.expr(&ternary.then_expr);
                self.write(" : ");
                self.expr(&ternary.else_expr);
            }
            ExprKind::Isset(vars) => {
                self.write("isset(");
                self.join(vars, |p, var| p.expr(var));
                self.write(")");
            }
            ExprKind::Empty(var) => {
                self.write("empty(");
                self.expr(var);
                self.write(")");
            }
        }
    }

    pub fn scalar(&mut self, scalar: &StaticScalar) {
        if scalar.negated {
            self.write("-");
        }
        match &scalar.kind {
            ScalarKind::Literal(text) | ScalarKind::Constant(text) => self.write(text),
            ScalarKind::ClassConstant { class, name } => {
                self.write(class);
                self.write("::");
                self.write(name);
            }
            ScalarKind::Array(elements) => {
                self.write("array(");
                self.join(elements, |p, element| {
                    if let Some(key) = &element.key {
                        p.scalar(key);
                        p.write(" => ");
                    }
                    p.scalar(&element.value);
                });
                self.write(")");
            }
        }
    }
}
