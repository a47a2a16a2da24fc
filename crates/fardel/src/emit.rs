//! JavaScript source generation for assembled bundles
//!
//! The generator prints the tree back out as plain ES5, deterministically:
//! the same program always yields the same text, four-space indentation, one
//! statement per line, multiline object literals. Parentheses are inserted
//! where the grammar demands them (a function expression invoked in
//! statement position, operator precedence in nested binaries), not for
//! decoration.
//!
//! Generation is total: any tree the assembler can produce prints without
//! error. I/O lives behind the [`Emit`] seam so the artifact can go to a
//! file, a buffer, or a network response without the generator knowing.

use std::io;

use crate::ast::{
    Expr, ExprObject, LitValue, Program, PropertyKey, Stmt, StmtIf, StmtVarDecl,
};

/// Sink for finished bundles.
pub trait Emit {
    /// Write one bundle program to the sink.
    fn emit(&mut self, program: &Program) -> anyhow::Result<()>;
}

/// Emits each bundle it receives as source text on one output stream.
#[derive(Debug)]
pub struct SingleFileEmitter<W> {
    writer: W,
}

impl<W: io::Write> SingleFileEmitter<W> {
    /// Wrap an output stream.
    pub fn new(writer: W) -> Self {
        SingleFileEmitter { writer }
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Emit for SingleFileEmitter<W> {
    fn emit(&mut self, program: &Program) -> anyhow::Result<()> {
        let code = Generator::new().generate(program);
        self.writer.write_all(code.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Source text generator.
#[derive(Debug)]
pub struct Generator {
    output: String,
    indent_level: usize,
    indent_str: String,
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Generator {
            output: String::new(),
            indent_level: 0,
            indent_str: "    ".to_string(),
        }
    }

    /// Print a whole program. Every statement line ends in a newline, the
    /// last one included.
    pub fn generate(&mut self, program: &Program) -> String {
        for statement in &program.body {
            self.emit_stmt(statement);
        }
        self.output.clone()
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(stmt) => {
                self.write_indent();
                self.emit_statement_expr(&stmt.expression);
                self.writeln(";");
            }
            Stmt::VarDecl(decl) => {
                self.write_indent();
                self.emit_var_decl(decl);
                self.writeln(";");
            }
            Stmt::FunctionDecl(decl) => {
                self.write_indent();
                self.write("function ");
                self.write(&decl.name);
                self.write("(");
                self.emit_params(&decl.params);
                self.write(") ");
                self.emit_brace_body(&decl.body);
                self.writeln("");
            }
            Stmt::Return(stmt) => {
                self.write_indent();
                match &stmt.argument {
                    Some(argument) => {
                        self.write("return ");
                        self.emit_expr(argument);
                    }
                    None => self.write("return"),
                }
                self.writeln(";");
            }
            Stmt::If(stmt) => {
                self.write_indent();
                self.emit_if(stmt);
                self.writeln("");
            }
            Stmt::Block(block) => {
                self.write_indent();
                self.emit_brace_body(&block.body);
                self.writeln("");
            }
            Stmt::Empty(_) => {
                self.write_indent();
                self.writeln(";");
            }
        }
    }

    fn emit_var_decl(&mut self, decl: &StmtVarDecl) {
        self.write(&decl.kind);
        self.write(" ");
        for (i, declarator) in decl.declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&declarator.name);
            if let Some(init) = &declarator.init {
                self.write(" = ");
                self.emit_expr(init);
            }
        }
    }

    // Branches always print braced, a single-statement consequent included.
    fn emit_if(&mut self, stmt: &StmtIf) {
        self.write("if (");
        self.emit_expr(&stmt.test);
        self.write(") ");
        self.emit_branch(&stmt.consequent);
        if let Some(alternate) = &stmt.alternate {
            self.write(" else ");
            match alternate.as_ref() {
                Stmt::If(nested) => self.emit_if(nested),
                other => self.emit_branch(other),
            }
        }
    }

    fn emit_branch(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.emit_brace_body(&block.body),
            single => self.emit_brace_body(std::slice::from_ref(single)),
        }
    }

    /// `{}` when empty, otherwise one statement per indented line. Leaves the
    /// cursor after the closing brace.
    fn emit_brace_body(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.writeln("{");
        self.indent();
        for stmt in body {
            self.emit_stmt(stmt);
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    // An expression statement cannot start with `function` or `{`.
    fn emit_statement_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Function(_) | Expr::Object(_) => self.emit_parenthesized(expr),
            other => self.emit_expr(other),
        }
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(name) => self.write(&name.name),
            Expr::Lit(lit) => self.emit_literal(&lit.value),
            Expr::Call(call) => {
                self.emit_callee(&call.callee);
                self.write("(");
                for (i, argument) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(argument);
                }
                self.write(")");
            }
            Expr::Member(member) => {
                self.emit_member_object(&member.object);
                match member.property.as_ref() {
                    // a non-identifier property only round-trips computed
                    Expr::Name(name) if !member.computed => {
                        self.write(".");
                        self.write(&name.name);
                    }
                    property => {
                        self.write("[");
                        self.emit_expr(property);
                        self.write("]");
                    }
                }
            }
            Expr::Assign(assign) => {
                self.emit_expr(&assign.left);
                self.write(" = ");
                self.emit_expr(&assign.right);
            }
            Expr::Function(function) => {
                self.write("function (");
                self.emit_params(&function.params);
                self.write(") ");
                self.emit_brace_body(&function.body);
            }
            Expr::Object(object) => self.emit_object(object),
            Expr::Binary(binary) => {
                self.emit_binary_operand(&binary.left, &binary.operator, false);
                self.write(" ");
                self.write(&binary.operator);
                self.write(" ");
                self.emit_binary_operand(&binary.right, &binary.operator, true);
            }
            Expr::Unary(unary) => {
                self.write(&unary.operator);
                if unary.operator.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.write(" ");
                }
                self.emit_unary_operand(&unary.argument);
            }
        }
    }

    fn emit_object(&mut self, object: &ExprObject) {
        if object.properties.is_empty() {
            self.write("{}");
            return;
        }
        self.writeln("{");
        self.indent();
        let last = object.properties.len() - 1;
        for (i, property) in object.properties.iter().enumerate() {
            self.write_indent();
            match &property.key {
                PropertyKey::Lit { value } => self.emit_literal(value),
                PropertyKey::Name { name } => self.write(name),
            }
            self.write(": ");
            self.emit_expr(&property.value);
            self.writeln(if i < last { "," } else { "" });
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_params(&mut self, params: &[String]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(param);
        }
    }

    fn emit_literal(&mut self, value: &LitValue) {
        match value {
            LitValue::Null => self.write("null"),
            LitValue::Bool(true) => self.write("true"),
            LitValue::Bool(false) => self.write("false"),
            LitValue::Num(n) => self.emit_number(*n),
            LitValue::Str(s) => self.emit_string(s),
        }
    }

    fn emit_number(&mut self, n: f64) {
        if n.is_nan() {
            self.write("NaN");
        } else if n.is_infinite() {
            self.write(if n < 0.0 { "-Infinity" } else { "Infinity" });
        } else if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
            // integral values (uids above all) print without a fraction
            let text = format!("{}", n as i64);
            self.write(&text);
        } else {
            let text = format!("{n}");
            self.write(&text);
        }
    }

    fn emit_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                // U+2028/U+2029 are line terminators in JS source; a raw one
                // inside a string literal breaks the emitted script
                '\u{2028}' => self.output.push_str("\\u2028"),
                '\u{2029}' => self.output.push_str("\\u2029"),
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    fn emit_callee(&mut self, callee: &Expr) {
        match callee {
            Expr::Name(_) | Expr::Member(_) | Expr::Call(_) => self.emit_expr(callee),
            other => self.emit_parenthesized(other),
        }
    }

    fn emit_member_object(&mut self, object: &Expr) {
        match object {
            Expr::Name(_) | Expr::Member(_) | Expr::Call(_) => self.emit_expr(object),
            other => self.emit_parenthesized(other),
        }
    }

    fn emit_binary_operand(&mut self, operand: &Expr, parent_op: &str, is_right: bool) {
        let needs_parens = match operand {
            Expr::Assign(_) => true,
            Expr::Binary(child) => {
                match (binding_power(parent_op), binding_power(&child.operator)) {
                    (Some(parent), Some(child_power)) => {
                        child_power < parent || (child_power == parent && is_right)
                    }
                    _ => true,
                }
            }
            _ => false,
        };
        if needs_parens {
            self.emit_parenthesized(operand);
        } else {
            self.emit_expr(operand);
        }
    }

    fn emit_unary_operand(&mut self, operand: &Expr) {
        match operand {
            Expr::Assign(_) | Expr::Binary(_) | Expr::Unary(_) => self.emit_parenthesized(operand),
            other => self.emit_expr(other),
        }
    }

    fn emit_parenthesized(&mut self, expr: &Expr) {
        self.write("(");
        self.emit_expr(expr);
        self.write(")");
    }
}

fn binding_power(operator: &str) -> Option<u8> {
    let power = match operator {
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" | "===" | "!==" => 6,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => 7,
        "<<" | ">>" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => return None,
    };
    Some(power)
}
