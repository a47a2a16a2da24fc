//! Require discovery visitor that finds dependency call sites in a module
//! body, including those nested within functions and blocks.
//!
//! Discovery only records *where* a by-name require lives; matching the name
//! to a target module uid is the resolution stage's concern. The collected
//! `(node id, name)` pairs are what that stage turns into the module's
//! dependency sites.

use crate::ast::{Expr, LitValue, Program, Stmt};
use crate::types::NodeId;

/// A `require("name")` call site discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireSite {
    /// Node id of the call expression. Dummy ids are never reported; run the
    /// body through [`crate::ast_indexer::NodeIndexer`] first.
    pub call_site: NodeId,
    /// The literal name argument, as written in the source.
    pub name: String,
}

/// Collects every `require` call with a literal string argument.
///
/// Calls with a non-literal argument (dynamic requires) are skipped: they
/// cannot be rewritten to a sibling uid and are left for the host environment
/// to deal with.
#[derive(Debug, Default)]
pub struct RequireCollector {
    sites: Vec<RequireSite>,
}

impl RequireCollector {
    /// Walk `program` and return the discovered sites in traversal order.
    pub fn collect(program: &Program) -> Vec<RequireSite> {
        let mut collector = RequireCollector::default();
        for stmt in &program.body {
            collector.visit_stmt(stmt);
        }
        log::debug!("discovered {} require call site(s)", collector.sites.len());
        collector.sites
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(s) => self.visit_expr(&s.expression),
            Stmt::VarDecl(s) => {
                for decl in &s.declarations {
                    if let Some(init) = &decl.init {
                        self.visit_expr(init);
                    }
                }
            }
            Stmt::FunctionDecl(s) => {
                for nested in &s.body {
                    self.visit_stmt(nested);
                }
            }
            Stmt::Return(s) => {
                if let Some(argument) = &s.argument {
                    self.visit_expr(argument);
                }
            }
            Stmt::If(s) => {
                self.visit_expr(&s.test);
                self.visit_stmt(&s.consequent);
                if let Some(alternate) = &s.alternate {
                    self.visit_stmt(alternate);
                }
            }
            Stmt::Block(s) => {
                for nested in &s.body {
                    self.visit_stmt(nested);
                }
            }
            Stmt::Empty(_) => {}
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Call(call) = expr {
            if let Some(name) = require_name(call.callee.as_ref(), &call.arguments) {
                self.sites.push(RequireSite {
                    call_site: call.node_index,
                    name: name.to_owned(),
                });
            }
        }

        match expr {
            Expr::Name(_) | Expr::Lit(_) => {}
            Expr::Call(e) => {
                self.visit_expr(&e.callee);
                for argument in &e.arguments {
                    self.visit_expr(argument);
                }
            }
            Expr::Member(e) => {
                self.visit_expr(&e.object);
                self.visit_expr(&e.property);
            }
            Expr::Assign(e) => {
                self.visit_expr(&e.left);
                self.visit_expr(&e.right);
            }
            Expr::Function(e) => {
                for nested in &e.body {
                    self.visit_stmt(nested);
                }
            }
            Expr::Object(e) => {
                for prop in &e.properties {
                    self.visit_expr(&prop.value);
                }
            }
            Expr::Binary(e) => {
                self.visit_expr(&e.left);
                self.visit_expr(&e.right);
            }
            Expr::Unary(e) => self.visit_expr(&e.argument),
        }
    }
}

/// The literal name of a `require("name")` call, if `callee`/`arguments`
/// form one.
fn require_name<'a>(callee: &Expr, arguments: &'a [Expr]) -> Option<&'a str> {
    match callee {
        Expr::Name(n) if n.name == "require" => {}
        _ => return None,
    }
    match arguments.first() {
        Some(Expr::Lit(lit)) => match &lit.value {
            LitValue::Str(name) => Some(name),
            _ => None,
        },
        _ => None,
    }
}
