//! In-place rewriting of require call sites
//!
//! Module bodies arrive with their require calls still naming source paths.
//! Inside the bundle those paths mean nothing; each call site is rewritten to
//! the uid of the sibling registry entry it resolved to, or replaced outright
//! with a null literal when there is no entry to point at. Sites are
//! addressed by node id, which survives cloning, so the plan recorded against
//! the original body applies cleanly to the copy spliced into the wrapper.

use crate::ast::{Expr, LitValue, Stmt};
use crate::ast_builder as builder;
use crate::module_registry::DependencySite;
use crate::types::{FxIndexMap, FxIndexSet, NodeId, Uid};

/// What to do with one require call site.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Overwrite the call's literal argument with this uid.
    Reference(Uid),
    /// Replace the entire call with a null literal.
    NullOut,
}

/// Build the rewrite plan for one module's dependency sites.
///
/// A site references its target only when `is_active` says the target will
/// actually be in the output; an unresolved dependency, and equally one that
/// resolved to a module later dropped as failed, is nulled out so the
/// artifact never requires a registry key that is not there.
pub fn rewrite_plan(
    deps: &[DependencySite],
    mut is_active: impl FnMut(&Uid) -> bool,
) -> FxIndexMap<NodeId, Rewrite> {
    let mut plan = FxIndexMap::default();
    for dep in deps {
        let rewrite = match &dep.resolved {
            Some(uid) if is_active(uid) => Rewrite::Reference(uid.clone()),
            _ => Rewrite::NullOut,
        };
        plan.insert(dep.call_site, rewrite);
    }
    plan
}

/// Apply a rewrite plan to a statement list, in place.
///
/// Returns the site ids that could not be applied, in ascending order: ids
/// absent from the tree, or present on a node that is not a call with a
/// literal first argument. `Ok(())` means the whole plan was applied.
pub fn apply_rewrites(
    body: &mut [Stmt],
    plan: &FxIndexMap<NodeId, Rewrite>,
) -> Result<(), Vec<NodeId>> {
    if plan.is_empty() {
        return Ok(());
    }
    let mut rewriter = Rewriter {
        plan,
        applied: FxIndexSet::default(),
    };
    rewriter.visit_stmts(body);
    if rewriter.applied.len() == plan.len() {
        return Ok(());
    }
    let mut missing: Vec<NodeId> = plan
        .keys()
        .filter(|id| !rewriter.applied.contains(*id))
        .copied()
        .collect();
    missing.sort_unstable();
    Err(missing)
}

struct Rewriter<'a> {
    plan: &'a FxIndexMap<NodeId, Rewrite>,
    applied: FxIndexSet<NodeId>,
}

impl Rewriter<'_> {
    fn visit_stmts(&mut self, stmts: &mut [Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Expr(stmt) => self.visit_expr(&mut stmt.expression),
            Stmt::VarDecl(decl) => {
                for declarator in &mut decl.declarations {
                    if let Some(init) = &mut declarator.init {
                        self.visit_expr(init);
                    }
                }
            }
            Stmt::FunctionDecl(decl) => self.visit_stmts(&mut decl.body),
            Stmt::Return(stmt) => {
                if let Some(argument) = &mut stmt.argument {
                    self.visit_expr(argument);
                }
            }
            Stmt::If(stmt) => {
                self.visit_expr(&mut stmt.test);
                self.visit_stmt(&mut stmt.consequent);
                if let Some(alternate) = &mut stmt.alternate {
                    self.visit_stmt(alternate);
                }
            }
            Stmt::Block(stmt) => self.visit_stmts(&mut stmt.body),
            Stmt::Empty(_) => {}
        }
    }

    // Children first, so a site nested under a call being nulled out is
    // still visited before the subtree is discarded.
    fn visit_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Call(call) => {
                self.visit_expr(&mut call.callee);
                for argument in &mut call.arguments {
                    self.visit_expr(argument);
                }
            }
            Expr::Member(member) => {
                self.visit_expr(&mut member.object);
                self.visit_expr(&mut member.property);
            }
            Expr::Assign(assign) => {
                self.visit_expr(&mut assign.left);
                self.visit_expr(&mut assign.right);
            }
            Expr::Function(function) => self.visit_stmts(&mut function.body),
            Expr::Object(object) => {
                for property in &mut object.properties {
                    self.visit_expr(&mut property.value);
                }
            }
            Expr::Binary(binary) => {
                self.visit_expr(&mut binary.left);
                self.visit_expr(&mut binary.right);
            }
            Expr::Unary(unary) => self.visit_expr(&mut unary.argument),
            Expr::Name(_) | Expr::Lit(_) => {}
        }

        let Expr::Call(call) = expr else { return };
        let id = call.node_index;
        match self.plan.get(&id) {
            Some(Rewrite::Reference(uid)) => {
                if let Some(Expr::Lit(lit)) = call.arguments.first_mut() {
                    lit.value = LitValue::from(uid);
                    self.applied.insert(id);
                }
            }
            Some(Rewrite::NullOut) => {
                *expr = builder::null_literal();
                self.applied.insert(id);
            }
            None => {}
        }
    }
}
