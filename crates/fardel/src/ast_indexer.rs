//! AST indexing module for assigning stable node ids to tree nodes.
//!
//! Upstream stages address dependency call sites by node id, so every parsed
//! module body gets indexed once before resolution records its rewrite
//! targets. Ids are assigned in traversal order, survive cloning and
//! splicing, and are never reassigned by the assembler; indexing after a
//! body has been spliced is neither needed nor done.
//!
//! Each module is conventionally given its own id range so sites from
//! different bodies can never collide in one registry.

use crate::ast::{Expr, Program, Property, Stmt};
use crate::types::NodeId;

/// Number of ids reserved per module range.
pub const MODULE_INDEX_RANGE: u32 = 1_000_000;

/// Assigns sequential node ids across one program.
#[derive(Debug)]
pub struct NodeIndexer {
    next: u32,
}

impl Default for NodeIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIndexer {
    /// Indexer starting at id 0.
    pub fn new() -> Self {
        NodeIndexer { next: 0 }
    }

    /// Indexer starting at `base`, e.g. `module_ordinal * MODULE_INDEX_RANGE`.
    pub fn with_base(base: u32) -> Self {
        NodeIndexer { next: base }
    }

    /// Assign ids to every node of `program`, in traversal order.
    /// Returns the number of nodes indexed.
    pub fn index_program(&mut self, program: &mut Program) -> u32 {
        let before = self.next;
        program.node_index = self.bump();
        for stmt in &mut program.body {
            self.index_stmt(stmt);
        }
        self.next - before
    }

    fn bump(&mut self) -> NodeId {
        let id = NodeId::new(self.next);
        self.next += 1;
        id
    }

    fn index_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Expr(s) => {
                s.node_index = self.bump();
                self.index_expr(&mut s.expression);
            }
            Stmt::VarDecl(s) => {
                s.node_index = self.bump();
                for decl in &mut s.declarations {
                    decl.node_index = self.bump();
                    if let Some(init) = &mut decl.init {
                        self.index_expr(init);
                    }
                }
            }
            Stmt::FunctionDecl(s) => {
                s.node_index = self.bump();
                for nested in &mut s.body {
                    self.index_stmt(nested);
                }
            }
            Stmt::Return(s) => {
                s.node_index = self.bump();
                if let Some(argument) = &mut s.argument {
                    self.index_expr(argument);
                }
            }
            Stmt::If(s) => {
                s.node_index = self.bump();
                self.index_expr(&mut s.test);
                self.index_stmt(&mut s.consequent);
                if let Some(alternate) = &mut s.alternate {
                    self.index_stmt(alternate);
                }
            }
            Stmt::Block(s) => {
                s.node_index = self.bump();
                for nested in &mut s.body {
                    self.index_stmt(nested);
                }
            }
            Stmt::Empty(s) => {
                s.node_index = self.bump();
            }
        }
    }

    fn index_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Name(e) => {
                e.node_index = self.bump();
            }
            Expr::Lit(e) => {
                e.node_index = self.bump();
            }
            Expr::Call(e) => {
                e.node_index = self.bump();
                self.index_expr(&mut e.callee);
                for argument in &mut e.arguments {
                    self.index_expr(argument);
                }
            }
            Expr::Member(e) => {
                e.node_index = self.bump();
                self.index_expr(&mut e.object);
                self.index_expr(&mut e.property);
            }
            Expr::Assign(e) => {
                e.node_index = self.bump();
                self.index_expr(&mut e.left);
                self.index_expr(&mut e.right);
            }
            Expr::Function(e) => {
                e.node_index = self.bump();
                for nested in &mut e.body {
                    self.index_stmt(nested);
                }
            }
            Expr::Object(e) => {
                e.node_index = self.bump();
                for Property { value, node_index, .. } in &mut e.properties {
                    *node_index = self.bump();
                    self.index_expr(value);
                }
            }
            Expr::Binary(e) => {
                e.node_index = self.bump();
                self.index_expr(&mut e.left);
                self.index_expr(&mut e.right);
            }
            Expr::Unary(e) => {
                e.node_index = self.bump();
                self.index_expr(&mut e.argument);
            }
        }
    }
}

/// Extract the module ordinal from a node id assigned with per-module bases.
pub fn module_ordinal_of(id: NodeId) -> u32 {
    id.as_u32() / MODULE_INDEX_RANGE
}
