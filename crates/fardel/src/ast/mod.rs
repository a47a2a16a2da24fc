//! The structural tree: an ECMAScript-flavored syntax representation used for
//! cloning, splicing, and literal substitution.
//!
//! This is deliberately a subset of the full language, enough for the four
//! structural templates plus the module bodies an upstream parser hands over.
//! Every node carries a [`NodeId`](crate::types::NodeId); ids are assigned by
//! [`crate::ast_indexer`] (synthetic nodes keep the dummy id) and survive
//! `Clone`, which is what lets dependency call sites recorded against a module
//! body still be addressable after the body has been spliced into the output.
//!
//! `Clone` is the deep copy: templates and bodies are immutable seeds that are
//! always cloned before mutation. The serde representation follows the
//! estree-style `"type"` tag (node ids are skipped), so providers working
//! from pre-parsed JSON fragments can satisfy the template contract without
//! this crate shipping a parser.

pub mod expression;
pub mod statement;

use serde::{Deserialize, Serialize};

pub use self::expression::{
    Expr, ExprAssign, ExprBinary, ExprCall, ExprFunction, ExprLit, ExprMember, ExprName,
    ExprObject, ExprUnary, LitValue, Property, PropertyKey,
};
pub use self::statement::{
    Stmt, StmtBlock, StmtEmpty, StmtExpr, StmtFunctionDecl, StmtIf, StmtReturn, StmtVarDecl,
    VarDeclarator,
};
use crate::types::NodeId;

/// One complete program fragment: a whole artifact, a template, or a module
/// body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statement list.
    pub body: Vec<Stmt>,
    #[serde(skip)]
    pub node_index: NodeId,
}

impl Program {
    /// Create a program from a statement list.
    pub fn new(body: Vec<Stmt>) -> Self {
        Program {
            body,
            node_index: NodeId::DUMMY,
        }
    }
}
