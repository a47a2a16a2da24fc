//! Statement nodes of the structural tree.

use serde::{Deserialize, Serialize};

use super::expression::Expr;
use crate::types::NodeId;

/// Statement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// `expression;`
    #[serde(rename = "ExpressionStatement")]
    Expr(StmtExpr),
    /// `var a = 1, b;`
    #[serde(rename = "VariableDeclaration")]
    VarDecl(StmtVarDecl),
    /// `function name(params) { body }`
    #[serde(rename = "FunctionDeclaration")]
    FunctionDecl(StmtFunctionDecl),
    /// `return argument;`
    #[serde(rename = "ReturnStatement")]
    Return(StmtReturn),
    /// `if (test) consequent else alternate`
    #[serde(rename = "IfStatement")]
    If(StmtIf),
    /// `{ body }`
    #[serde(rename = "BlockStatement")]
    Block(StmtBlock),
    /// `;`
    #[serde(rename = "EmptyStatement")]
    Empty(StmtEmpty),
}

/// An expression in statement position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtExpr {
    pub expression: Box<Expr>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A variable declaration. Only `var` is produced by the assembler; the kind
/// is carried verbatim for bodies that use other kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtVarDecl {
    pub kind: String,
    pub declarations: Vec<VarDeclarator>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// One `name = init` declarator of a variable declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub name: String,
    pub init: Option<Box<Expr>>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A named function declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtFunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A return statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtReturn {
    pub argument: Option<Box<Expr>>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtIf {
    pub test: Box<Expr>,
    pub consequent: Box<Stmt>,
    pub alternate: Option<Box<Stmt>>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A block statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtBlock {
    pub body: Vec<Stmt>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// An empty statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtEmpty {
    #[serde(skip)]
    pub node_index: NodeId,
}
