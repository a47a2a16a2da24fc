//! Expression nodes of the structural tree.

use serde::{Deserialize, Serialize};

use super::statement::Stmt;
use crate::types::{NodeId, Uid};

/// Expression node.
///
/// The serde shape is estree-style: the variant is carried in a `"type"`
/// field and the node's own fields sit beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// `name`
    #[serde(rename = "Identifier")]
    Name(ExprName),
    /// `null`, `true`, `42`, `"text"`
    #[serde(rename = "Literal")]
    Lit(ExprLit),
    /// `callee(arg, ...)`
    #[serde(rename = "CallExpression")]
    Call(ExprCall),
    /// `object.property` or `object[property]`
    #[serde(rename = "MemberExpression")]
    Member(ExprMember),
    /// `left = right`
    #[serde(rename = "AssignmentExpression")]
    Assign(ExprAssign),
    /// `function (params) { body }`
    #[serde(rename = "FunctionExpression")]
    Function(ExprFunction),
    /// `{ key: value, ... }`
    #[serde(rename = "ObjectExpression")]
    Object(ExprObject),
    /// `left op right`
    #[serde(rename = "BinaryExpression")]
    Binary(ExprBinary),
    /// `op argument`
    #[serde(rename = "UnaryExpression")]
    Unary(ExprUnary),
}

impl Expr {
    /// The node id of this expression.
    pub fn node_index(&self) -> NodeId {
        match self {
            Expr::Name(e) => e.node_index,
            Expr::Lit(e) => e.node_index,
            Expr::Call(e) => e.node_index,
            Expr::Member(e) => e.node_index,
            Expr::Assign(e) => e.node_index,
            Expr::Function(e) => e.node_index,
            Expr::Object(e) => e.node_index,
            Expr::Binary(e) => e.node_index,
            Expr::Unary(e) => e.node_index,
        }
    }
}

/// An identifier reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprName {
    pub name: String,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprLit {
    pub value: LitValue,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// The value carried by a literal node.
///
/// `Null` doubles as the substitution value for nulled-out call sites, and
/// `Num`/`Str` carry uids when they are copied into key slots and require
/// arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LitValue {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl From<&Uid> for LitValue {
    fn from(uid: &Uid) -> Self {
        match uid {
            Uid::Int(n) => LitValue::Num(*n as f64),
            Uid::Str(s) => LitValue::Str(s.clone()),
        }
    }
}

/// A call expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprCall {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A member access, `object.property` when static and `object[property]`
/// when computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprMember {
    pub object: Box<Expr>,
    pub property: Box<Expr>,
    pub computed: bool,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A plain assignment. Only the `=` operator is modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprAssign {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// An anonymous function expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprFunction {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// An object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprObject {
    pub properties: Vec<Property>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// One `key: value` entry of an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// Property key: a literal (the shape registration entries use for uids) or a
/// bare identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    #[serde(rename = "Literal")]
    Lit {
        value: LitValue,
    },
    #[serde(rename = "Identifier")]
    Name {
        name: String,
    },
}

/// A binary operation. The operator is carried verbatim (`"+"`, `"==="`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprBinary {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[serde(skip)]
    pub node_index: NodeId,
}

/// A unary operation (`"!"`, `"-"`, `"typeof"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprUnary {
    pub operator: String,
    pub argument: Box<Expr>,
    #[serde(skip)]
    pub node_index: NodeId,
}
