//! AST builder module for creating synthetic tree nodes
//!
//! This module provides factory functions for creating nodes that don't
//! originate from source files. All synthetic nodes use the dummy node id to
//! clearly indicate they are generated; only parsed nodes that upstream
//! stages address (dependency call sites) need real ids.

use crate::ast::{
    Expr, ExprAssign, ExprBinary, ExprCall, ExprFunction, ExprLit, ExprMember, ExprName,
    ExprObject, ExprUnary, LitValue, Program, Property, PropertyKey, Stmt, StmtBlock, StmtExpr,
    StmtFunctionDecl, StmtIf, StmtReturn, StmtVarDecl, VarDeclarator,
};
use crate::types::NodeId;

/// Create an identifier expression: `name`
pub fn name(name: &str) -> Expr {
    Expr::Name(ExprName {
        name: name.to_owned(),
        node_index: NodeId::DUMMY,
    })
}

/// Create a literal expression from a raw value.
pub fn literal(value: LitValue) -> Expr {
    Expr::Lit(ExprLit {
        value,
        node_index: NodeId::DUMMY,
    })
}

/// Create a `null` literal.
pub fn null_literal() -> Expr {
    literal(LitValue::Null)
}

/// Create a string literal: `"value"`
pub fn string_literal(value: &str) -> Expr {
    literal(LitValue::Str(value.to_owned()))
}

/// Create a numeric literal: `42`
pub fn number_literal(value: f64) -> Expr {
    literal(LitValue::Num(value))
}

/// Create a function call: `callee(arg, ...)`
pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call(ExprCall {
        callee: Box::new(callee),
        arguments,
        node_index: NodeId::DUMMY,
    })
}

/// Create a static member access: `object.property`
pub fn member(object: Expr, property: &str) -> Expr {
    Expr::Member(ExprMember {
        object: Box::new(object),
        property: Box::new(name(property)),
        computed: false,
        node_index: NodeId::DUMMY,
    })
}

/// Create a computed member access: `object[property]`
pub fn computed_member(object: Expr, property: Expr) -> Expr {
    Expr::Member(ExprMember {
        object: Box::new(object),
        property: Box::new(property),
        computed: true,
        node_index: NodeId::DUMMY,
    })
}

/// Create an assignment expression: `left = right`
pub fn assign(left: Expr, right: Expr) -> Expr {
    Expr::Assign(ExprAssign {
        left: Box::new(left),
        right: Box::new(right),
        node_index: NodeId::DUMMY,
    })
}

/// Create an anonymous function expression: `function (params) { body }`
pub fn function_expr(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(ExprFunction {
        params: params.iter().map(|p| (*p).to_owned()).collect(),
        body,
        node_index: NodeId::DUMMY,
    })
}

/// Create an object literal: `{ property, ... }`
pub fn object(properties: Vec<Property>) -> Expr {
    Expr::Object(ExprObject {
        properties,
        node_index: NodeId::DUMMY,
    })
}

/// Create one `key: value` property with a literal key.
pub fn property(key: LitValue, value: Expr) -> Property {
    Property {
        key: PropertyKey::Lit { value: key },
        value,
        node_index: NodeId::DUMMY,
    }
}

/// Create a binary operation: `left operator right`
pub fn binary(operator: &str, left: Expr, right: Expr) -> Expr {
    Expr::Binary(ExprBinary {
        operator: operator.to_owned(),
        left: Box::new(left),
        right: Box::new(right),
        node_index: NodeId::DUMMY,
    })
}

/// Create a unary operation: `operator argument`
pub fn unary(operator: &str, argument: Expr) -> Expr {
    Expr::Unary(ExprUnary {
        operator: operator.to_owned(),
        argument: Box::new(argument),
        node_index: NodeId::DUMMY,
    })
}

/// Wrap an expression in statement position: `expression;`
pub fn expr_stmt(expression: Expr) -> Stmt {
    Stmt::Expr(StmtExpr {
        expression: Box::new(expression),
        node_index: NodeId::DUMMY,
    })
}

/// Create one declarator for a variable declaration.
pub fn declarator(name: &str, init: Option<Expr>) -> VarDeclarator {
    VarDeclarator {
        name: name.to_owned(),
        init: init.map(Box::new),
        node_index: NodeId::DUMMY,
    }
}

/// Create a `var` declaration from a declarator list.
pub fn var_decl(declarations: Vec<VarDeclarator>) -> Stmt {
    Stmt::VarDecl(StmtVarDecl {
        kind: "var".to_owned(),
        declarations,
        node_index: NodeId::DUMMY,
    })
}

/// Create a named function declaration: `function name(params) { body }`
pub fn function_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::FunctionDecl(StmtFunctionDecl {
        name: name.to_owned(),
        params: params.iter().map(|p| (*p).to_owned()).collect(),
        body,
        node_index: NodeId::DUMMY,
    })
}

/// Create a return statement: `return argument;`
pub fn return_stmt(argument: Option<Expr>) -> Stmt {
    Stmt::Return(StmtReturn {
        argument: argument.map(Box::new),
        node_index: NodeId::DUMMY,
    })
}

/// Create an if statement.
pub fn if_stmt(test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Stmt {
    Stmt::If(StmtIf {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
        node_index: NodeId::DUMMY,
    })
}

/// Create a block statement: `{ body }`
pub fn block(body: Vec<Stmt>) -> Stmt {
    Stmt::Block(StmtBlock {
        body,
        node_index: NodeId::DUMMY,
    })
}

/// Create a program from a statement list.
pub fn program(body: Vec<Stmt>) -> Program {
    Program::new(body)
}

/// Create a `require("name")` call, the shape module bodies use to reference
/// dependencies by name before rewriting.
pub fn require_call(module_name: &str) -> Expr {
    call(name("require"), vec![string_literal(module_name)])
}
