//! Semantic analyzer
//!
//! Walks the parse tree once, building a typed AST while resolving
//! identifiers against lexical scopes and enforcing the type rules. The
//! first violation aborts the run; no partial AST is returned.

use crate::error::{CompileError, Result};
use funktion_core::ast::{AddOp, BitOp, CmpOp, MulOp, Node, ShiftOp, UnaryOp};
use funktion_core::cst::{ParseNode, SyntaxKind};
use funktion_core::symbol::{Entity, Scope};
use funktion_core::{SourceLoc, Type};

/// Analyze a parse tree into a typed AST
pub fn analyze(tree: &ParseNode) -> Result<Node> {
    Analyzer::new().analyze(tree)
}

/// Semantic analyzer
pub struct Analyzer {
    /// Current scope chain, child frames pushed around function bodies
    scope: Scope,
}

impl Analyzer {
    /// Create a new analyzer with the pre-seeded root scope
    pub fn new() -> Self {
        Self {
            scope: Scope::root(),
        }
    }

    /// Analyze a parse tree; consumes the analyzer since scopes are
    /// single-use
    pub fn analyze(mut self, tree: &ParseNode) -> Result<Node> {
        self.walk(tree)
    }

    fn walk(&mut self, node: &ParseNode) -> Result<Node> {
        match node.kind {
            SyntaxKind::Program => self.program(node),
            SyntaxKind::FuncDef => self.func_def(node),
            SyntaxKind::FuncCall => self.func_call(node),
            SyntaxKind::Expr => self.expr(node),
            SyntaxKind::SliceExpr => self.slice(node),
            SyntaxKind::CondExpr => self.cond(node),
            SyntaxKind::BitwiseExpr => self.bitwise(node),
            SyntaxKind::ShiftExpr => self.shift(node),
            SyntaxKind::AddExpr => self.additive(node),
            SyntaxKind::MulExpr => self.multiplicative(node),
            SyntaxKind::Factor => self.factor(node),
            SyntaxKind::Primary => {
                let inner = self.child(node, 0)?;
                self.walk(inner)
            }
            SyntaxKind::PrintStmt => {
                let expr = self.child(node, 0)?;
                Ok(Node::print(self.walk(expr)?))
            }
            SyntaxKind::StepCall => self.step_call(node),
            SyntaxKind::InputStmt => self.input_stmt(node),
            SyntaxKind::TimeCall => self.time_call(node),
            SyntaxKind::GlobalRange => self.global_range(node),
            SyntaxKind::NumRange => self.num_range(node),
            SyntaxKind::CharRange => self.char_range(node),
            SyntaxKind::Timestep => {
                let value = self.child(node, 0)?;
                Ok(Node::timestep(self.walk(value)?))
            }
            SyntaxKind::Number => Ok(Node::Number(self.number_value(node)?)),
            SyntaxKind::StringLiteral => Ok(Node::Str(node.text().to_string())),
            SyntaxKind::CharLiteral => {
                let c = node
                    .char_value()
                    .map_err(|e| self.malformed(node, &e.to_string()))?;
                Ok(Node::Char(c))
            }
            SyntaxKind::Identifier => self.identifier(node),
            SyntaxKind::Token => Err(self.malformed(node, "stray token outside a production")),
        }
    }

    fn program(&mut self, node: &ParseNode) -> Result<Node> {
        let mut global_range = None;
        let mut statements = Vec::new();
        for child in &node.children {
            if child.kind == SyntaxKind::GlobalRange
                && global_range.is_none()
                && statements.is_empty()
            {
                global_range = Some(self.walk(child)?);
            } else {
                statements.push(self.walk(child)?);
            }
        }
        Ok(Node::program(global_range, statements))
    }

    fn func_def(&mut self, node: &ParseNode) -> Result<Node> {
        let name_node = self.child(node, 0)?;
        let param_node = self.child(node, 1)?;
        let body_node = self.child(node, 2)?;
        let name = name_node.text().to_string();
        let param = param_node.text().to_string();

        if self.scope.declared_locally(&name) {
            return Err(CompileError::AlreadyDeclared {
                loc: name_node.loc,
                name,
            });
        }

        // The body sees the parameter and the function's own name, so a
        // recurrence may call itself.
        self.scope.enter();
        self.scope.declare(name.clone(), Entity::function(name.clone()));
        self.scope
            .declare(param.clone(), Entity::parameter(param.clone(), Type::Number));

        // Capture the result before `?` so the frame pops on the error path
        let body = self.body(body_node);
        self.scope.exit();
        let body = body?;

        // Later statements see the function and its stream parameter
        self.scope.rebind(name.clone(), Entity::function(name.clone()));
        self.scope
            .rebind(param.clone(), Entity::parameter(param.clone(), Type::Number));

        Ok(Node::func_def(name, param, body))
    }

    /// Function bodies always lower to a slice: an ordered list of
    /// sub-expressions evaluated at one axis point.
    fn body(&mut self, node: &ParseNode) -> Result<Node> {
        if node.kind == SyntaxKind::SliceExpr {
            return self.slice(node);
        }
        Ok(Node::slice(vec![self.walk(node)?]))
    }

    fn func_call(&mut self, node: &ParseNode) -> Result<Node> {
        let name_node = self.child(node, 0)?;
        let arg_node = self.child(node, 1)?;
        let name = name_node.text().to_string();
        self.resolve(&name, name_node.loc)?;
        let arg = self.walk(arg_node)?;
        Ok(Node::func_call(name, arg))
    }

    fn expr(&mut self, node: &ParseNode) -> Result<Node> {
        let first_node = self.child(node, 0)?;
        let first = self.walk(first_node)?;
        let mut rest = Vec::new();
        for child in &node.children[1..] {
            rest.push(self.walk(child)?);
        }
        Ok(Node::expr(first, rest))
    }

    fn slice(&mut self, node: &ParseNode) -> Result<Node> {
        let mut exprs = Vec::new();
        for child in &node.children {
            exprs.push(self.walk(child)?);
        }
        if exprs.is_empty() {
            return Err(self.malformed(node, "slice with no sub-expressions"));
        }
        Ok(Node::slice(exprs))
    }

    fn cond(&mut self, node: &ParseNode) -> Result<Node> {
        let left = self.walk(self.child(node, 0)?)?;
        let op_node = self.child(node, 1)?;
        let op = CmpOp::from_symbol(op_node.text())
            .ok_or_else(|| self.malformed(op_node, "unknown comparison operator"))?;
        let right = self.walk(self.child(node, 2)?)?;
        self.check_same_type(&left, &right, op_node.loc)?;

        // Both branches analyzed independently; the node takes the
        // then-branch's type.
        let then_branch = self.walk(self.child(node, 3)?)?;
        let else_branch = self.walk(self.child(node, 4)?)?;
        Ok(Node::cond(left, op, right, then_branch, else_branch))
    }

    fn bitwise(&mut self, node: &ParseNode) -> Result<Node> {
        let (left, op_node, right) = self.binary_parts(node)?;
        let op = BitOp::from_symbol(op_node.text())
            .ok_or_else(|| self.malformed(op_node, "unknown bitwise operator"))?;
        self.check_binary(&left, &right, Type::Number, op_node.loc)?;
        Ok(Node::bitwise(left, op, right))
    }

    fn shift(&mut self, node: &ParseNode) -> Result<Node> {
        let (left, op_node, right) = self.binary_parts(node)?;
        let op = ShiftOp::from_symbol(op_node.text())
            .ok_or_else(|| self.malformed(op_node, "unknown shift operator"))?;
        self.check_binary(&left, &right, Type::Number, op_node.loc)?;
        Ok(Node::shift(left, op, right))
    }

    fn additive(&mut self, node: &ParseNode) -> Result<Node> {
        let (left, op_node, right) = self.binary_parts(node)?;
        let op = AddOp::from_symbol(op_node.text())
            .ok_or_else(|| self.malformed(op_node, "unknown additive operator"))?;
        match op {
            AddOp::Sub => self.check_binary(&left, &right, Type::Number, op_node.loc)?,
            AddOp::Add => {
                // `+` over two strings is concatenation; everything else is
                // numeric addition.
                if left.ty() == Type::Number {
                    self.check_binary(&left, &right, Type::Number, op_node.loc)?;
                } else {
                    self.check_binary(&left, &right, Type::String, op_node.loc)?;
                }
            }
        }
        Ok(Node::add(left, op, right))
    }

    fn multiplicative(&mut self, node: &ParseNode) -> Result<Node> {
        let (left, op_node, right) = self.binary_parts(node)?;
        let op = MulOp::from_symbol(op_node.text())
            .ok_or_else(|| self.malformed(op_node, "unknown multiplicative operator"))?;
        self.check_binary(&left, &right, Type::Number, op_node.loc)?;
        Ok(Node::mul(left, op, right))
    }

    /// Factor covers exponentiation (`base ** exponent`) and the unary
    /// prefixes (`-`, `~`).
    fn factor(&mut self, node: &ParseNode) -> Result<Node> {
        match node.children.len() {
            3 => {
                let (base, op_node, exponent) = self.binary_parts(node)?;
                if op_node.text() != "**" {
                    return Err(self.malformed(op_node, "unknown factor operator"));
                }
                self.check_binary(&base, &exponent, Type::Number, op_node.loc)?;
                Ok(Node::pow(base, exponent))
            }
            2 => {
                let op_node = self.child(node, 0)?;
                let op = UnaryOp::from_symbol(op_node.text())
                    .ok_or_else(|| self.malformed(op_node, "unknown unary operator"))?;
                let operand = self.walk(self.child(node, 1)?)?;
                self.check_unary(&operand, Type::Number, op_node.loc)?;
                Ok(Node::unary(op, operand))
            }
            1 => {
                let inner = self.child(node, 0)?;
                self.walk(inner)
            }
            _ => Err(self.malformed(node, "factor with unexpected child count")),
        }
    }

    fn step_call(&mut self, node: &ParseNode) -> Result<Node> {
        let func_node = self.child(node, 0)?;
        let param_node = self.child(node, 1)?;
        let func = func_node.text().to_string();
        let param = param_node.text().to_string();
        self.resolve(&func, func_node.loc)?;
        self.resolve(&param, param_node.loc)?;

        // Syntax sugar: the iteration count defaults to 1
        let count = match node.child(2) {
            Some(count_node) => self.number_value(count_node)?,
            None => 1.0,
        };
        Ok(Node::step(func, param, count))
    }

    fn input_stmt(&mut self, node: &ParseNode) -> Result<Node> {
        if !self.scope.inside_function() {
            return Err(CompileError::InputOutsideFunction { loc: node.loc });
        }
        let prompt = self.walk(self.child(node, 0)?)?;
        Ok(Node::input(prompt))
    }

    fn time_call(&mut self, node: &ParseNode) -> Result<Node> {
        let target = self.walk(self.child(node, 0)?)?;
        let count = self.walk(self.child(node, 1)?)?;
        Ok(Node::time(target, count))
    }

    fn global_range(&mut self, node: &ParseNode) -> Result<Node> {
        let range = self.walk(self.child(node, 0)?)?;
        let timestep = match node.child(1) {
            Some(ts) => Some(self.walk(ts)?),
            None => None,
        };
        Ok(Node::global_range(range, timestep))
    }

    fn num_range(&mut self, node: &ParseNode) -> Result<Node> {
        let start = self.walk(self.child(node, 0)?)?;
        let end = match node.child(1) {
            Some(end) => Some(self.walk(end)?),
            None => None,
        };
        Ok(Node::num_range(start, end))
    }

    fn char_range(&mut self, node: &ParseNode) -> Result<Node> {
        let start = self.walk(self.child(node, 0)?)?;
        let end = match node.child(1) {
            Some(end) => Some(self.walk(end)?),
            None => None,
        };
        Ok(Node::char_range(start, end))
    }

    fn identifier(&mut self, node: &ParseNode) -> Result<Node> {
        let name = node.text().to_string();
        self.resolve(&name, node.loc)?;
        Ok(Node::ident(name))
    }

    /// Walk the two operands of a binary production and hand back the
    /// operator token for diagnostics.
    fn binary_parts<'a>(&mut self, node: &'a ParseNode) -> Result<(Node, &'a ParseNode, Node)> {
        let left = self.walk(self.child(node, 0)?)?;
        let op_node = self.child(node, 1)?;
        let right = self.walk(self.child(node, 2)?)?;
        Ok((left, op_node, right))
    }

    /// Look a name up through the scope chain; exhaustion is a ScopeError
    /// at the identifier token.
    fn resolve(&self, name: &str, loc: SourceLoc) -> Result<&Entity> {
        self.scope.resolve(name).ok_or_else(|| CompileError::NotDeclared {
            loc,
            name: name.to_string(),
        })
    }

    /// Unary rule: the operand's type must equal the operator's required
    /// type or be `any`.
    fn check_unary(&self, operand: &Node, required: Type, loc: SourceLoc) -> Result<()> {
        let given = operand.ty();
        if given.unifies_with(&required) {
            return Ok(());
        }
        Err(CompileError::UnsupportedOperand {
            loc,
            given,
            expected: required,
        })
    }

    /// Binary rule: operands must share a type, and that type must be the
    /// operator's required type; `any` satisfies either check.
    fn check_binary(&self, left: &Node, right: &Node, required: Type, loc: SourceLoc) -> Result<()> {
        let (l, r) = (left.ty(), right.ty());
        self.check_same_type(left, right, loc)?;
        if (l == required && r == required) || l == Type::Any || r == Type::Any {
            return Ok(());
        }
        Err(CompileError::UnsupportedOperand {
            loc,
            given: l,
            expected: required,
        })
    }

    fn check_same_type(&self, left: &Node, right: &Node, loc: SourceLoc) -> Result<()> {
        let (l, r) = (left.ty(), right.ty());
        if l.unifies_with(&r) {
            return Ok(());
        }
        Err(CompileError::OperandMismatch { loc, left: l, right: r })
    }

    fn number_value(&self, node: &ParseNode) -> Result<f64> {
        node.number_value()
            .map_err(|e| self.malformed(node, &e.to_string()))
    }

    fn child<'a>(&self, node: &'a ParseNode, index: usize) -> Result<&'a ParseNode> {
        node.child(index).ok_or_else(|| CompileError::MalformedTree {
            loc: node.loc,
            message: format!("{:?} is missing child {}", node.kind, index),
        })
    }

    fn malformed(&self, node: &ParseNode, message: &str) -> CompileError {
        CompileError::MalformedTree {
            loc: node.loc,
            message: message.to_string(),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_expr(left: ParseNode, op: &str, right: ParseNode) -> ParseNode {
        ParseNode::new(SyntaxKind::AddExpr, "").with_children(vec![
            left,
            ParseNode::token(op).at(1, 6),
            right,
        ])
    }

    fn func_def(name: &str, param: &str, body: ParseNode) -> ParseNode {
        ParseNode::new(SyntaxKind::FuncDef, "").with_children(vec![
            ParseNode::ident(name),
            ParseNode::ident(param),
            body,
        ])
    }

    fn program(statements: Vec<ParseNode>) -> ParseNode {
        ParseNode::new(SyntaxKind::Program, "").with_children(statements)
    }

    #[test]
    fn test_string_literal_analyzes_to_typed_node() {
        let ast = analyze(&ParseNode::string("hi")).unwrap();
        assert_eq!(ast, Node::string("hi"));
        assert_eq!(ast.ty(), Type::String);
    }

    #[test]
    fn test_undeclared_identifier_raises_scope_error() {
        let err = analyze(&ParseNode::ident("x").at(1, 7)).unwrap_err();
        assert_eq!(err.to_string(), "Line 1, col 7: Identifier x not declared");
    }

    #[test]
    fn test_function_redeclaration_raises_scope_error() {
        let tree = program(vec![
            func_def("f", "x", ParseNode::number("1")),
            ParseNode::new(SyntaxKind::FuncDef, "").with_children(vec![
                ParseNode::ident("f").at(2, 1),
                ParseNode::ident("y"),
                ParseNode::number("2"),
            ]),
        ]);

        let err = analyze(&tree).unwrap_err();
        assert_eq!(err.to_string(), "Line 2, col 1: Identifier f already declared");
    }

    #[test]
    fn test_parameter_visible_only_inside_own_body() {
        // g's body must not see f's parameter
        let tree = program(vec![
            func_def("f", "x", ParseNode::ident("x")),
            func_def("g", "y", ParseNode::ident("q").at(3, 10)),
        ]);

        let err = analyze(&tree).unwrap_err();
        assert_eq!(err.to_string(), "Line 3, col 10: Identifier q not declared");
    }

    #[test]
    fn test_function_may_call_itself() {
        let body = ParseNode::new(SyntaxKind::FuncCall, "").with_children(vec![
            ParseNode::ident("f"),
            ParseNode::ident("x"),
        ]);
        let tree = program(vec![func_def("f", "x", body)]);

        let ast = analyze(&tree).unwrap();
        let Node::Program { statements, .. } = &ast else {
            panic!("expected Program");
        };
        assert!(matches!(statements[0], Node::FuncDef { .. }));
    }

    #[test]
    fn test_function_visible_after_definition() {
        let tree = program(vec![
            func_def("f", "x", ParseNode::ident("x")),
            ParseNode::new(SyntaxKind::PrintStmt, "").with_children(vec![ParseNode::new(
                SyntaxKind::FuncCall,
                "",
            )
            .with_children(vec![
                ParseNode::ident("f"),
                ParseNode::ident("x"),
            ])]),
        ]);

        assert!(analyze(&tree).is_ok());
    }

    #[test]
    fn test_scope_restored_after_failing_body() {
        // The body fails, but print must still be resolvable afterwards;
        // the analyzer aborts with the body's error, not a scope panic.
        let tree = program(vec![
            func_def("f", "x", ParseNode::ident("nope").at(1, 20)),
            ParseNode::new(SyntaxKind::PrintStmt, "")
                .with_children(vec![ParseNode::number("1")]),
        ]);

        let err = analyze(&tree).unwrap_err();
        assert_eq!(err.to_string(), "Line 1, col 20: Identifier nope not declared");
    }

    #[test]
    fn test_string_plus_number_is_operand_mismatch() {
        let tree = add_expr(ParseNode::string("hi"), "+", ParseNode::number("1"));
        let err = analyze(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1, col 6: Operands do not have the same type. Given string and number types"
        );
    }

    #[test]
    fn test_string_minus_string_expects_number() {
        let tree = add_expr(ParseNode::string("hi"), "-", ParseNode::string("hey"));
        let err = analyze(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1, col 6: Operator does not support string types. Expected number"
        );
    }

    #[test]
    fn test_string_concatenation_is_legal() {
        let tree = add_expr(ParseNode::string("hi "), "+", ParseNode::string("there"));
        let ast = analyze(&tree).unwrap();
        assert_eq!(ast.ty(), Type::String);
    }

    #[test]
    fn test_any_operand_never_raises() {
        // x is a parameter; identifiers carry type any
        let body = add_expr(ParseNode::ident("x"), "+", ParseNode::number("1"));
        let tree = program(vec![func_def("f", "x", body)]);
        assert!(analyze(&tree).is_ok());
    }

    #[test]
    fn test_char_times_number_expects_number() {
        let tree = ParseNode::new(SyntaxKind::MulExpr, "").with_children(vec![
            ParseNode::char_lit("a"),
            ParseNode::token("*").at(1, 5),
            ParseNode::number("2"),
        ]);
        let err = analyze(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1, col 5: Operands do not have the same type. Given char and number types"
        );
    }

    #[test]
    fn test_unary_negation_of_string_raises() {
        let tree = ParseNode::new(SyntaxKind::Factor, "").with_children(vec![
            ParseNode::token("-").at(2, 3),
            ParseNode::string("oops"),
        ]);
        let err = analyze(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 2, col 3: Operator does not support string types. Expected number"
        );
    }

    #[test]
    fn test_top_level_input_raises_context_error() {
        let tree = program(vec![ParseNode::new(SyntaxKind::InputStmt, "")
            .at(1, 1)
            .with_children(vec![ParseNode::string("n?")])]);
        let err = analyze(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1, col 1: Input statements must be inside functions"
        );
    }

    #[test]
    fn test_input_inside_function_analyzes() {
        let body = ParseNode::new(SyntaxKind::InputStmt, "")
            .with_children(vec![ParseNode::string("n?")]);
        let tree = program(vec![func_def("f", "x", body)]);
        assert!(analyze(&tree).is_ok());
    }

    #[test]
    fn test_step_count_defaults_to_one() {
        let body = ParseNode::new(SyntaxKind::StepCall, "").with_children(vec![
            ParseNode::ident("f"),
            ParseNode::ident("x"),
        ]);
        let tree = program(vec![func_def("f", "x", body)]);

        let ast = analyze(&tree).unwrap();
        let Node::Program { statements, .. } = &ast else {
            panic!("expected Program");
        };
        let Node::FuncDef { body, .. } = &statements[0] else {
            panic!("expected FuncDef");
        };
        let Node::Slice { exprs } = body.as_ref() else {
            panic!("expected Slice body");
        };
        assert_eq!(exprs[0], Node::step("f", "x", 1.0));
    }

    #[test]
    fn test_step_count_taken_from_literal() {
        let body = ParseNode::new(SyntaxKind::StepCall, "").with_children(vec![
            ParseNode::ident("f"),
            ParseNode::ident("x"),
            ParseNode::number("3"),
        ]);
        let tree = program(vec![func_def("f", "x", body)]);

        let ast = analyze(&tree).unwrap();
        let Node::Program { statements, .. } = &ast else {
            panic!("expected Program");
        };
        let Node::FuncDef { body, .. } = &statements[0] else {
            panic!("expected FuncDef");
        };
        let Node::Slice { exprs } = body.as_ref() else {
            panic!("expected Slice body");
        };
        assert_eq!(exprs[0], Node::step("f", "x", 3.0));
    }

    #[test]
    fn test_ternary_takes_then_branch_type() {
        let tree = ParseNode::new(SyntaxKind::CondExpr, "").with_children(vec![
            ParseNode::number("1"),
            ParseNode::token("=="),
            ParseNode::number("1"),
            ParseNode::string("yes"),
            ParseNode::string("no"),
        ]);
        let ast = analyze(&tree).unwrap();
        assert_eq!(ast.ty(), Type::String);
    }

    #[test]
    fn test_ternary_comparison_operands_must_agree() {
        let tree = ParseNode::new(SyntaxKind::CondExpr, "").with_children(vec![
            ParseNode::number("1"),
            ParseNode::token("<").at(1, 3),
            ParseNode::string("two"),
            ParseNode::number("1"),
            ParseNode::number("0"),
        ]);
        let err = analyze(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1, col 3: Operands do not have the same type. Given number and string types"
        );
    }

    #[test]
    fn test_global_range_with_timestep() {
        let range = ParseNode::new(SyntaxKind::GlobalRange, "").with_children(vec![
            ParseNode::new(SyntaxKind::NumRange, "").with_children(vec![
                ParseNode::number("5"),
                ParseNode::number("1"),
            ]),
            ParseNode::new(SyntaxKind::Timestep, "")
                .with_children(vec![ParseNode::number("1")]),
        ]);
        let tree = program(vec![
            range,
            ParseNode::new(SyntaxKind::PrintStmt, "")
                .with_children(vec![ParseNode::number("1")]),
        ]);

        let ast = analyze(&tree).unwrap();
        let Node::Program { global_range, statements } = &ast else {
            panic!("expected Program");
        };
        assert!(global_range.is_some());
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_negative_and_fractional_number_literals() {
        assert_eq!(analyze(&ParseNode::number("-5")).unwrap(), Node::number(-5.0));
        assert_eq!(analyze(&ParseNode::number("1.5")).unwrap(), Node::number(1.5));
    }
}
