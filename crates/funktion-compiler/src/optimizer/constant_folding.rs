//! Constant folding optimizer
//!
//! Rewrites the typed AST bottom-up, folding literal arithmetic and
//! algebraic identities. Pure and idempotent: children are folded before a
//! parent rule fires, new trees are produced rather than mutating shared
//! ones, and no rewrite changes the meaning of the program. Bitwise and
//! shift folds use the host's ToInt32 semantics so compile-time results
//! match runtime results.

use funktion_core::ast::{AddOp, BitOp, MulOp, Node, ShiftOp, UnaryOp};

/// Constant folding optimizer
pub struct ConstantFolder;

impl ConstantFolder {
    /// Create a new constant folder
    pub fn new() -> Self {
        Self
    }

    /// Optimize a node by folding constants, post-order
    pub fn fold(&self, node: &Node) -> Node {
        match node {
            Node::Program {
                global_range,
                statements,
            } => {
                let global_range = global_range.as_ref().map(|g| Box::new(self.fold(g)));
                // A statement that folded to a bare literal does nothing
                let statements = statements
                    .iter()
                    .map(|s| self.fold(s))
                    .filter(|s| !s.is_literal())
                    .collect();
                Node::Program {
                    global_range,
                    statements,
                }
            }

            Node::FuncDef { name, param, body } => Node::FuncDef {
                name: name.clone(),
                param: param.clone(),
                body: Box::new(self.fold(body)),
            },

            Node::FuncCall { name, arg } => Node::FuncCall {
                name: name.clone(),
                arg: Box::new(self.fold(arg)),
            },

            Node::Expr { first, rest } => Node::Expr {
                first: Box::new(self.fold(first)),
                rest: rest.iter().map(|e| self.fold(e)).collect(),
            },

            Node::Slice { exprs } => Node::Slice {
                exprs: exprs.iter().map(|e| self.fold(e)).collect(),
            },

            Node::Cond {
                left,
                op,
                right,
                then_branch,
                else_branch,
            } => {
                let left = self.fold(left);
                let right = self.fold(right);
                let then_branch = self.fold(then_branch);
                let else_branch = self.fold(else_branch);

                // A literal comparison decides the branch at compile time
                if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
                    return if op.eval(l, r) { then_branch } else { else_branch };
                }

                Node::Cond {
                    left: Box::new(left),
                    op: *op,
                    right: Box::new(right),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                }
            }

            Node::Add { left, op, right } => {
                self.fold_add(self.fold(left), *op, self.fold(right))
            }

            Node::Mul { left, op, right } => {
                self.fold_mul(self.fold(left), *op, self.fold(right))
            }

            Node::Pow { base, exponent } => {
                self.fold_pow(self.fold(base), self.fold(exponent))
            }

            Node::Bitwise { left, op, right } => {
                self.fold_bitwise(self.fold(left), *op, self.fold(right))
            }

            Node::Shift { left, op, right } => {
                self.fold_shift(self.fold(left), *op, self.fold(right))
            }

            Node::Unary { op, operand } => self.fold_unary(*op, self.fold(operand)),

            Node::Print { expr } => Node::Print {
                expr: Box::new(self.fold(expr)),
            },

            Node::Input { prompt } => Node::Input {
                prompt: Box::new(self.fold(prompt)),
            },

            Node::Time { target, count } => Node::Time {
                target: Box::new(self.fold(target)),
                count: Box::new(self.fold(count)),
            },

            Node::GlobalRange { range, timestep } => Node::GlobalRange {
                range: Box::new(self.fold(range)),
                timestep: timestep.as_ref().map(|t| Box::new(self.fold(t))),
            },

            Node::NumRange { start, end } => Node::NumRange {
                start: Box::new(self.fold(start)),
                end: end.as_ref().map(|e| Box::new(self.fold(e))),
            },

            Node::CharRange { start, end } => Node::CharRange {
                start: Box::new(self.fold(start)),
                end: end.as_ref().map(|e| Box::new(self.fold(e))),
            },

            Node::Timestep { value } => Node::Timestep {
                value: Box::new(self.fold(value)),
            },

            // No rule matches: literals, identifiers, step calls
            Node::Step { .. } | Node::Number(_) | Node::Str(_) | Node::Char(_) | Node::Ident(_) => {
                node.clone()
            }
        }
    }

    fn fold_add(&self, left: Node, op: AddOp, right: Node) -> Node {
        if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
            return Node::Number(match op {
                AddOp::Add => l + r,
                AddOp::Sub => l - r,
            });
        }
        match op {
            AddOp::Add => {
                if left.as_number() == Some(0.0) {
                    return right;
                }
                if right.as_number() == Some(0.0) {
                    return left;
                }
            }
            AddOp::Sub => {
                if right.as_number() == Some(0.0) {
                    return left;
                }
            }
        }
        Node::Add {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn fold_mul(&self, left: Node, op: MulOp, right: Node) -> Node {
        match op {
            MulOp::Mul => {
                if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
                    return Node::Number(l * r);
                }
                if left.as_number() == Some(1.0) {
                    return right;
                }
                if right.as_number() == Some(1.0) {
                    return left;
                }
                if left.as_number() == Some(0.0) || right.as_number() == Some(0.0) {
                    return Node::Number(0.0);
                }
            }
            MulOp::Div => {
                // Only the x/1 identity; literal division stays a runtime
                // concern.
                if right.as_number() == Some(1.0) {
                    return left;
                }
            }
        }
        Node::Mul {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn fold_pow(&self, base: Node, exponent: Node) -> Node {
        if let (Some(b), Some(e)) = (base.as_number(), exponent.as_number()) {
            return Node::Number(b.powf(e));
        }
        if exponent.as_number() == Some(0.0) {
            return Node::Number(1.0);
        }
        if exponent.as_number() == Some(1.0) {
            return base;
        }
        Node::Pow {
            base: Box::new(base),
            exponent: Box::new(exponent),
        }
    }

    fn fold_bitwise(&self, left: Node, op: BitOp, right: Node) -> Node {
        if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
            let (l, r) = (to_int32(l), to_int32(r));
            return Node::Number(match op {
                BitOp::And => (l & r) as f64,
                BitOp::Or => (l | r) as f64,
                BitOp::Xor => (l ^ r) as f64,
            });
        }
        Node::Bitwise {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn fold_shift(&self, left: Node, op: ShiftOp, right: Node) -> Node {
        if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
            let l = to_int32(l);
            let amount = (to_int32(r) & 31) as u32;
            return Node::Number(match op {
                ShiftOp::Shl => (l << amount) as f64,
                ShiftOp::Shr => (l >> amount) as f64,
            });
        }
        Node::Shift {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn fold_unary(&self, op: UnaryOp, operand: Node) -> Node {
        if let Some(n) = operand.as_number() {
            return Node::Number(match op {
                UnaryOp::Neg => -n,
                UnaryOp::BitNot => !to_int32(n) as f64,
            });
        }
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

impl Default for ConstantFolder {
    fn default() -> Self {
        Self::new()
    }
}

/// ToInt32 as the generated program would compute it
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc() % 4_294_967_296.0;
    let m = if m < 0.0 { m + 4_294_967_296.0 } else { m };
    (m as u32) as i32
}
