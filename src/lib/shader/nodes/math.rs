//! Math expressions.
//!
//! Arithmetic operands are either numeric literals, stored as constants, or names of previously
//! declared nodes, wired as inputs.

use crate::shader::{
    error::LineResult,
    graph::{BinaryOp, Expression, NodeKind},
    parsing::{resolve_operand, resolve_reference},
    registry::{expect_params, Construct, Context},
};

/// Builds [Expression::Sine] nodes. The input must name a node declared earlier.
pub struct Sine;

impl Construct for Sine {
    fn schema(&self) -> &'static [&'static str] {
        &["input"]
    }

    fn construct(&self, params: &[&str], context: &Context<'_>) -> LineResult<Expression> {
        let [input] = expect_params::<1>(NodeKind::Sine, params)?;

        Ok(Expression::Sine {
            input: resolve_reference(input, context.graph)?,
        })
    }
}

/// Builds [Expression::Binary] nodes for the wrapped operation.
pub struct Arithmetic(pub BinaryOp);

impl Construct for Arithmetic {
    fn schema(&self) -> &'static [&'static str] {
        &["a", "b"]
    }

    fn construct(&self, params: &[&str], context: &Context<'_>) -> LineResult<Expression> {
        let op = self.0;
        let [a, b] = expect_params::<2>(op.kind(), params)?;

        Ok(Expression::Binary {
            op,
            a: resolve_operand(a, context.graph)?,
            b: resolve_operand(b, context.graph)?,
        })
    }
}
