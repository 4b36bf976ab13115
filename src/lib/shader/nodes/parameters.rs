//! Constant sources: parameters exposed to material instances and plain constants.
//!
//! Parameters:
//! - VectorParameter: `(r,g,b,a)` default color
//! - ScalarParameter: numeric default
//! - Constant2Vector: `(r,g)` constant

use crate::{
    color::LinearColor,
    shader::{
        error::LineResult,
        graph::{Expression, NodeKind},
        parsing::{parse_number, parse_vector},
        registry::{expect_params, Construct, Context},
    },
};

/// Builds [Expression::VectorParameter] nodes.
pub struct VectorParameter;

impl Construct for VectorParameter {
    fn schema(&self) -> &'static [&'static str] {
        &["color"]
    }

    fn construct(&self, params: &[&str], _context: &Context<'_>) -> LineResult<Expression> {
        let [color] = expect_params::<1>(NodeKind::VectorParameter, params)?;

        Ok(Expression::VectorParameter {
            default: LinearColor::from(parse_vector::<4>(color)?),
        })
    }
}

/// Builds [Expression::ScalarParameter] nodes.
pub struct ScalarParameter;

impl Construct for ScalarParameter {
    fn schema(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn construct(&self, params: &[&str], _context: &Context<'_>) -> LineResult<Expression> {
        let [value] = expect_params::<1>(NodeKind::ScalarParameter, params)?;

        Ok(Expression::ScalarParameter {
            default: parse_number(value)?,
        })
    }
}

/// Builds [Expression::Constant2Vector] nodes.
pub struct Constant2Vector;

impl Construct for Constant2Vector {
    fn schema(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn construct(&self, params: &[&str], _context: &Context<'_>) -> LineResult<Expression> {
        let [value] = expect_params::<1>(NodeKind::Constant2Vector, params)?;

        Ok(Expression::Constant2Vector {
            value: parse_vector::<2>(value)?,
        })
    }
}
