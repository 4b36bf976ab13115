//! Time-driven expressions.

use crate::shader::{
    error::LineResult,
    graph::{Expression, NodeKind},
    registry::{expect_params, Construct, Context},
};

/// Builds [Expression::Time] nodes.
pub struct Time;

impl Construct for Time {
    fn schema(&self) -> &'static [&'static str] {
        &[]
    }

    fn construct(&self, params: &[&str], _context: &Context<'_>) -> LineResult<Expression> {
        let [] = expect_params::<0>(NodeKind::Time, params)?;
        Ok(Expression::Time)
    }
}

/// Builds [Expression::Panner] nodes. Its coordinate, speed and time inputs start unbound and
/// are connected later on through `<name>Coordinate`, `<name>Speed` and `<name>Time`.
pub struct Panner;

impl Construct for Panner {
    fn schema(&self) -> &'static [&'static str] {
        &[]
    }

    fn construct(&self, params: &[&str], _context: &Context<'_>) -> LineResult<Expression> {
        let [] = expect_params::<0>(NodeKind::Panner, params)?;

        Ok(Expression::Panner {
            coordinate: None,
            speed: None,
            time: None,
        })
    }
}
