use std::fmt::Display;

use crate::vector::Vec4;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Linear-space RGBA color, used as the default value of vector parameters.
pub struct LinearColor {
    #[allow(missing_docs)]
    pub r: f32,
    #[allow(missing_docs)]
    pub g: f32,
    #[allow(missing_docs)]
    pub b: f32,
    #[allow(missing_docs)]
    pub a: f32,
}

impl LinearColor {
    /// Create a color from its four channels.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        LinearColor { r, g, b, a }
    }
}

impl From<Vec4> for LinearColor {
    fn from(value: Vec4) -> Self {
        let [r, g, b, a] = value.inner;
        Self { r, g, b, a }
    }
}

impl Display for LinearColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(R={},G={},B={},A={})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_vector() {
        let color = LinearColor::from(Vec4::from([1., 0.5, 0., 1.]));
        assert_eq!(color, LinearColor::new(1., 0.5, 0., 1.));
    }

    #[test]
    fn display() {
        let color = LinearColor::new(1., 0.5, 0., 1.);
        assert_eq!(color.to_string(), "(R=1,G=0.5,B=0,A=1)");
    }
}
