//! Fixed-size vector definition used for packed literal parameters.

use std::fmt::Display;

#[derive(PartialEq, Clone, Copy, Debug)]
/// DIM-dimensional vector of TYPE values.
pub struct Vector<const DIM: usize, TYPE = f32> {
    /// Components, in declaration order.
    pub inner: [TYPE; DIM],
}

/// Two-channel constant, as produced by `(r,g)` literals.
pub type Vec2 = Vector<2>;
/// Four-channel constant, as produced by `(r,g,b,a)` literals.
pub type Vec4 = Vector<4>;

impl<const DIM: usize, TYPE> From<[TYPE; DIM]> for Vector<DIM, TYPE> {
    fn from(inner: [TYPE; DIM]) -> Self {
        Self { inner }
    }
}

impl<const DIM: usize, TYPE: Copy> TryFrom<&[TYPE]> for Vector<DIM, TYPE> {
    /// Number of components actually present in the slice.
    type Error = usize;

    fn try_from(value: &[TYPE]) -> Result<Self, Self::Error> {
        <[TYPE; DIM]>::try_from(value)
            .map(|inner| Self { inner })
            .map_err(|_| value.len())
    }
}

impl<const DIM: usize, TYPE: Display> Display for Vector<DIM, TYPE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.inner.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_exact_slice() {
        let got = Vec2::try_from([0.25_f32, -1.].as_slice());
        assert_eq!(got, Ok(Vector::from([0.25, -1.])));
    }

    #[test]
    fn from_wrong_slice_reports_length() {
        assert_eq!(Vec4::try_from([1_f32, 2., 3.].as_slice()), Err(3));
        assert_eq!(Vec2::try_from([1_f32, 2., 3.].as_slice()), Err(3));
    }

    #[test]
    fn display() {
        assert_eq!(Vec4::from([0.1, 0.2, 0.3, 1.]).to_string(), "(0.1,0.2,0.3,1)");
    }
}
