//! Right-hand operands for the in-place arithmetic that accepts either a
//! scalar or a conformant array.

/// Either a scalar applied to every element or an array of the same shape
/// as the receiver.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a, T> {
    Scalar(f64),
    Array(&'a T),
}

impl<T> From<f64> for Operand<'_, T> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a, T> From<&'a T> for Operand<'a, T> {
    fn from(value: &'a T) -> Self {
        Operand::Array(value)
    }
}

impl<'a, T> From<&'a mut T> for Operand<'a, T> {
    fn from(value: &'a mut T) -> Self {
        Operand::Array(value)
    }
}
