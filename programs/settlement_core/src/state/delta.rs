/// Signed token amounts produced by an operation, from the caller's point of
/// view: positive amounts are owed to the core, negative amounts are owed by it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delta {
    pub amount0: i128,
    pub amount1: i128,
}

impl Delta {
    pub fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }
}
