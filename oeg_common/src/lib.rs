mod monetary;

pub use monetary::{InvalidAmountError, InvalidRateError, Money, TaxRate};
