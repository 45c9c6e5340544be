pub mod ordinal;

pub use ordinal::date_ordinal;
