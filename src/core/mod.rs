pub mod currency;
pub mod market;
pub mod position;
