pub mod customer;
pub mod product;
pub mod quote;
pub mod template;
