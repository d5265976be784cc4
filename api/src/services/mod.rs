// Services Module
// Business logic between the HTTP handlers and the repositories

pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod grid_support;
pub mod transaction_service;

#[cfg(test)]
pub mod test_support;
