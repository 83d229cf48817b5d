pub mod auth;
pub mod dashboard;
pub mod discounts;
pub mod orders;
pub mod products;
pub mod wishlist;
