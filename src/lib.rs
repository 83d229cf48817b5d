pub mod app;
pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod promotions;
pub mod response;
pub mod revenue;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod wishlist;
