pub mod config;
pub mod db;
pub mod error;
pub mod geolocation;
pub mod handlers;
pub mod map;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod storage;
pub mod tracker;
pub mod version;
pub mod views;
