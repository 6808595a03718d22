//! API exposure: turns a `ServerHost` into a router

pub mod rest;

pub use rest::RestExposure;
