//! parkmap - Find and map nearby parking for a UK postcode using OpenStreetMap data

pub mod api;
pub mod config;
pub mod domain;
pub mod map;
pub mod parking;
pub mod postcode;
