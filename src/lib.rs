//! NutriConnect - nutrition targets, generated meal and workout plans, and
//! weight tracking behind an authenticated JSON API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
