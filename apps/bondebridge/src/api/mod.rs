//! Backend REST surface: wire payloads and the HTTP client.

pub mod client;
pub mod dto;

pub use client::{BondeApi, HttpBondeApi};
