//! HTTP implementation of [`tax_core::CalculatorApi`].

mod client;

pub use client::HttpCalculatorApi;
