pub mod browser;
pub mod fetcher;
pub mod frontier;
pub mod links;
pub mod web;
