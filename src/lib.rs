pub mod convention;
pub mod invoke;
pub mod lifecycle;
pub mod listener;
pub mod models;
pub mod runner;
