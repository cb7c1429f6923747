// Service module exports

pub mod appearance;
pub mod config;
pub mod database;
pub mod event_store;
pub mod presentation;
pub mod refresh;
pub mod storage;
