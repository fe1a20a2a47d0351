pub mod application;
pub mod charts;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
