//! UI module - presentational widgets shared by the views

pub mod components;
