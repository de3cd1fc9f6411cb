pub mod fragments;
pub mod output;
