//! Core library for the survey-tools command line application.
//!
//! A merge run reads the class survey fragments, derives inverse `creates`
//! edges and fan scores, checks cross references and writes one consolidated
//! document. Fragment and document IO lives under [`survey::tools::io`], record
//! types in [`survey::tools::model`], and each stage has its own module:
//! [`survey::tools::derive`], [`survey::tools::validate`],
//! [`survey::tools::cluster`] and [`survey::tools::report`]. The stages are
//! wired together in [`survey::tools::merge`].

pub mod survey;

pub use survey::tools::{
    Result, ToolError, cluster, config, derive, error, io, merge, model, report, validate,
};
