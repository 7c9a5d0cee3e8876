//! Handlers for the two guidance flows and the HTML they render.
//!
//! Each flow is split into pure steps (`validate`, `build_request`,
//! `interpret`) joined by an async `handle`, plus a page model that owns the
//! output regions a front end displays.

pub mod compass;
pub mod html;
pub mod qna;
pub mod sections;

pub use compass::{CompassForm, CompassOutcome, CompassPage, CompassView, Navigation, SubmissionState};
pub use qna::{QnaOutcome, QnaPage};
