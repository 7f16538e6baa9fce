//! Client-side controller for the text-to-audio form.
//!
//! `FormState` is a plain state machine with no I/O; `FormController` feeds it
//! the results of calls made through a `FormBackend`.

pub mod controller;
pub mod state;

pub use controller::{ClientError, FormBackend, FormController, HttpBackend};
pub use state::{FormState, GenerateBlocked, GenerationRequest, Notice, Phase};
