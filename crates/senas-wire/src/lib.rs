//! Señas Connect Wire - JSON schema for the HTTP and streaming surfaces
//!
//! Client to server:
//! - one-shot prediction requests and streaming frames (`{ hands: [...] }`)
//! - gesture intake submissions
//!
//! Server to client:
//! - prediction responses, typed streaming messages (`prediction` / `error`)
//! - catalog listing, service info, health
//!
//! Decoding validates hand shape at the boundary, so everything handed to
//! the classifier already satisfies the 21-landmark invariant.

pub mod error;
pub mod request;
pub mod response;

pub use error::*;
pub use request::*;
pub use response::*;
