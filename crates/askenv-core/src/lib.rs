//! # askenv-core — Foundational Types for Skill Envelopes
//!
//! This crate defines the value types shared by the envelope validation
//! stack. Every other crate in the workspace depends on `askenv-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for protocol identifiers.** `ApplicationId`,
//!    `SessionId`, `RequestId`, `UserId`. `ApplicationId` has a validated
//!    constructor.
//!
//! 2. **One timestamp format.** `Timestamp` parses and renders exactly
//!    `YYYY-MM-DDTHH:MM:SSZ`, so parse-then-render is the identity.
//!
//! 3. **Typed envelope records.** `RequestEnvelope` and `ResponseEnvelope`
//!    are concrete, statically-shaped records. Downstream skill code reads
//!    named fields, never a loosely-typed map.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `askenv-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod envelope;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use envelope::{
    Application, Attributes, Card, CardType, Context, Intent, OutputSpeech, Reprompt, Request,
    RequestEnvelope, Response, ResponseEnvelope, Session, SpeechType, SystemContext, User,
};
pub use error::AskError;
pub use identity::{ApplicationId, RequestId, SessionId, UserId};
pub use temporal::{Timestamp, TIMESTAMP_FORMAT};
