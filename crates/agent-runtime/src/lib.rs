//! The bounded observe→decide→act control loop and its two seams.
//!
//! The loop is generic over a [`ports::BrowserPort`] (anything that can
//! observe a page and execute primitives) and a
//! [`decision::DecisionMaker`] (anything that maps an observation to
//! intended actions). Production wires these to the real browser facade and
//! an OpenAI-compatible endpoint; tests and offline development use the
//! scripted implementations shipped here.

pub mod catalogue;
pub mod command;
pub mod decision;
pub mod errors;
pub mod openai;
pub mod orchestrator;
pub mod ports;
pub mod prompt;

pub use command::{Command, DecodeError};
pub use decision::{DecisionMaker, ScriptedDecisionMaker};
pub use errors::AgentError;
pub use openai::OpenAiDecisionMaker;
pub use orchestrator::{LoopConfig, Orchestrator, TaskReport, TaskVerdict};
pub use ports::{BrowserPort, PortError, ScriptedBrowser};
