//! # survey-logic
//!
//! Branching evaluation for sectioned surveys. Presentation-agnostic.
//!
//! Given a `SurveyDefinition` and the answers collected so far, this crate
//! decides which questions are visible, whether a section may be submitted,
//! and which section comes next.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use survey_logic::{Answers, Evaluator, Navigation, SurveyDefinition};
//!
//! let definition = SurveyDefinition::from_json(&json)?;
//! let answers = Answers::new().with("q_continue", "Yes");
//!
//! let evaluator = Evaluator::new(&definition);
//! let visibility = evaluator.visibility(&answers);
//!
//! match evaluator.next_section(0, &answers) {
//!     Ok(Navigation::Complete) => println!("done"),
//!     Ok(navigation) => println!("next: {:?}", navigation.next_section_index()),
//!     Err(errors) => println!("fix {} answers first", errors.len()),
//! }
//! ```
//!
//! ## Branching
//!
//! - **Display logic** hides a question unless all of its conditions hold
//!   against earlier answers.
//! - **Skip logic** jumps to another section when the first matching rule of
//!   a visible, answered question fires.
//! - **Reconciliation** recovers conditions whose question id went stale,
//!   using the question text saved with the condition.
//!
//! ## Sessions
//!
//! `PreviewSession` tracks answers, position and history for one respondent.
//! `Runner` drives a session with any `Respondent`; `ScriptedRespondent`
//! answers from a fixed script for tests.

pub use survey_logic_types::*;

mod options;
pub use options::{EvaluatorOptions, ReconciliationPolicy, RunnerOptions};

mod error;
pub use error::{OrganizeError, SessionError};

pub mod operator;

pub mod reconcile;
pub use reconcile::{Repair, Resolution, reconcile_definition};

mod display;
pub use display::{Evaluator, Visibility};

pub mod validate;
pub use validate::ValidationErrors;

mod skip;
pub use skip::Navigation;

mod session;
pub use session::{NavigationOutcome, PreviewSession, SessionState};

pub mod organize;

pub mod audit;
pub use audit::{ReferenceIssue, audit};

mod runner;
pub use runner::{Runner, run_session};

// Scripted respondent for running surveys without user interaction
mod scripted;
pub use scripted::{ScriptedError, ScriptedRespondent};
