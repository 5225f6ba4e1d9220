//! Statement gateway: the access boundary of the NHS supporting-statement
//! assistant.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser app drafts supporting statements from a CV and a job
//! description. It never holds provider credentials: chat requests go
//! through `POST /anthropic-proxy`, and the few configuration values the
//! client may read come from `POST /get-secret`. Protected views are gated
//! by the route guard in [`guard`], which reads session snapshots published
//! by [`session`].

pub mod config;
pub mod error;
pub mod guard;
pub mod llm;
pub mod routes;
pub mod secrets;
pub mod session;
pub mod state;
