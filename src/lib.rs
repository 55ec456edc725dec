//! benchdash: the core of a benchmark dashboard for 2D-graphics renderers.
//!
//! Data flow is one-directional:
//! ```text
//! ┌────────────┐    ┌───────────┐    ┌─────────────┐    ┌──────────┐
//! │ DataSource │───►│ DataStore │───►│ Projection  │───►│ Surface  │
//! │ (http/dir) │    │ + Select. │    │ (pure fn)   │    │ payloads │
//! └────────────┘    └───────────┘    └─────────────┘    └──────────┘
//! ```
//! Documents are replaced wholesale; the projection is recomputed fresh on
//! every query; every failure degrades to "nothing rendered".

pub mod app;
pub mod catalog;
pub mod logging;
pub mod model;
pub mod projection;
pub mod render;
pub mod source;
pub mod state;
