//! SVG rendering of positioned graphs.
//!
//! # Responsibility
//! - Serialize layouts into standalone SVG markup.
//! - Model the host's pan/zoom transform.
//! - Drive full render requests from the engine.

pub mod label;
pub mod palette;
pub mod request;
pub mod svg;
pub mod transform;

use crate::model::entity::ValidationError;

pub type RenderResult<T> = Result<T, ValidationError>;
