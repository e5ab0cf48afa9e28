pub mod etl;
pub mod header;
pub mod pipeline;
pub mod removal;
pub mod transform;

pub use crate::domain::model::{ExtractedInputs, TransformResult, TransformSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
