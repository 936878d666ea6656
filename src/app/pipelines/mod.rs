pub mod offset_pipeline;

pub use offset_pipeline::OffsetPipeline;
