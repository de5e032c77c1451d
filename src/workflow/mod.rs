pub mod item_ctx;
pub mod item_pipeline;

pub use item_ctx::{gate_chain, GateIn, GateOut, ItemCtx};
pub use item_pipeline::{ItemPipeline, Stage};
