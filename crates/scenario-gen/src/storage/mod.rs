pub mod export;

pub use export::export_text;
