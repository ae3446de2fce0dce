pub mod export_xlsx;

pub use export_xlsx::sheet_to_xlsx;
