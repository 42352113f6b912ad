//! Cell values and positions

mod address;
mod value;

pub use address::CellAddress;
pub use value::{CellValue, SharedString};
