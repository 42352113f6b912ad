//! Reading workbooks from disk.

mod sheets;
mod values;
