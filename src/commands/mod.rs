pub mod printers;
pub mod split;
