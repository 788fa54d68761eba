pub mod clean;
pub mod decode;
pub mod scan;
pub mod status;
