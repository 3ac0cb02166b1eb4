pub mod keys;
pub mod record;

pub use keys::*;
pub use record::*;
