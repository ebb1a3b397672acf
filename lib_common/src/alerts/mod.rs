pub mod annotations;
pub mod record;
pub mod walker;
