//! sea-orm entities for the classifieds board plus the model-level
//! validation rules shared by the service layer.
pub mod errors;
pub mod db;
pub mod location;
pub mod category;
pub mod user;
pub mod ad;

#[cfg(test)]
mod tests;
