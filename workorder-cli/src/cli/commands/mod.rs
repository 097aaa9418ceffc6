pub mod extract;
pub mod rules;
pub mod serve;
