pub mod cache;
pub mod generation;
pub mod labels;
pub mod prompt;
pub mod validator;
