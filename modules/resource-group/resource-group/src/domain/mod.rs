pub mod dispatcher;
pub mod error;
pub mod group_type;
pub mod normalize;
pub mod validation;
