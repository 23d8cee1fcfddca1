// Domain layer - Core planning vocabulary and policy

pub mod errors;
pub mod model;
pub mod options;
pub mod plan;
pub mod rules;
