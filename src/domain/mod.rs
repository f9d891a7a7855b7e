// Domain layer - Core composition types and rules

pub mod model;
pub mod rules;
