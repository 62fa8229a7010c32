pub mod keywords;
pub mod normalize;
pub mod resolver;
pub mod scorer;
