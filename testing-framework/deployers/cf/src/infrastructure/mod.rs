pub mod artifact;
pub mod environment;
pub mod scripts;
pub mod workspace;
