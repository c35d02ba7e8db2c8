pub mod gh;
pub mod git;
