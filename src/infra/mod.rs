pub mod git;
pub mod teamwork;
