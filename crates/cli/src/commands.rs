/// Checks a single pull request for DO NOT SUBMIT markers
pub mod check;
