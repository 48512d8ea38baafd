pub mod clear;
pub mod results;
pub mod run;
pub mod words;
