pub mod detail;
pub mod proxy;
pub mod run;
pub mod trending;
