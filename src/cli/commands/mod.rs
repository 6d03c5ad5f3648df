pub mod completions;
pub mod config;
pub mod dashboard;
pub mod due;
pub mod login;
pub mod logout;
pub mod maintenance;
pub mod status;
pub mod vehicles;
