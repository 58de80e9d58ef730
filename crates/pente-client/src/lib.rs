pub mod controller;
pub mod dispatcher;
pub mod pages;
pub mod session;
