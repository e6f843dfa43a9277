pub mod history;
pub mod params;
pub mod request;
pub mod response;
