pub mod age;
pub mod params;
pub mod request;
pub mod response;
