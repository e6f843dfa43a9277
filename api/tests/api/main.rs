mod executor;
mod helpers;
