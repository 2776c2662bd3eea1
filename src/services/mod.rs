pub mod delay;
pub mod event_log;
pub mod poller;
pub mod recognition;
pub mod runner;
pub mod session;
pub mod submission;
