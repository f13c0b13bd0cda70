pub mod queues;
pub mod state;
