pub mod a001_client;
pub mod a002_lead;
pub mod a003_reminder;
pub mod a004_ticket;
pub mod a005_todo;
