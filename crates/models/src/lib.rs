pub mod errors;
pub mod db;
pub mod company;
pub mod offering;
pub mod social_link;
pub mod collaboration;
pub mod message;
pub mod event;
pub mod event_participant;
pub mod enquiry;
pub mod city;
pub mod user_activity;

#[cfg(test)]
mod tests;
