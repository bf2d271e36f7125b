//! A directory of chess grandmasters on top of the public Chess.com API.
//!
//! The listing fetches all usernames at once, and reveals them page by page
//! whenever the end of the list becomes visible. The detail view fetches a
//! single profile, and shows a live "since last online" clock.

pub mod config;
pub mod controller;
pub mod network;
pub mod view;
