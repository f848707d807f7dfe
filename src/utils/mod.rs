//! Small helpers shared by the client and its views.

pub mod time;
