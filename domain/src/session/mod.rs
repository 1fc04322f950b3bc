//! Session domain: the messages sent to a model in one completion call.

pub mod entities;
