//! Mind Haven - Sentiment-Aware Counseling Chatbot
//!
//! This crate turns a user utterance plus the prior conversation into a
//! tone-adjusted prompt for a hosted language model, and keeps the resulting
//! exchange as a per-session transcript with end-of-session feedback.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
