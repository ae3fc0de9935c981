//! Chatbot Core - Question-answering pipeline for a rule-based chatbot
//!
//! This crate turns user text into answers: it picks a knowledge engine,
//! splits the question into sentences, answers each one (following engine
//! redirects as nested sub-queries under recursion and time guards) and
//! keeps a per-user conversation history.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
