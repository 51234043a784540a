//! Audio preprocessing modules
//!
//! This module contains utilities for preparing a capture for analysis:
//! - Peak normalization
//! - Channel mixing (multi-channel to mono)

pub mod channel_mixer;
pub mod normalization;
