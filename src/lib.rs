//! Sound Edit - multitrack audio project client
//!
//! Sound Edit models the multitrack project bundle used by an audio editing
//! service and talks to that service over HTTP:
//! 1. Project Model - bundle types, empty-project template, duration,
//!    validation and mixdown planning
//! 2. Service Clients - audio file, mixing and multitrack project endpoints
//!
//! # Architecture
//!
//! Everything under [`project`], [`format`] and [`id`] is pure and works
//! offline. The [`api`] clients build requests and send them through an
//! [`gateway::HttpGateway`], which is either a live `reqwest` client or a
//! mock for tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod id;
pub mod project;
pub mod save;

pub use api::SoundEditClient;
pub use config::ClientConfig;
pub use error::{Result, SoundEditError};
pub use format::{format_duration, format_file_size, format_time, is_valid_audio_file};
pub use id::generate_id;
pub use project::{
    calculate_project_duration, create_empty_project, Clip, Marker, ProjectBundle, ProjectInfo,
    Track, TrackType,
};
